//! Command descriptions shown by Telegram clients

use teloxide::utils::command::BotCommands;

/// Parsing of the actual input happens in the engine; this enum only feeds
/// the client-side command menu and the welcome text.
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum BotCommand {
    #[command(description = "show this message.")]
    Start,
    #[command(description = "record a new expense.")]
    Add,
    #[command(description = "today's budget and spending.")]
    Today,
    #[command(description = "this month's budget and spending.")]
    Month,
}
