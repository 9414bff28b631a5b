//! Telegram bot.
//!
//! Every text message of an allowed user is handed to the engine's
//! conversation; the bot only renders the reply and delivers it.

use std::sync::Arc;

use engine::Engine;
use teloxide::{prelude::*, utils::command::BotCommands};

mod commands;
mod handlers;
mod ui;

#[derive(Clone)]
pub struct ConfigParameters {
    allowed_users: Vec<UserId>,
    engine: Arc<Engine>,
}

pub struct Bot {
    token: String,
    allowed_users: Vec<UserId>,
    engine: Arc<Engine>,
}

impl Bot {
    pub fn builder() -> BotBuilder {
        BotBuilder::default()
    }

    pub async fn run(&self) {
        tracing::info!("Starting telegram bot...");

        let bot = teloxide::Bot::new(&self.token);
        if let Err(err) = bot
            .set_my_commands(commands::BotCommand::bot_commands())
            .await
        {
            tracing::warn!("failed to register bot commands: {err}");
        }

        let parameters = ConfigParameters {
            allowed_users: self.allowed_users.clone(),
            engine: self.engine.clone(),
        };

        let handler =
            dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

        Dispatcher::builder(bot, handler)
            .dependencies(dptree::deps![parameters])
            .default_handler(|upd| async move {
                tracing::debug!("Unhandled update: {:?}", upd.id);
            })
            .error_handler(LoggingErrorHandler::with_custom_text(
                "An error has occurred in the dispatcher",
            ))
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }
}

#[derive(Default)]
pub struct BotBuilder {
    token: String,
    allowed_users: Vec<UserId>,
    engine: Option<Arc<Engine>>,
}

impl BotBuilder {
    pub fn token(mut self, token: &str) -> BotBuilder {
        self.token = token.to_string();
        self
    }

    /// Telegram ids of the users the bot answers to. Anybody else is ignored.
    pub fn allowed_users(mut self, allowed_users: Vec<u64>) -> BotBuilder {
        self.allowed_users = allowed_users.into_iter().map(UserId).collect();
        self
    }

    pub fn engine(mut self, engine: Arc<Engine>) -> BotBuilder {
        self.engine = Some(engine);
        self
    }

    pub fn build(self) -> Result<Bot, String> {
        tracing::info!("Initializing telegram bot...");
        if self.token.is_empty() {
            return Err("missing telegram token".to_string());
        }
        let engine = self.engine.ok_or_else(|| "missing engine".to_string())?;
        if self.allowed_users.is_empty() {
            tracing::warn!("telegram allow-list is empty: every message will be ignored");
        }

        Ok(Bot {
            token: self.token,
            allowed_users: self.allowed_users,
            engine,
        })
    }
}
