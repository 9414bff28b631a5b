use teloxide::{
    prelude::*,
    types::{ChatId, ReplyMarkup, User},
};

use crate::{ConfigParameters, ui};

pub(crate) async fn handle_message(
    bot: Bot,
    msg: Message,
    cfg: ConfigParameters,
) -> ResponseResult<()> {
    let Some(from) = msg.from.as_ref() else {
        return Ok(());
    };
    if !is_allowed(&cfg.allowed_users, from) {
        tracing::warn!("ignoring message from unauthorized user {}", from.id);
        return Ok(());
    }
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let Ok(user_id) = engine::UserId::try_from(from.id.0) else {
        tracing::warn!("user id {} does not fit the storage key", from.id);
        return Ok(());
    };

    let (reply, markup) = match cfg.engine.handle_message(user_id, text).await {
        Ok(reply) => ui::render_reply(&reply, cfg.engine.model()),
        Err(err) => {
            tracing::error!("failed to handle message from user {user_id}: {err}");
            (ui::failure_text().to_string(), ui::remove_keyboard())
        }
    };

    send(&bot, msg.chat.id, reply, markup).await;
    Ok(())
}

/// Delivery failures are logged and dropped: whatever the engine did is
/// already persisted.
async fn send(bot: &Bot, chat_id: ChatId, text: String, markup: ReplyMarkup) {
    if let Err(err) = bot.send_message(chat_id, text).reply_markup(markup).await {
        tracing::warn!("failed to deliver message to chat {chat_id}: {err}");
    }
}

/// An empty allow-list admits nobody.
fn is_allowed(allowed_users: &[UserId], from: &User) -> bool {
    allowed_users.contains(&from.id)
}
