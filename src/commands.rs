use std::sync::Arc;

use teloxide::{
    payloads::SendMessageSetters,
    prelude::Requester,
    types::{Message, ParseMode},
    utils::command::BotCommands,
    Bot,
};
use tracing::instrument;

use crate::{
    database::QuestionBank,
    engine::QuizEngine,
    flow::Event,
    messages::HELP_MESSAGE,
    runner, HandlerResult, UserDialogue,
};

#[derive(Debug, Clone, BotCommands)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "greet and show help.")]
    Start,
    #[command(description = "show help.")]
    Info,
    #[command(description = "start a new quiz.")]
    Quiz,
    #[command(description = "stop the current quiz.")]
    Cancel,
    #[command(description = "stop the current quiz.")]
    Exit,
}

pub(crate) async fn help(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, HELP_MESSAGE)
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

#[instrument(level = "info", skip(bot, dialogue, engine, bank, msg), fields(chat = %msg.chat.id))]
pub(crate) async fn quiz(
    bot: Bot,
    dialogue: UserDialogue,
    msg: Message,
    engine: Arc<QuizEngine>,
    bank: Arc<QuestionBank>,
) -> HandlerResult {
    tracing::info!(
        "{} opens the category menu",
        msg.chat.username().unwrap_or("anonymous")
    );
    runner::handle_event(&bot, dialogue, &engine, &bank, Event::OpenMenu, None).await
}

#[instrument(level = "info", skip(bot, dialogue, engine, bank, msg), fields(chat = %msg.chat.id))]
pub(crate) async fn cancel(
    bot: Bot,
    dialogue: UserDialogue,
    msg: Message,
    engine: Arc<QuizEngine>,
    bank: Arc<QuestionBank>,
) -> HandlerResult {
    tracing::info!(
        "{} cancels the quiz",
        msg.chat.username().unwrap_or("anonymous")
    );
    runner::handle_event(&bot, dialogue, &engine, &bank, Event::Cancel, None).await
}
