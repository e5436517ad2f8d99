use teloxide::{
    dispatching::{
        dialogue::{self, InMemStorage},
        UpdateFilterExt, UpdateHandler,
    },
    dptree,
    prelude::Requester,
    types::{Message, Update},
    Bot,
};
use tracing::instrument;

use crate::{
    commands::{cancel, help, quiz, Command},
    runner,
    state::QuizState,
    BoxedError, HandlerResult,
};

pub fn schema() -> UpdateHandler<BoxedError> {
    use dptree::case;

    let command_handler = teloxide::filter_command::<Command, _>()
        .branch(case![Command::Start].endpoint(help))
        .branch(case![Command::Info].endpoint(help))
        .branch(case![Command::Quiz].endpoint(quiz))
        .branch(case![Command::Cancel].endpoint(cancel))
        .branch(case![Command::Exit].endpoint(cancel));

    let message_handler = Update::filter_message()
        .branch(command_handler)
        .endpoint(invalid_input);

    let callback_query_handler = Update::filter_callback_query().endpoint(runner::take_callback);

    dialogue::enter::<Update, InMemStorage<QuizState>, QuizState, _>()
        .branch(message_handler)
        .branch(callback_query_handler)
}

#[instrument(level = "info", skip(bot, msg), fields(chat = %msg.chat.id))]
async fn invalid_input(bot: Bot, msg: Message) -> HandlerResult {
    tracing::info!(
        "{}: invalid input '{:?}'",
        msg.chat.username().unwrap_or("anonymous"),
        msg.text()
    );
    bot.send_message(
        msg.chat.id,
        "Unable to handle the message. Enter /info to see usages.",
    )
    .await?;
    Ok(())
}
