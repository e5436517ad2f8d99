use std::{sync::Arc, time::Duration};

use teloxide::{
    payloads::{AnswerCallbackQuerySetters, EditMessageTextSetters, SendMessageSetters},
    prelude::Requester,
    types::{CallbackQuery, ChatId, MessageId, ParseMode},
    Bot,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    database::{question::Category, QuestionBank},
    engine::{QuestionPrompt, QuizEngine},
    error::QuizError,
    flow::{self, Event, Reply, Transition},
    keyboard::{answers_keyboard, categories_keyboard, CallbackData},
    messages::{error_text, CANCELLED, CHOOSE_CATEGORY},
    state::QuizState,
    BoxedError, HandlerResult, UserDialogue,
};

/// Replies left over after a pause, to be delivered once it elapses.
type Deferred = Option<(Duration, Vec<Reply>)>;

/// Runs one event through the conversation and stores the new state.
/// Returns the id of the session that is running afterwards, if any.
async fn apply(
    dialogue: &UserDialogue,
    engine: &QuizEngine,
    bank: &QuestionBank,
    event: Event,
) -> Result<(Option<Uuid>, Vec<Reply>), BoxedError> {
    let state = dialogue.get_or_default().await?;
    let Transition { state, replies } =
        flow::transition(engine, bank, state, event, &mut rand::thread_rng());
    let session_id = state.session().map(|session| *session.id());
    dialogue.update(state).await?;
    Ok((session_id, replies))
}

pub(crate) async fn handle_event(
    bot: &Bot,
    dialogue: UserDialogue,
    engine: &QuizEngine,
    bank: &QuestionBank,
    event: Event,
    anchor: Option<MessageId>,
) -> HandlerResult {
    let (session_id, replies) = apply(&dialogue, engine, bank, event).await?;
    let (now, deferred) = split_at_pause(replies);
    let chat_id = dialogue.chat_id();
    if let Some((delay, rest)) = deferred {
        schedule(bot.clone(), dialogue, session_id, delay, rest);
    }
    render(bot, chat_id, anchor, now).await
}

#[instrument(level = "info", skip(bot, dialogue, engine, bank, q), fields(chat = %dialogue.chat_id(), data = ?q.data))]
pub(crate) async fn take_callback(
    bot: Bot,
    dialogue: UserDialogue,
    q: CallbackQuery,
    engine: Arc<QuizEngine>,
    bank: Arc<QuestionBank>,
) -> HandlerResult {
    let username = q.from.username.clone().unwrap_or_default();

    let event = match q.data.as_deref().and_then(CallbackData::parse) {
        Some(CallbackData::Category(idx)) => match bank.category(idx) {
            Some(category) => {
                tracing::info!("{} chooses category '{}'", username, category);
                Event::ChooseCategory(Category::Named(category.to_owned()))
            }
            None => {
                tracing::warn!("{} chose unknown category #{}", username, idx);
                bot.answer_callback_query(&q.id)
                    .text("This category is no longer available.")
                    .await?;
                return Ok(());
            }
        },
        Some(CallbackData::RandomCategory) => {
            tracing::info!("{} chooses random questions", username);
            Event::ChooseCategory(Category::Random)
        }
        Some(CallbackData::Answer { question, token }) => {
            tracing::info!("{} answers #{} to question #{}", username, token, question + 1);
            Event::SubmitAnswer { question, token }
        }
        None => {
            tracing::warn!("{} sent malformed callback data {:?}", username, q.data);
            bot.answer_callback_query(&q.id).await?;
            return Ok(());
        }
    };

    let (session_id, replies) = apply(&dialogue, &engine, &bank, event).await?;
    let (now, deferred) = split_at_pause(replies);
    let chat_id = dialogue.chat_id();

    // The new state is already stored, so whatever follows the pause has to
    // go out even if answering or editing this message fails.
    if let Some((delay, rest)) = deferred {
        schedule(bot.clone(), dialogue, session_id, delay, rest);
    }

    match now.as_slice() {
        [Reply::Error(e @ (QuizError::StaleAnswer | QuizError::NoActiveSession))] => {
            tracing::info!("{} sent a stale callback: {}", username, e);
            bot.answer_callback_query(&q.id).text(error_text(e)).await?;
            return Ok(());
        }
        [] => {
            bot.answer_callback_query(&q.id).await?;
            return Ok(());
        }
        _ => {
            bot.answer_callback_query(&q.id).await?;
        }
    }

    let anchor = q.message.as_ref().map(|message| message.id());
    render(&bot, chat_id, anchor, now).await
}

/// Splits replies into the ones to send right away and the ones that wait
/// for the first pause.
fn split_at_pause(replies: Vec<Reply>) -> (Vec<Reply>, Deferred) {
    let mut replies = replies.into_iter();
    let mut now = Vec::new();

    while let Some(reply) = replies.next() {
        match reply {
            Reply::Pause(delay) => return (now, Some((delay, replies.collect()))),
            reply => now.push(reply),
        }
    }

    (now, None)
}

/// Sends replies in order. `anchor` is the message the user interacted with;
/// the first question or feedback replaces its content.
async fn render(
    bot: &Bot,
    chat_id: ChatId,
    mut anchor: Option<MessageId>,
    replies: Vec<Reply>,
) -> HandlerResult {
    for reply in replies {
        match reply {
            Reply::CategoryMenu(categories) => {
                bot.send_message(chat_id, CHOOSE_CATEGORY)
                    .reply_markup(categories_keyboard(&categories))
                    .await?;
            }
            Reply::Question(prompt) => {
                tracing::debug!("Asking question #{}: '{}'", prompt.number, prompt.text);
                let keyboard = answers_keyboard(&prompt);
                match anchor.take() {
                    Some(message_id) => {
                        bot.edit_message_text(chat_id, message_id, prompt.to_string())
                            .parse_mode(ParseMode::Html)
                            .reply_markup(keyboard)
                            .await?;
                    }
                    None => {
                        bot.send_message(chat_id, prompt.to_string())
                            .parse_mode(ParseMode::Html)
                            .reply_markup(keyboard)
                            .await?;
                    }
                }
            }
            Reply::Feedback(feedback) => match anchor.take() {
                Some(message_id) => {
                    bot.edit_message_text(chat_id, message_id, feedback.to_string())
                        .parse_mode(ParseMode::Html)
                        .await?;
                }
                None => {
                    bot.send_message(chat_id, feedback.to_string())
                        .parse_mode(ParseMode::Html)
                        .await?;
                }
            },
            Reply::Pause(delay) => {
                tracing::warn!("Unexpected pause of {:?} while rendering", delay);
            }
            Reply::Summary(summary) => {
                tracing::info!(
                    "Chat {} completed a quiz with {}/{}",
                    chat_id,
                    summary.score,
                    summary.total
                );
                bot.send_message(chat_id, summary.to_string())
                    .parse_mode(ParseMode::Html)
                    .await?;
            }
            Reply::Cancelled => {
                bot.send_message(chat_id, CANCELLED).await?;
            }
            Reply::Error(e) => {
                bot.send_message(chat_id, error_text(&e)).await?;
            }
        }
    }

    Ok(())
}

/// Delivers the rest of a transition after `delay` without holding up the
/// dispatcher.
fn schedule(
    bot: Bot,
    dialogue: UserDialogue,
    session_id: Option<Uuid>,
    delay: Duration,
    replies: Vec<Reply>,
) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        if let Err(e) = resume(&bot, &dialogue, session_id, replies).await {
            tracing::error!("Failed to deliver to chat {}: {}", dialogue.chat_id(), e);
        }
    });
}

async fn resume(
    bot: &Bot,
    dialogue: &UserDialogue,
    session_id: Option<Uuid>,
    replies: Vec<Reply>,
) -> HandlerResult {
    if let Some(Reply::Question(prompt)) = replies.first() {
        let state = dialogue.get().await?;
        if !continuation_is_current(state.as_ref(), session_id, prompt) {
            tracing::debug!(
                "Chat {} left the quiz before question #{}",
                dialogue.chat_id(),
                prompt.number
            );
            return Ok(());
        }
    }

    render(bot, dialogue.chat_id(), None, replies).await
}

/// A deferred question is only worth sending while the same session still
/// waits on it; a cancel or a restart during the pause makes it obsolete.
fn continuation_is_current(
    state: Option<&QuizState>,
    session_id: Option<Uuid>,
    prompt: &QuestionPrompt,
) -> bool {
    state.and_then(QuizState::session).is_some_and(|session| {
        Some(*session.id()) == session_id
            && session.cursor() == prompt.question_idx()
            && session.is_awaiting_answer()
    })
}
