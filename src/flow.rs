use std::time::Duration;

use rand::Rng;

use crate::{
    database::{question::Category, QuestionBank},
    engine::{AnswerFeedback, Next, QuestionPrompt, QuizEngine, SessionSummary},
    error::QuizError,
    state::QuizState,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    OpenMenu,
    ChooseCategory(Category),
    SubmitAnswer { question: usize, token: usize },
    Cancel,
}

/// What the transport has to show, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    CategoryMenu(Vec<String>),
    Question(QuestionPrompt),
    Feedback(AnswerFeedback),
    /// Everything after a pause is delivered once it elapses.
    Pause(Duration),
    Summary(SessionSummary),
    Cancelled,
    Error(QuizError),
}

#[derive(Debug, Clone)]
pub struct Transition {
    pub state: QuizState,
    pub replies: Vec<Reply>,
}

impl Transition {
    fn new(state: QuizState, replies: Vec<Reply>) -> Self {
        Self { state, replies }
    }
}

pub fn transition<R: Rng + ?Sized>(
    engine: &QuizEngine,
    bank: &QuestionBank,
    state: QuizState,
    event: Event,
    rng: &mut R,
) -> Transition {
    match (state, event) {
        (QuizState::InProgress { mut session }, Event::OpenMenu) => {
            engine.cancel_session(Some(&mut session));
            Transition::new(
                QuizState::CategorySelection,
                vec![
                    Reply::Cancelled,
                    Reply::CategoryMenu(bank.categories().to_vec()),
                ],
            )
        }
        (_, Event::OpenMenu) => Transition::new(
            QuizState::CategorySelection,
            vec![Reply::CategoryMenu(bank.categories().to_vec())],
        ),

        (QuizState::Idle | QuizState::CategorySelection, Event::ChooseCategory(category)) => {
            let started = engine
                .start_session(bank.questions(), &category, rng)
                .and_then(|mut session| {
                    let prompt = engine.present_question(&mut session, rng)?;
                    Ok((session, prompt))
                });

            match started {
                Ok((session, prompt)) => Transition::new(
                    QuizState::InProgress { session },
                    vec![Reply::Question(prompt)],
                ),
                Err(e) => Transition::new(QuizState::CategorySelection, vec![Reply::Error(e)]),
            }
        }
        // A menu from an earlier message while a quiz is running.
        (state @ QuizState::InProgress { .. }, Event::ChooseCategory(_)) => {
            Transition::new(state, vec![])
        }

        (QuizState::InProgress { mut session }, Event::SubmitAnswer { question, token }) => {
            if question != session.cursor() || !session.is_awaiting_answer() {
                return Transition::new(
                    QuizState::InProgress { session },
                    vec![Reply::Error(QuizError::StaleAnswer)],
                );
            }

            let outcome = match engine.submit_answer(&mut session, token) {
                Ok(outcome) => outcome,
                Err(e) => {
                    return Transition::new(QuizState::InProgress { session }, vec![Reply::Error(e)])
                }
            };
            let mut replies = vec![Reply::Feedback(outcome.feedback), Reply::Pause(outcome.pause)];

            match outcome.next {
                Next::NextQuestion => match engine.present_question(&mut session, rng) {
                    Ok(prompt) => {
                        replies.push(Reply::Question(prompt));
                        Transition::new(QuizState::InProgress { session }, replies)
                    }
                    Err(e) => {
                        replies.push(Reply::Error(e));
                        Transition::new(QuizState::Idle, replies)
                    }
                },
                Next::SessionComplete => {
                    replies.push(Reply::Summary(engine.summarize(session)));
                    Transition::new(QuizState::Idle, replies)
                }
            }
        }
        (state, Event::SubmitAnswer { .. }) => {
            Transition::new(state, vec![Reply::Error(QuizError::NoActiveSession)])
        }

        (QuizState::InProgress { mut session }, Event::Cancel) => {
            engine.cancel_session(Some(&mut session));
            Transition::new(QuizState::Idle, vec![Reply::Cancelled])
        }
        (QuizState::CategorySelection, Event::Cancel) => {
            Transition::new(QuizState::Idle, vec![Reply::Cancelled])
        }
        (QuizState::Idle, Event::Cancel) => {
            engine.cancel_session(None);
            Transition::new(QuizState::Idle, vec![Reply::Error(QuizError::NoActiveSession)])
        }
    }
}
