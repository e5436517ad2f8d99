use state::QuizState;
use teloxide::{dispatching::dialogue::InMemStorage, prelude::Dialogue};

pub mod commands;
pub mod config;
pub mod database;
pub mod engine;
pub mod error;
pub mod flow;
pub mod keyboard;
pub mod messages;
pub mod runner;
pub mod schema;
pub mod state;

pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

type UserDialogue = Dialogue<QuizState, InMemStorage<QuizState>>;
type HandlerResult = Result<(), BoxedError>;
