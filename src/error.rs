use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("No questions available in category '{0}'")]
    EmptyCategory(String),

    #[error("No question is awaiting an answer")]
    StaleAnswer,

    #[error("No active quiz")]
    NoActiveSession,

    #[error("Invalid question '{prompt}': {reason}")]
    InvalidQuestion { prompt: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} should be set.")]
    Missing(&'static str),

    #[error("{name} can't be parsed: {value}")]
    Malformed { name: &'static str, value: String },
}
