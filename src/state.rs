use crate::engine::SessionState;

/// Per-chat conversation state kept in the dialogue storage.
#[derive(Debug, Clone, Default)]
pub enum QuizState {
    #[default]
    Idle,
    CategorySelection,
    InProgress {
        session: SessionState,
    },
}

impl QuizState {
    pub fn session(&self) -> Option<&SessionState> {
        match self {
            QuizState::InProgress { session } => Some(session),
            _ => None,
        }
    }
}
