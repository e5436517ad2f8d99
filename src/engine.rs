use std::time::Duration;

use rand::{seq::SliceRandom, Rng};
use uuid::Uuid;

use crate::{
    database::question::{Category, QuestionRecord},
    error::QuizError,
};

pub const DEFAULT_SESSION_LENGTH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    /// Target number of questions per session.
    pub length: usize,
    /// Pause after feedback that has no explanation to read.
    pub feedback_delay: Duration,
    pub explanation_delay: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            length: DEFAULT_SESSION_LENGTH,
            feedback_delay: Duration::from_secs(1),
            explanation_delay: Duration::from_secs(4),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    InProgress,
    Complete,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissedQuestion {
    pub prompt: String,
    pub correct_answer: String,
}

/// Shuffled options of the question at the cursor. `order[token]` is the
/// original index of the option shown at position `token`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Presentation {
    order: Vec<usize>,
    correct_token: usize,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    id: Uuid,
    category: Category,
    questions: Vec<QuestionRecord>,
    cursor: usize,
    score: u32,
    missed: Vec<MissedQuestion>,
    presented: Option<Presentation>,
    phase: SessionPhase,
}

impl SessionState {
    pub fn id(&self) -> &Uuid {
        &self.id
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn questions(&self) -> &[QuestionRecord] {
        &self.questions
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn missed(&self) -> &[MissedQuestion] {
        &self.missed
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn is_awaiting_answer(&self) -> bool {
        self.phase == SessionPhase::InProgress && self.presented.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOption {
    pub text: String,
    pub token: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionPrompt {
    /// 1-based position of the question in the session.
    pub number: usize,
    pub total: usize,
    pub text: String,
    pub options: Vec<AnswerOption>,
}

impl QuestionPrompt {
    /// Cursor value the options of this prompt answer.
    pub fn question_idx(&self) -> usize {
        self.number - 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    NextQuestion,
    SessionComplete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub prompt: String,
    pub correct: bool,
    pub chosen_answer: Option<String>,
    pub correct_answer: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub feedback: AnswerFeedback,
    /// How long the transport should keep the feedback on screen before advancing.
    pub pause: Duration,
    pub next: Next,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub score: u32,
    pub total: usize,
    pub missed: Vec<MissedQuestion>,
}

impl SessionSummary {
    pub fn is_perfect(&self) -> bool {
        self.missed.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct QuizEngine {
    settings: SessionSettings,
}

impl QuizEngine {
    pub fn new(settings: SessionSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn start_session<R: Rng + ?Sized>(
        &self,
        all_questions: &[QuestionRecord],
        category: &Category,
        rng: &mut R,
    ) -> Result<SessionState, QuizError> {
        let mut pool: Vec<&QuestionRecord> = all_questions
            .iter()
            .filter(|q| category.matches(q))
            .collect();

        if pool.is_empty() {
            return Err(QuizError::EmptyCategory(category.to_string()));
        }

        let length = self.settings.length.min(pool.len());
        let (drawn, _) = pool.partial_shuffle(rng, length);
        let questions: Vec<QuestionRecord> = drawn.iter().map(|q| (*q).clone()).collect();

        tracing::debug!(
            "Starting session over '{}': {} of {} questions",
            category,
            questions.len(),
            pool.len()
        );

        Ok(SessionState {
            id: Uuid::new_v4(),
            category: category.clone(),
            questions,
            cursor: 0,
            score: 0,
            missed: Vec::new(),
            presented: None,
            phase: SessionPhase::InProgress,
        })
    }

    pub fn present_question<R: Rng + ?Sized>(
        &self,
        state: &mut SessionState,
        rng: &mut R,
    ) -> Result<QuestionPrompt, QuizError> {
        if state.phase != SessionPhase::InProgress {
            return Err(QuizError::StaleAnswer);
        }
        let question = state
            .questions
            .get(state.cursor)
            .ok_or(QuizError::StaleAnswer)?;

        let mut order: Vec<usize> = (0..question.options().len()).collect();
        order.shuffle(rng);

        let correct_token = order
            .iter()
            .position(|&original| original == question.correct_option_index())
            .ok_or_else(|| QuizError::InvalidQuestion {
                prompt: question.prompt().to_owned(),
                reason: "correct option lost while shuffling".into(),
            })?;

        let options = order
            .iter()
            .enumerate()
            .map(|(token, &original)| AnswerOption {
                text: question.options()[original].clone(),
                token,
            })
            .collect();

        let prompt = QuestionPrompt {
            number: state.cursor + 1,
            total: state.total(),
            text: question.prompt().to_owned(),
            options,
        };

        state.presented = Some(Presentation {
            order,
            correct_token,
        });

        Ok(prompt)
    }

    pub fn submit_answer(
        &self,
        state: &mut SessionState,
        token: usize,
    ) -> Result<AnswerOutcome, QuizError> {
        if state.phase != SessionPhase::InProgress {
            return Err(QuizError::StaleAnswer);
        }
        let presented = state.presented.take().ok_or(QuizError::StaleAnswer)?;
        let question = &state.questions[state.cursor];

        // Tokens outside the presented range count as a wrong answer.
        let chosen_answer = presented
            .order
            .get(token)
            .map(|&original| question.options()[original].clone());
        let correct = token == presented.correct_token;

        if correct {
            state.score += 1;
        } else {
            state.missed.push(MissedQuestion {
                prompt: question.prompt().to_owned(),
                correct_answer: question.correct_option().to_owned(),
            });
        }

        let feedback = AnswerFeedback {
            prompt: question.prompt().to_owned(),
            correct,
            chosen_answer,
            correct_answer: question.correct_option().to_owned(),
            explanation: question.explanation().to_owned(),
        };

        let pause = if feedback.explanation.trim().is_empty() {
            self.settings.feedback_delay
        } else {
            self.settings.explanation_delay
        };

        state.cursor += 1;
        let next = if state.cursor >= state.total() {
            state.phase = SessionPhase::Complete;
            Next::SessionComplete
        } else {
            Next::NextQuestion
        };

        Ok(AnswerOutcome {
            feedback,
            pause,
            next,
        })
    }

    /// Final report; the session is consumed.
    pub fn summarize(&self, state: SessionState) -> SessionSummary {
        SessionSummary {
            score: state.score,
            total: state.questions.len(),
            missed: state.missed,
        }
    }

    pub fn cancel_session(&self, state: Option<&mut SessionState>) {
        if let Some(state) = state {
            if state.phase == SessionPhase::InProgress {
                state.phase = SessionPhase::Cancelled;
                state.presented = None;
            }
        }
    }
}
