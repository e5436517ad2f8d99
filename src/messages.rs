use std::fmt;

use teloxide::utils::html::{bold, escape, italic};

use crate::{
    engine::{AnswerFeedback, QuestionPrompt, SessionSummary},
    error::QuizError,
};

pub(crate) const HELP_MESSAGE: &str = "Hi! I am a Russian history quiz bot. 🇷🇺\n\n\
<b>Available commands:</b>\n\
/quiz - start a new quiz\n\
/info - show this message\n\
/cancel - stop the current quiz (/exit works too)";

pub(crate) const CHOOSE_CATEGORY: &str = "Choose a category:";
pub(crate) const CANCELLED: &str = "Quiz cancelled.";

impl fmt::Display for QuestionPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n\n{}",
            italic(&format!("Question {} of {}", self.number, self.total)),
            escape(&self.text)
        )
    }
}

impl fmt::Display for AnswerFeedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n\n", escape(&self.prompt))?;
        if let Some(chosen) = &self.chosen_answer {
            writeln!(f, "Your answer: {}", escape(chosen))?;
        }
        if self.correct {
            write!(f, "{}", bold("Correct! ✅"))?;
        } else {
            write!(
                f,
                "{}\nCorrect answer: {}",
                bold("Wrong. ❌"),
                bold(&escape(&self.correct_answer))
            )?;
        }
        if !self.explanation.trim().is_empty() {
            write!(f, "\n\n{}", italic(&escape(&self.explanation)))?;
        }
        Ok(())
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Quiz finished! Your result: {}.",
            bold(&format!("{} of {}", self.score, self.total))
        )?;

        if self.is_perfect() {
            return write!(f, "\n\nFlawless! Not a single mistake. 🏆");
        }

        write!(f, "\n\n{}", bold("Questions to review:"))?;
        for (i, missed) in self.missed.iter().enumerate() {
            write!(
                f,
                "\n{}. {}\n   → {}",
                i + 1,
                escape(&missed.prompt),
                escape(&missed.correct_answer)
            )?;
        }
        Ok(())
    }
}

pub(crate) fn error_text(error: &QuizError) -> String {
    match error {
        QuizError::EmptyCategory(category) => format!(
            "Sorry, there are no questions in '{}'. Please choose another category.",
            escape(category)
        ),
        QuizError::StaleAnswer => "This question is no longer active.".to_owned(),
        QuizError::NoActiveSession => "There is no active quiz. Send /quiz to start one.".to_owned(),
        QuizError::InvalidQuestion { .. } => "Something is wrong with this question.".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MissedQuestion;

    #[test]
    fn perfect_summary_celebrates() {
        let summary = SessionSummary {
            score: 3,
            total: 3,
            missed: vec![],
        };
        let text = summary.to_string();
        assert!(text.contains("<b>3 of 3</b>"));
        assert!(text.contains("Flawless"));
        assert!(!text.contains("review"));
    }

    #[test]
    fn summary_lists_missed_questions() {
        let summary = SessionSummary {
            score: 1,
            total: 3,
            missed: vec![
                MissedQuestion {
                    prompt: "First tsar?".into(),
                    correct_answer: "Ivan IV".into(),
                },
                MissedQuestion {
                    prompt: "Year <1703>?".into(),
                    correct_answer: "1703".into(),
                },
            ],
        };
        let text = summary.to_string();
        assert!(text.contains("1. First tsar?\n   → Ivan IV"));
        assert!(text.contains("2. Year &lt;1703&gt;?"));
        assert!(!text.contains("Flawless"));
    }

    #[test]
    fn wrong_feedback_names_the_correct_answer() {
        let feedback = AnswerFeedback {
            prompt: "Who?".into(),
            correct: false,
            chosen_answer: Some("Oleg".into()),
            correct_answer: "Rurik".into(),
            explanation: "".into(),
        };
        let text = feedback.to_string();
        assert!(text.contains("Your answer: Oleg"));
        assert!(text.contains("Correct answer: <b>Rurik</b>"));
        assert!(!text.contains("<i>"));
    }

    #[test]
    fn correct_feedback_shows_explanation() {
        let feedback = AnswerFeedback {
            prompt: "Who?".into(),
            correct: true,
            chosen_answer: Some("Rurik".into()),
            correct_answer: "Rurik".into(),
            explanation: "Chronicle".into(),
        };
        let text = feedback.to_string();
        assert!(text.contains("Correct! ✅"));
        assert!(!text.contains("Correct answer"));
        assert!(text.ends_with("<i>Chronicle</i>"));
    }

    #[test]
    fn broken_question_is_not_reported_as_stale() {
        let broken = QuizError::InvalidQuestion {
            prompt: "Who founded Moscow?".into(),
            reason: "correct option lost while shuffling".into(),
        };
        assert_ne!(error_text(&broken), error_text(&QuizError::StaleAnswer));
        assert_eq!(error_text(&broken), "Something is wrong with this question.");
    }
}
