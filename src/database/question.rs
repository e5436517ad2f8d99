use std::fmt;

use uuid::Uuid;

use crate::error::QuizError;

/// Pseudo-category label for "all categories, randomized".
pub const RANDOM_CATEGORY: &str = "random";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Named(String),
    Random,
}

impl Category {
    pub fn matches(&self, question: &QuestionRecord) -> bool {
        match self {
            Category::Named(name) => question.category() == name,
            Category::Random => true,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Named(name) => write!(f, "{}", name),
            Category::Random => write!(f, "{}", RANDOM_CATEGORY),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    id: Uuid,
    category: String,
    prompt: String,
    options: Vec<String>,
    correct_option_index: usize,
    explanation: String,
}

impl QuestionRecord {
    pub fn new(
        category: impl Into<String>,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_option_index: usize,
        explanation: impl Into<String>,
    ) -> Result<Self, QuizError> {
        Self::retrieve(
            Uuid::new_v4(),
            category.into(),
            prompt.into(),
            options,
            correct_option_index,
            explanation.into(),
        )
    }

    /// Rebuilds a record that already has an identity, e.g. a database row.
    pub fn retrieve(
        id: Uuid,
        category: String,
        prompt: String,
        options: Vec<String>,
        correct_option_index: usize,
        explanation: String,
    ) -> Result<Self, QuizError> {
        if options.len() < 2 {
            return Err(QuizError::InvalidQuestion {
                prompt,
                reason: format!("needs at least 2 options, got {}", options.len()),
            });
        }
        if correct_option_index >= options.len() {
            return Err(QuizError::InvalidQuestion {
                prompt,
                reason: format!(
                    "correct option #{} is out of {} options",
                    correct_option_index,
                    options.len()
                ),
            });
        }

        Ok(Self {
            id,
            category,
            prompt,
            options,
            correct_option_index,
            explanation,
        })
    }

    pub fn id(&self) -> &Uuid {
        &self.id
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_option_index(&self) -> usize {
        self.correct_option_index
    }

    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_option_index]
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn options(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn rejects_single_option() {
        let res = QuestionRecord::new("Rus", "Who?", options(&["Rurik"]), 0, "");
        assert_matches!(res, Err(QuizError::InvalidQuestion { .. }));
    }

    #[test]
    fn rejects_correct_index_out_of_range() {
        let res = QuestionRecord::new("Rus", "Who?", options(&["Rurik", "Oleg"]), 2, "");
        assert_matches!(res, Err(QuizError::InvalidQuestion { reason, .. }) if reason.contains("out of 2"));
    }

    #[test]
    fn correct_option_resolves_to_text() {
        let question =
            QuestionRecord::new("Rus", "Who?", options(&["Rurik", "Oleg"]), 1, "").unwrap();
        assert_eq!(question.correct_option(), "Oleg");
    }

    #[test]
    fn random_category_matches_everything() {
        let question =
            QuestionRecord::new("Rus", "Who?", options(&["Rurik", "Oleg"]), 1, "").unwrap();
        assert!(Category::Random.matches(&question));
        assert!(Category::Named("Rus".into()).matches(&question));
        assert!(!Category::Named("Empire".into()).matches(&question));
    }
}
