use std::error::Error;

use question::QuestionRecord;

pub mod builtin;
pub mod connection;
pub mod question;

pub trait RetrieveQuestions {
    async fn retrieve_all_questions(
        &self,
    ) -> Result<Vec<QuestionRecord>, Box<dyn Error + Send + Sync>>;
}

/// Read-only question set shared by every session.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: Vec<QuestionRecord>,
    categories: Vec<String>,
}

impl QuestionBank {
    pub fn new(questions: Vec<QuestionRecord>) -> Self {
        let categories = list_categories(&questions);
        Self {
            questions,
            categories,
        }
    }

    pub async fn load<Source: RetrieveQuestions>(
        source: &Source,
    ) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let questions = source.retrieve_all_questions().await?;
        tracing::info!("Loaded {} questions", questions.len());
        Ok(Self::new(questions))
    }

    pub fn questions(&self) -> &[QuestionRecord] {
        &self.questions
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn category(&self, idx: usize) -> Option<&str> {
        self.categories.get(idx).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Distinct categories in order of first appearance.
pub fn list_categories(questions: &[QuestionRecord]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for question in questions {
        if !categories.iter().any(|c| c == question.category()) {
            categories.push(question.category().to_owned());
        }
    }
    categories
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(category: &str, prompt: &str) -> QuestionRecord {
        QuestionRecord::new(category, prompt, vec!["a".into(), "b".into()], 0, "").unwrap()
    }

    #[test]
    fn categories_are_distinct_and_ordered() {
        let questions = vec![
            question("Kievan Rus", "q1"),
            question("Empire", "q2"),
            question("Kievan Rus", "q3"),
            question("USSR", "q4"),
            question("Empire", "q5"),
        ];

        assert_eq!(
            list_categories(&questions),
            vec!["Kievan Rus", "Empire", "USSR"]
        );
    }

    #[test]
    fn empty_bank_has_no_categories() {
        let bank = QuestionBank::new(vec![]);
        assert!(bank.is_empty());
        assert!(bank.categories().is_empty());
        assert_eq!(bank.category(0), None);
    }

    #[test]
    fn category_lookup_by_index() {
        let bank = QuestionBank::new(vec![question("Empire", "q1"), question("USSR", "q2")]);
        assert_eq!(bank.category(1), Some("USSR"));
        assert_eq!(bank.category(2), None);
    }
}
