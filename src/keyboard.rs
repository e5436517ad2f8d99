use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::{
    database::question::RANDOM_CATEGORY,
    engine::QuestionPrompt,
};

const CATEGORY_PREFIX: &str = "cat";
const ANSWER_PREFIX: &str = "ans";

/// Payload of an inline button, kept well below Telegram's 64 byte limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackData {
    /// Index into the bank's category list.
    Category(usize),
    RandomCategory,
    Answer { question: usize, token: usize },
}

impl CallbackData {
    pub fn encode(&self) -> String {
        match self {
            CallbackData::Category(idx) => format!("{}:{}", CATEGORY_PREFIX, idx),
            CallbackData::RandomCategory => format!("{}:{}", CATEGORY_PREFIX, RANDOM_CATEGORY),
            CallbackData::Answer { question, token } => {
                format!("{}:{}:{}", ANSWER_PREFIX, question, token)
            }
        }
    }

    pub fn parse(data: &str) -> Option<Self> {
        let mut parts = data.split(':');
        let parsed = match (parts.next()?, parts.next()?) {
            (CATEGORY_PREFIX, RANDOM_CATEGORY) => CallbackData::RandomCategory,
            (CATEGORY_PREFIX, idx) => CallbackData::Category(idx.parse().ok()?),
            (ANSWER_PREFIX, question) => CallbackData::Answer {
                question: question.parse().ok()?,
                token: parts.next()?.parse().ok()?,
            },
            _ => return None,
        };

        match parts.next() {
            Some(_) => None,
            None => Some(parsed),
        }
    }
}

pub(crate) fn categories_keyboard(categories: &[String]) -> InlineKeyboardMarkup {
    let mut keyboard: Vec<Vec<InlineKeyboardButton>> = categories
        .iter()
        .enumerate()
        .map(|(idx, category)| {
            vec![InlineKeyboardButton::callback(
                category,
                CallbackData::Category(idx).encode(),
            )]
        })
        .collect();

    keyboard.push(vec![InlineKeyboardButton::callback(
        "Random questions🎲",
        CallbackData::RandomCategory.encode(),
    )]);

    InlineKeyboardMarkup::new(keyboard)
}

pub(crate) fn answers_keyboard(prompt: &QuestionPrompt) -> InlineKeyboardMarkup {
    let keyboard: Vec<Vec<InlineKeyboardButton>> = prompt
        .options
        .iter()
        .map(|option| {
            vec![InlineKeyboardButton::callback(
                &option.text,
                CallbackData::Answer {
                    question: prompt.question_idx(),
                    token: option.token,
                }
                .encode(),
            )]
        })
        .collect();

    InlineKeyboardMarkup::new(keyboard)
}

#[cfg(test)]
mod tests {
    use teloxide::types::InlineKeyboardButtonKind;

    use super::*;
    use crate::engine::AnswerOption;

    #[test]
    fn callback_data_round_trips() {
        for data in [
            CallbackData::Category(3),
            CallbackData::RandomCategory,
            CallbackData::Answer {
                question: 9,
                token: 2,
            },
        ] {
            assert_eq!(CallbackData::parse(&data.encode()), Some(data));
        }
    }

    #[test]
    fn malformed_callback_data_is_rejected() {
        for data in ["", "cat", "cat:x", "ans:1", "ans:1:two", "ans:1:2:3", "vote:1", "1:2"] {
            assert_eq!(CallbackData::parse(data), None, "{data}");
        }
    }

    #[test]
    fn category_keyboard_ends_with_random() {
        let keyboard = categories_keyboard(&["Rus".to_string(), "Empire".to_string()]);
        let rows = &keyboard.inline_keyboard;

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2][0].text, "Random questions🎲");
        assert_eq!(
            rows[1][0].kind,
            InlineKeyboardButtonKind::CallbackData("cat:1".into())
        );
    }

    #[test]
    fn answer_buttons_carry_question_and_token() {
        let prompt = QuestionPrompt {
            number: 4,
            total: 10,
            text: "Who?".into(),
            options: vec![
                AnswerOption {
                    text: "Oleg".into(),
                    token: 0,
                },
                AnswerOption {
                    text: "Rurik".into(),
                    token: 1,
                },
            ],
        };

        let keyboard = answers_keyboard(&prompt);
        let rows = &keyboard.inline_keyboard;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0].text, "Rurik");
        assert_eq!(
            rows[1][0].kind,
            InlineKeyboardButtonKind::CallbackData("ans:3:1".into())
        );
    }
}
