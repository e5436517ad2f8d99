use std::{borrow::Cow, error::Error, num::TryFromIntError};

use sqlx::{postgres::PgPool, FromRow};
use uuid::Uuid;

use super::{question::QuestionRecord, RetrieveQuestions};

type GenericError = Result<u64, Box<dyn Error + Send + Sync>>;

pub struct Connection {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct QuestionRow {
    uuid: Uuid,
    category: String,
    prompt: String,
    options: Vec<String>,
    correct_option_index: i32,
    explanation: String,
}

/// `correct_option_index` is an INTEGER column.
fn index_column(index: usize) -> Result<i32, TryFromIntError> {
    i32::try_from(index)
}

impl Connection {
    pub async fn connect(connection_string: Cow<'_, str>) -> Result<Self, sqlx::Error> {
        let pool = PgPool::connect(&connection_string).await?;
        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        tracing::debug!("Running migrations");
        sqlx::migrate!().run(&self.pool).await
    }

    /// Fills an empty `questions` table; returns the number of inserted rows.
    pub async fn seed_if_empty(&self, questions: &[QuestionRecord]) -> GenericError {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions")
            .fetch_one(&self.pool)
            .await?;
        if count > 0 {
            tracing::debug!("Question table already holds {} rows", count);
            return Ok(0);
        }

        tracing::debug!("Creating transaction");
        let mut tx = self.pool.begin().await?;

        for question in questions {
            tracing::debug!(
                "Adding question '{}' with uuid {}",
                question.prompt(),
                question.id()
            );
            sqlx::query(
                "INSERT INTO questions (uuid, category, prompt, options, correct_option_index, explanation) VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(question.id())
            .bind(question.category())
            .bind(question.prompt())
            .bind(question.options())
            .bind(index_column(question.correct_option_index())?)
            .bind(question.explanation())
            .execute(&mut *tx)
            .await?;
        }

        tracing::debug!("Closing transaction");
        tx.commit().await?;

        Ok(questions.len() as u64)
    }
}

impl RetrieveQuestions for Connection {
    async fn retrieve_all_questions(
        &self,
    ) -> Result<Vec<QuestionRecord>, Box<dyn Error + Send + Sync>> {
        let rows: Vec<QuestionRow> = sqlx::query_as(
            "SELECT uuid, category, prompt, options, correct_option_index, explanation FROM questions ORDER BY position",
        )
        .fetch_all(&self.pool)
        .await?;

        let questions = rows
            .into_iter()
            .filter_map(|row| {
                let correct = usize::try_from(row.correct_option_index).unwrap_or(usize::MAX);
                match QuestionRecord::retrieve(
                    row.uuid,
                    row.category,
                    row.prompt,
                    row.options,
                    correct,
                    row.explanation,
                ) {
                    Ok(question) => Some(question),
                    Err(e) => {
                        tracing::warn!("Skipping question {}: {}", row.uuid, e);
                        None
                    }
                }
            })
            .collect();

        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_index_fits_integer_column() {
        assert_eq!(index_column(3), Ok(3));
        assert_eq!(index_column(i32::MAX as usize), Ok(i32::MAX));
    }

    #[test]
    fn oversized_option_index_is_rejected() {
        assert!(index_column(i32::MAX as usize + 1).is_err());
        assert!(index_column(usize::MAX).is_err());
    }
}
