use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::database::Database;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i32,
}

/// Body of `POST /api/questions`.
///
/// Every field is optional at the serde level so a missing one surfaces as
/// a validation failure rather than a body rejection.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewQuestion {
    #[validate(required, length(min = 1))]
    pub question: Option<String>,
    #[validate(required, length(min = 1))]
    pub answer: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    #[validate(required)]
    pub difficulty: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    #[validate(required)]
    pub category: Option<i64>,
}

/// Accepts `3` as well as `"3"`; blank strings count as absent.
pub(crate) fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrString {
        Int(i64),
        Str(String),
    }

    match Option::<IntOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(IntOrString::Int(n)) => Ok(Some(n)),
        Some(IntOrString::Str(s)) if s.trim().is_empty() => Ok(None),
        Some(IntOrString::Str(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("not an integer: {:?}", s))),
    }
}

const QUESTION_COLUMNS: &str = "id, question, answer, category, difficulty";

impl Question {
    pub async fn count(db: &Database) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM questions")
            .fetch_one(&db.pool)
            .await
    }

    pub async fn page(db: &Database, limit: i64, offset: i64) -> Result<Vec<Question>, sqlx::Error> {
        sqlx::query_as::<_, Question>(&format!(
            "SELECT {} FROM questions ORDER BY category, difficulty, id LIMIT $1 OFFSET $2",
            QUESTION_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&db.pool)
        .await
    }

    pub async fn search(db: &Database, term: &str) -> Result<Vec<Question>, sqlx::Error> {
        sqlx::query_as::<_, Question>(&format!(
            r"SELECT {} FROM questions WHERE question ILIKE $1 ESCAPE '\' ORDER BY category, difficulty, id",
            QUESTION_COLUMNS
        ))
        .bind(super::like_pattern(term))
        .fetch_all(&db.pool)
        .await
    }

    pub async fn by_category(db: &Database, category: i64) -> Result<Vec<Question>, sqlx::Error> {
        sqlx::query_as::<_, Question>(&format!(
            "SELECT {} FROM questions WHERE category = $1 ORDER BY difficulty, id",
            QUESTION_COLUMNS
        ))
        .bind(category)
        .fetch_all(&db.pool)
        .await
    }

    pub async fn insert(
        db: &Database,
        question: &str,
        answer: &str,
        category: i64,
        difficulty: i32,
    ) -> Result<Question, sqlx::Error> {
        sqlx::query_as::<_, Question>(&format!(
            "INSERT INTO questions (question, answer, category, difficulty) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            QUESTION_COLUMNS
        ))
        .bind(question)
        .bind(answer)
        .bind(category)
        .bind(difficulty)
        .fetch_one(&db.pool)
        .await
    }

    pub async fn delete(db: &Database, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(&db.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// One random question not in `excluded`; `category == 0` means any category.
    pub async fn random_excluding(
        db: &Database,
        category: i64,
        excluded: &[i64],
    ) -> Result<Option<Question>, sqlx::Error> {
        sqlx::query_as::<_, Question>(&format!(
            r#"
            SELECT {} FROM questions
            WHERE ($1 = 0 OR category = $1)
              AND NOT (id = ANY($2))
            ORDER BY random()
            LIMIT 1
            "#,
            QUESTION_COLUMNS
        ))
        .bind(category)
        .bind(excluded)
        .fetch_optional(&db.pool)
        .await
    }
}
