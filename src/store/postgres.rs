// src/store/postgres.rs

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, types::Json};

use crate::{
    engine::readiness::CategoryStatus,
    error::AppError,
    models::{
        category::Category,
        participant::{NewParticipant, Participant, ParticipantResult},
        question::{NewQuestion, Question, QuestionOption},
        quiz_config::QuizConfig,
    },
    store::QuizStore,
};

const QUESTION_COLUMNS: &str =
    "id, category, question_text, options, marks, difficulty, created_at";

const PARTICIPANT_COLUMNS: &str = "id, name, roll_number, category, score, marks_obtained, \
     total_marks, percentage, created_at, submitted_at";

/// Postgres-backed store. Schema lives in `migrations/`.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Raw row of the 'questions' table.
#[derive(FromRow)]
struct QuestionRow {
    id: i64,
    category: String,
    question_text: String,
    options: Json<Vec<QuestionOption>>,
    marks: i64,
    difficulty: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<QuestionRow> for Question {
    type Error = AppError;

    fn try_from(row: QuestionRow) -> Result<Self, Self::Error> {
        Ok(Question {
            id: row.id,
            category: parse_stored_category(&row.category)?,
            question_text: row.question_text,
            options: row.options.0,
            marks: row.marks,
            difficulty: row.difficulty,
            created_at: row.created_at,
        })
    }
}

/// Raw row of the 'participants' table.
#[derive(FromRow)]
struct ParticipantRow {
    id: i64,
    name: String,
    roll_number: String,
    category: String,
    score: i64,
    marks_obtained: i64,
    total_marks: i64,
    percentage: f64,
    created_at: DateTime<Utc>,
    submitted_at: Option<DateTime<Utc>>,
}

impl TryFrom<ParticipantRow> for Participant {
    type Error = AppError;

    fn try_from(row: ParticipantRow) -> Result<Self, Self::Error> {
        Ok(Participant {
            id: row.id,
            name: row.name,
            roll_number: row.roll_number,
            category: parse_stored_category(&row.category)?,
            score: row.score,
            marks_obtained: row.marks_obtained,
            total_marks: row.total_marks,
            percentage: row.percentage,
            created_at: row.created_at,
            submitted_at: row.submitted_at,
        })
    }
}

#[derive(FromRow)]
struct ConfigRow {
    quiz_time: i32,
    passing_percentage: f64,
    total_questions: i32,
    category_status: Json<BTreeMap<Category, CategoryStatus>>,
    updated_at: DateTime<Utc>,
}

fn parse_stored_category(raw: &str) -> Result<Category, AppError> {
    raw.parse().map_err(|_| {
        tracing::error!("Unknown category '{}' found in storage", raw);
        AppError::InternalServerError(format!("Unknown stored category '{}'", raw))
    })
}

fn into_questions(rows: Vec<QuestionRow>) -> Result<Vec<Question>, AppError> {
    rows.into_iter().map(Question::try_from).collect()
}

#[async_trait]
impl QuizStore for PgStore {
    async fn insert_question(&self, new: NewQuestion) -> Result<Question, AppError> {
        let row = sqlx::query_as::<_, QuestionRow>(&format!(
            r#"
            INSERT INTO questions (category, question_text, options, marks, difficulty)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {QUESTION_COLUMNS}
            "#
        ))
        .bind(new.category.as_str())
        .bind(&new.question_text)
        .bind(Json(&new.options))
        .bind(new.marks)
        .bind(&new.difficulty)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn delete_question(&self, id: i64) -> Result<Option<Question>, AppError> {
        let row = sqlx::query_as::<_, QuestionRow>(&format!(
            "DELETE FROM questions WHERE id = $1 RETURNING {QUESTION_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Question::try_from).transpose()
    }

    async fn questions_by_category(&self, category: Category) -> Result<Vec<Question>, AppError> {
        let rows = sqlx::query_as::<_, QuestionRow>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions WHERE category = $1 ORDER BY id ASC"
        ))
        .bind(category.as_str())
        .fetch_all(&self.pool)
        .await?;

        into_questions(rows)
    }

    async fn all_questions(&self) -> Result<Vec<Question>, AppError> {
        let rows = sqlx::query_as::<_, QuestionRow>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        into_questions(rows)
    }

    async fn load_config(&self) -> Result<Option<QuizConfig>, AppError> {
        let row = sqlx::query_as::<_, ConfigRow>(
            r#"
            SELECT quiz_time, passing_percentage, total_questions, category_status, updated_at
            FROM quiz_config
            WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| QuizConfig {
            quiz_time: row.quiz_time,
            passing_percentage: row.passing_percentage,
            total_questions: row.total_questions,
            category_status: row.category_status.0,
            updated_at: row.updated_at,
        }))
    }

    async fn save_config(&self, config: &QuizConfig) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO quiz_config
            (id, quiz_time, passing_percentage, total_questions, category_status, updated_at)
            VALUES (1, $1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                quiz_time = EXCLUDED.quiz_time,
                passing_percentage = EXCLUDED.passing_percentage,
                total_questions = EXCLUDED.total_questions,
                category_status = EXCLUDED.category_status,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(config.quiz_time)
        .bind(config.passing_percentage)
        .bind(config.total_questions)
        .bind(Json(&config.category_status))
        .bind(config.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn insert_participant(&self, new: NewParticipant) -> Result<Participant, AppError> {
        let row = sqlx::query_as::<_, ParticipantRow>(&format!(
            r#"
            INSERT INTO participants (name, roll_number, category)
            VALUES ($1, $2, $3)
            RETURNING {PARTICIPANT_COLUMNS}
            "#
        ))
        .bind(&new.name)
        .bind(&new.roll_number)
        .bind(new.category.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::Conflict("Roll number already exists".to_string());
                }
            }
            tracing::error!("Failed to register participant: {:?}", e);
            AppError::from(e)
        })?;

        row.try_into()
    }

    async fn find_participant(&self, id: i64) -> Result<Option<Participant>, AppError> {
        let row = sqlx::query_as::<_, ParticipantRow>(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Participant::try_from).transpose()
    }

    async fn record_result(&self, id: i64, result: &ParticipantResult) -> Result<bool, AppError> {
        let outcome = sqlx::query(
            r#"
            UPDATE participants
            SET score = $1, marks_obtained = $2, total_marks = $3, percentage = $4, submitted_at = $5
            WHERE id = $6
            "#,
        )
        .bind(result.score)
        .bind(result.marks_obtained)
        .bind(result.total_marks)
        .bind(result.percentage)
        .bind(result.submitted_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(outcome.rows_affected() > 0)
    }

    async fn list_participants(&self) -> Result<Vec<Participant>, AppError> {
        let rows = sqlx::query_as::<_, ParticipantRow>(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Participant::try_from).collect()
    }

    async fn delete_participant(&self, id: i64) -> Result<bool, AppError> {
        let outcome = sqlx::query("DELETE FROM participants WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(outcome.rows_affected() > 0)
    }

    async fn delete_all_participants(&self) -> Result<u64, AppError> {
        let outcome = sqlx::query("DELETE FROM participants")
            .execute(&self.pool)
            .await?;

        Ok(outcome.rows_affected())
    }
}
