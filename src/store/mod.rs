// src/store/mod.rs

//! Persistence collaborator. Handlers and the engine talk to storage only
//! through [`QuizStore`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{
        category::Category,
        participant::{NewParticipant, Participant, ParticipantResult},
        question::{NewQuestion, Question},
        quiz_config::QuizConfig,
    },
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub type SharedStore = Arc<dyn QuizStore>;

#[async_trait]
pub trait QuizStore: Send + Sync {
    async fn insert_question(&self, new: NewQuestion) -> Result<Question, AppError>;

    /// Removes the question and returns it, or `None` when the id is unknown.
    async fn delete_question(&self, id: i64) -> Result<Option<Question>, AppError>;

    /// Questions of one category in storage (insertion) order.
    async fn questions_by_category(&self, category: Category) -> Result<Vec<Question>, AppError>;

    /// Every question in storage order.
    async fn all_questions(&self) -> Result<Vec<Question>, AppError>;

    async fn load_config(&self) -> Result<Option<QuizConfig>, AppError>;

    /// Inserts or replaces the singleton.
    async fn save_config(&self, config: &QuizConfig) -> Result<(), AppError>;

    /// Fails with `Conflict` when the roll number is taken.
    async fn insert_participant(&self, new: NewParticipant) -> Result<Participant, AppError>;

    async fn find_participant(&self, id: i64) -> Result<Option<Participant>, AppError>;

    /// Overwrites the result fields. Returns `false` when the id is unknown.
    async fn record_result(&self, id: i64, result: &ParticipantResult) -> Result<bool, AppError>;

    /// All participants, newest registration first.
    async fn list_participants(&self) -> Result<Vec<Participant>, AppError>;

    async fn delete_participant(&self, id: i64) -> Result<bool, AppError>;

    /// Returns the number of removed participants.
    async fn delete_all_participants(&self) -> Result<u64, AppError>;
}
