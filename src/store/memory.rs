// src/store/memory.rs

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    error::AppError,
    models::{
        category::Category,
        participant::{NewParticipant, Participant, ParticipantResult},
        question::{NewQuestion, Question},
        quiz_config::QuizConfig,
    },
    store::QuizStore,
};

#[derive(Debug, Default)]
struct Tables {
    questions: Vec<Question>,
    participants: Vec<Participant>,
    config: Option<QuizConfig>,
    next_question_id: i64,
    next_participant_id: i64,
}

/// Process-local store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuizStore for MemoryStore {
    async fn insert_question(&self, new: NewQuestion) -> Result<Question, AppError> {
        let mut tables = self.tables.write().await;
        tables.next_question_id += 1;
        let question = Question {
            id: tables.next_question_id,
            category: new.category,
            question_text: new.question_text,
            options: new.options,
            marks: new.marks,
            difficulty: new.difficulty,
            created_at: Utc::now(),
        };
        tables.questions.push(question.clone());
        Ok(question)
    }

    async fn delete_question(&self, id: i64) -> Result<Option<Question>, AppError> {
        let mut tables = self.tables.write().await;
        let position = tables.questions.iter().position(|q| q.id == id);
        Ok(position.map(|idx| tables.questions.remove(idx)))
    }

    async fn questions_by_category(&self, category: Category) -> Result<Vec<Question>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .questions
            .iter()
            .filter(|q| q.category == category)
            .cloned()
            .collect())
    }

    async fn all_questions(&self) -> Result<Vec<Question>, AppError> {
        Ok(self.tables.read().await.questions.clone())
    }

    async fn load_config(&self) -> Result<Option<QuizConfig>, AppError> {
        Ok(self.tables.read().await.config.clone())
    }

    async fn save_config(&self, config: &QuizConfig) -> Result<(), AppError> {
        self.tables.write().await.config = Some(config.clone());
        Ok(())
    }

    async fn insert_participant(&self, new: NewParticipant) -> Result<Participant, AppError> {
        let mut tables = self.tables.write().await;
        if tables
            .participants
            .iter()
            .any(|p| p.roll_number == new.roll_number)
        {
            return Err(AppError::Conflict("Roll number already exists".to_string()));
        }

        tables.next_participant_id += 1;
        let participant = Participant {
            id: tables.next_participant_id,
            name: new.name,
            roll_number: new.roll_number,
            category: new.category,
            score: 0,
            marks_obtained: 0,
            total_marks: 0,
            percentage: 0.0,
            created_at: Utc::now(),
            submitted_at: None,
        };
        tables.participants.push(participant.clone());
        Ok(participant)
    }

    async fn find_participant(&self, id: i64) -> Result<Option<Participant>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.participants.iter().find(|p| p.id == id).cloned())
    }

    async fn record_result(&self, id: i64, result: &ParticipantResult) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let Some(participant) = tables.participants.iter_mut().find(|p| p.id == id) else {
            return Ok(false);
        };
        participant.score = result.score;
        participant.marks_obtained = result.marks_obtained;
        participant.total_marks = result.total_marks;
        participant.percentage = result.percentage;
        participant.submitted_at = Some(result.submitted_at);
        Ok(true)
    }

    async fn list_participants(&self) -> Result<Vec<Participant>, AppError> {
        let tables = self.tables.read().await;
        let mut participants = tables.participants.clone();
        participants.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(participants)
    }

    async fn delete_participant(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let before = tables.participants.len();
        tables.participants.retain(|p| p.id != id);
        Ok(tables.participants.len() < before)
    }

    async fn delete_all_participants(&self) -> Result<u64, AppError> {
        let mut tables = self.tables.write().await;
        let removed = tables.participants.len() as u64;
        tables.participants.clear();
        Ok(removed)
    }
}
