// src/models/participant.rs

use std::{collections::HashMap, sync::LazyLock};

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{error::AppError, models::category::Category, utils::html::clean_text};

static ROLL_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_/-]+$").expect("valid roll number regex"));

/// A registered student and the result of their latest submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: i64,
    pub name: String,
    /// Unique across all participants.
    pub roll_number: String,
    pub category: Category,
    /// Number of correctly answered questions.
    pub score: i64,
    pub marks_obtained: i64,
    /// Possible marks of the graded subset.
    pub total_marks: i64,
    pub percentage: f64,
    pub created_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl Participant {
    pub fn has_submitted(&self) -> bool {
        self.submitted_at.is_some()
    }
}

/// Result fields written back by a submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantResult {
    pub score: i64,
    pub marks_obtained: i64,
    pub total_marks: i64,
    pub percentage: f64,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewParticipant {
    pub name: String,
    pub roll_number: String,
    pub category: Category,
}

/// DTO for student registration.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(
        length(min = 1, max = 50, message = "Roll number is required"),
        regex(path = *ROLL_NUMBER_RE, message = "Roll number may only contain letters, digits, '-', '_' and '/'")
    )]
    pub roll_number: String,
    #[validate(length(min = 1, max = 50, message = "Category is required"))]
    pub category: String,
}

impl RegisterRequest {
    pub fn into_new_participant(self) -> Result<NewParticipant, AppError> {
        self.validate()?;
        let category: Category = self.category.parse()?;
        Ok(NewParticipant {
            name: clean_text(&self.name),
            roll_number: self.roll_number.trim().to_string(),
            category,
        })
    }
}

/// DTO for submitting a quiz attempt.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizRequest {
    #[serde(alias = "userId")]
    pub participant_id: i64,

    /// User's answers map.
    /// Key: Question ID (i64)
    /// Value: text of the chosen option
    #[serde(default)]
    pub answers: HashMap<i64, String>,
}

/// Row of the admin results listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEntry {
    pub id: i64,
    pub name: String,
    pub roll_number: String,
    pub category: Category,
    pub score: i64,
    pub percentage: f64,
    pub marks_obtained: i64,
    pub total_marks: i64,
    pub created_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub passed: bool,
}
