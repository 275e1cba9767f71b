// src/models/question.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{error::AppError, models::category::Category, utils::html::clean_text};

pub const DEFAULT_DIFFICULTY: &str = "medium";

/// A single answer choice of a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOption {
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

/// A stored question. Immutable once created; only deletion is supported.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,
    pub category: Category,
    pub question_text: String,
    /// Ordered answer choices, at least one flagged correct.
    pub options: Vec<QuestionOption>,
    pub marks: i64,
    pub difficulty: String,
    pub created_at: DateTime<Utc>,
}

impl Question {
    /// Point value used for readiness totals and grading.
    /// Non-positive stored marks count as 1.
    pub fn effective_marks(&self) -> i64 {
        if self.marks > 0 { self.marks } else { 1 }
    }

    /// The first option flagged correct.
    pub fn correct_option(&self) -> Option<&QuestionOption> {
        self.options.iter().find(|opt| opt.is_correct)
    }
}

/// A validated question ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub category: Category,
    pub question_text: String,
    pub options: Vec<QuestionOption>,
    pub marks: i64,
    pub difficulty: String,
}

/// DTO for sending a question to students (excludes correctness flags).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuestion {
    pub id: i64,
    pub category: Category,
    pub question_text: String,
    pub options: Vec<String>,
    pub marks: i64,
    pub difficulty: String,
}

impl From<&Question> for PublicQuestion {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id,
            category: q.category,
            question_text: q.question_text.clone(),
            options: q.options.iter().map(|opt| opt.text.clone()).collect(),
            marks: q.effective_marks(),
            difficulty: q.difficulty.clone(),
        }
    }
}

/// DTO for creating a new question.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 50, message = "Category is required"))]
    pub category: String,
    #[validate(length(min = 1, max = 1000, message = "Question text is required"))]
    pub question_text: String,
    #[validate(custom(function = validate_options))]
    pub options: Vec<QuestionOption>,
    #[validate(range(min = 1, max = 100, message = "Marks must be between 1 and 100"))]
    pub marks: Option<i64>,
    #[validate(length(max = 20))]
    pub difficulty: Option<String>,
}

impl CreateQuestionRequest {
    /// Validates the payload and normalizes it for storage: lowercases the
    /// category, trims and sanitizes text, drops blank options and applies
    /// the marks/difficulty defaults.
    pub fn into_new_question(self) -> Result<NewQuestion, AppError> {
        self.validate()?;

        let category: Category = self.category.parse()?;

        let question_text = clean_text(&self.question_text);
        if question_text.is_empty() {
            return Err(AppError::BadRequest("Question text is required".to_string()));
        }

        let options = self
            .options
            .into_iter()
            .filter(|opt| !opt.text.trim().is_empty())
            .map(|opt| QuestionOption {
                text: clean_text(&opt.text),
                is_correct: opt.is_correct,
            })
            .collect();

        let difficulty = self
            .difficulty
            .map(|d| d.trim().to_lowercase())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| DEFAULT_DIFFICULTY.to_string());

        Ok(NewQuestion {
            category,
            question_text,
            options,
            marks: self.marks.unwrap_or(1),
            difficulty,
        })
    }
}

fn validate_options(options: &[QuestionOption]) -> Result<(), validator::ValidationError> {
    let filled: Vec<&QuestionOption> = options
        .iter()
        .filter(|opt| !opt.text.trim().is_empty())
        .collect();

    if filled.len() < 2 {
        return Err(validator::ValidationError::new("options_too_few")
            .with_message("At least 2 options are required".into()));
    }
    if !filled.iter().any(|opt| opt.is_correct) {
        return Err(validator::ValidationError::new("no_correct_option")
            .with_message("At least one option must be marked as correct".into()));
    }
    for opt in filled {
        if opt.text.len() > 500 {
            return Err(validator::ValidationError::new("option_too_long"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(text: &str, is_correct: bool) -> QuestionOption {
        QuestionOption {
            text: text.to_string(),
            is_correct,
        }
    }

    fn request() -> CreateQuestionRequest {
        CreateQuestionRequest {
            category: "Node".to_string(),
            question_text: "  What runs Node?  ".to_string(),
            options: vec![option("V8", true), option("  ", false), option("SpiderMonkey", false)],
            marks: None,
            difficulty: None,
        }
    }

    #[test]
    fn normalizes_and_applies_defaults() {
        let q = request().into_new_question().unwrap();
        assert_eq!(q.category, Category::Node);
        assert_eq!(q.question_text, "What runs Node?");
        assert_eq!(q.options.len(), 2);
        assert_eq!(q.marks, 1);
        assert_eq!(q.difficulty, "medium");
    }

    #[test]
    fn blank_options_do_not_count() {
        let mut req = request();
        req.options = vec![option("V8", true), option("", false)];
        assert!(matches!(req.into_new_question(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn requires_a_correct_option() {
        let mut req = request();
        req.options = vec![option("V8", false), option("Chakra", false)];
        let err = req.into_new_question().unwrap_err();
        assert!(err.to_string().contains("marked as correct"));
    }

    #[test]
    fn rejects_zero_marks_and_unknown_category() {
        let mut req = request();
        req.marks = Some(0);
        assert!(req.into_new_question().is_err());

        let mut req = request();
        req.category = "rust".to_string();
        assert!(req.into_new_question().is_err());
    }

    #[test]
    fn effective_marks_falls_back_to_one() {
        let q = Question {
            id: 1,
            category: Category::React,
            question_text: "q".to_string(),
            options: vec![option("a", true), option("b", false)],
            marks: 0,
            difficulty: DEFAULT_DIFFICULTY.to_string(),
            created_at: Utc::now(),
        };
        assert_eq!(q.effective_marks(), 1);
        assert_eq!(q.correct_option().map(|o| o.text.as_str()), Some("a"));
    }
}
