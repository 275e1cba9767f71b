// src/models/quiz_config.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    config::{DEFAULT_PASSING_PERCENTAGE, DEFAULT_QUIZ_TIME, DEFAULT_TOTAL_QUESTIONS},
    engine::readiness::{self, CategoryStatus},
    models::category::Category,
};

/// Quiz parameters plus the cached per-category readiness.
/// At most one instance exists in storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizConfig {
    /// Minutes allowed per attempt (1-180).
    pub quiz_time: i32,
    /// Pass threshold in percent (0-100).
    pub passing_percentage: f64,
    /// Cap on the number of questions graded per attempt.
    pub total_questions: i32,
    /// Cached readiness, replaced wholesale after every question mutation.
    pub category_status: BTreeMap<Category, CategoryStatus>,
    pub updated_at: DateTime<Utc>,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            quiz_time: DEFAULT_QUIZ_TIME,
            passing_percentage: DEFAULT_PASSING_PERCENTAGE,
            total_questions: DEFAULT_TOTAL_QUESTIONS,
            category_status: readiness::evaluate_all(&[]),
            updated_at: Utc::now(),
        }
    }
}

impl QuizConfig {
    /// Cached readiness of one category; missing entries count as not ready.
    pub fn is_ready(&self, category: Category) -> bool {
        self.category_status
            .get(&category)
            .is_some_and(|status| status.is_ready)
    }

    /// Applies the fields present in `req` and bumps `updated_at`.
    pub fn apply(&mut self, req: &UpdateConfigRequest) {
        if let Some(quiz_time) = req.quiz_time {
            self.quiz_time = quiz_time;
        }
        if let Some(passing_percentage) = req.passing_percentage {
            self.passing_percentage = passing_percentage;
        }
        if let Some(total_questions) = req.total_questions {
            self.total_questions = total_questions;
        }
        self.updated_at = Utc::now();
    }
}

/// DTO for updating quiz parameters. Fields are optional.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConfigRequest {
    #[validate(range(min = 1, max = 180, message = "Quiz time must be between 1 and 180 minutes"))]
    pub quiz_time: Option<i32>,
    #[validate(range(min = 0.0, max = 100.0, message = "Passing percentage must be between 0 and 100"))]
    pub passing_percentage: Option<f64>,
    #[validate(range(min = 1, message = "Total questions must be at least 1"))]
    pub total_questions: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = QuizConfig::default();
        assert_eq!(config.quiz_time, 30);
        assert_eq!(config.passing_percentage, 40.0);
        assert_eq!(config.total_questions, 100);
        assert_eq!(config.category_status.len(), Category::ALL.len());
        assert!(Category::ALL.iter().all(|c| !config.is_ready(*c)));
    }

    #[test]
    fn apply_only_touches_present_fields() {
        let mut config = QuizConfig::default();
        let req = UpdateConfigRequest {
            passing_percentage: Some(55.0),
            ..Default::default()
        };
        config.apply(&req);
        assert_eq!(config.passing_percentage, 55.0);
        assert_eq!(config.quiz_time, 30);
        assert_eq!(config.total_questions, 100);
    }

    #[test]
    fn update_ranges_are_validated() {
        let req = UpdateConfigRequest {
            quiz_time: Some(181),
            ..Default::default()
        };
        assert!(req.validate().is_err());

        let req = UpdateConfigRequest {
            total_questions: Some(0),
            ..Default::default()
        };
        assert!(req.validate().is_err());

        let req = UpdateConfigRequest {
            quiz_time: Some(180),
            passing_percentage: Some(0.0),
            total_questions: Some(1),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn round_trips_through_json_with_category_keys() {
        let config = QuizConfig::default();
        let json = serde_json::to_value(&config).unwrap();
        assert!(json["categoryStatus"]["node"]["isReady"].is_boolean());
        let back: QuizConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }
}
