// src/engine/readiness.rs

//! Category readiness: how many marks a category holds, whether it has
//! reached the cap, and whether one more question still fits.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    config::CATEGORY_MARKS_CAP,
    error::AppError,
    models::{category::Category, question::Question, quiz_config::QuizConfig},
};

/// Derived state of one category. Never authored directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStatus {
    pub total_marks: i64,
    pub question_count: i64,
    pub is_ready: bool,
    /// Share of the cap filled. Not clamped; exceeds 100 on overshoot.
    pub percentage: f64,
    /// May go negative on overshoot.
    pub remaining_marks: i64,
    pub average_marks: f64,
}

/// Sum of effective marks over the questions of `category`.
pub fn total_marks(category: Category, questions: &[Question]) -> i64 {
    questions
        .iter()
        .filter(|q| q.category == category)
        .map(Question::effective_marks)
        .sum()
}

/// Computes the status of `category` from `questions`, which may contain
/// questions of other categories.
pub fn evaluate(category: Category, questions: &[Question]) -> CategoryStatus {
    let (total_marks, question_count) = questions
        .iter()
        .filter(|q| q.category == category)
        .fold((0i64, 0i64), |(marks, count), q| {
            (marks + q.effective_marks(), count + 1)
        });

    let average_marks = if question_count > 0 {
        round2(total_marks as f64 / question_count as f64)
    } else {
        0.0
    };

    CategoryStatus {
        total_marks,
        question_count,
        is_ready: total_marks >= CATEGORY_MARKS_CAP,
        percentage: total_marks as f64 / CATEGORY_MARKS_CAP as f64 * 100.0,
        remaining_marks: CATEGORY_MARKS_CAP - total_marks,
        average_marks,
    }
}

/// Status of every category, in category order.
pub fn evaluate_all(questions: &[Question]) -> BTreeMap<Category, CategoryStatus> {
    Category::ALL
        .into_iter()
        .map(|category| (category, evaluate(category, questions)))
        .collect()
}

/// Admission control for a new question worth `new_marks`.
/// Rejects when the category total would pass the cap; no partial acceptance.
pub fn check_admission(
    category: Category,
    current_marks: i64,
    new_marks: i64,
) -> Result<(), AppError> {
    if current_marks + new_marks > CATEGORY_MARKS_CAP {
        return Err(AppError::CapacityExceeded {
            category,
            current_marks,
            remaining_marks: CATEGORY_MARKS_CAP - current_marks,
        });
    }
    Ok(())
}

/// Categories students may see, according to the cached status.
pub fn available_categories(config: &QuizConfig) -> Vec<Category> {
    Category::ALL
        .into_iter()
        .filter(|category| config.is_ready(*category))
        .collect()
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
