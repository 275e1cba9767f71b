// src/engine/scoring.rs

use std::collections::HashMap;

use chrono::Utc;
use serde::Serialize;

use crate::{
    engine::readiness::round2,
    models::{
        category::Category,
        participant::{Participant, ParticipantResult},
        question::Question,
        quiz_config::QuizConfig,
    },
};

/// Outcome of grading one submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    /// Number of correctly answered questions.
    pub score: i64,
    pub marks_obtained: i64,
    /// Possible marks of the graded subset.
    pub total_marks: i64,
    /// Rounded to two decimals.
    pub percentage: f64,
    pub passed: bool,
    /// Number of questions graded.
    pub total_questions: i64,
    pub category: Category,
}

impl ScoreResult {
    /// Fields persisted onto the participant record.
    pub fn to_participant_result(&self) -> ParticipantResult {
        ParticipantResult {
            score: self.score,
            marks_obtained: self.marks_obtained,
            total_marks: self.total_marks,
            percentage: self.percentage,
            submitted_at: Utc::now(),
        }
    }
}

/// Grades `answers` against the first `config.total_questions` of
/// `questions`, which must be the participant's category bank in storage
/// order.
///
/// An answer counts only when it is byte-for-byte equal to the text of the
/// question's correct option.
pub fn score(
    participant: &Participant,
    questions: &[Question],
    answers: &HashMap<i64, String>,
    config: &QuizConfig,
) -> ScoreResult {
    let graded = questions.len().min(config.total_questions.max(1) as usize);

    let mut score = 0;
    let mut marks_obtained = 0;
    let mut total_marks = 0;

    for question in &questions[..graded] {
        let question_marks = question.effective_marks();
        total_marks += question_marks;

        let Some(answer) = answers.get(&question.id) else {
            continue;
        };

        if question
            .correct_option()
            .is_some_and(|correct| correct.text == *answer)
        {
            score += 1;
            marks_obtained += question_marks;
        }
    }

    let percentage = if total_marks > 0 {
        round2(marks_obtained as f64 / total_marks as f64 * 100.0)
    } else {
        0.0
    };

    ScoreResult {
        score,
        marks_obtained,
        total_marks,
        percentage,
        passed: percentage >= config.passing_percentage,
        total_questions: graded as i64,
        category: participant.category,
    }
}
