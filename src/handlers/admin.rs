// src/handlers/admin.rs

use std::collections::BTreeMap;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use validator::Validate;

use crate::{
    engine::{
        self,
        readiness::{self, round2},
    },
    error::AppError,
    extract::{Json, Path},
    models::{
        category::Category,
        participant::{Participant, ResultEntry},
        question::CreateQuestionRequest,
        quiz_config::{QuizConfig, UpdateConfigRequest},
    },
    store::SharedStore,
};

/// Returns the quiz configuration, creating it with defaults if absent.
pub async fn get_config(State(store): State<SharedStore>) -> Result<impl IntoResponse, AppError> {
    let (config, degraded) = super::or_degraded(
        engine::resolve_config(store.as_ref()).await,
        "loading config",
        QuizConfig::default,
    )?;

    Ok(Json(json!({
        "success": true,
        "degraded": degraded,
        "config": config,
    })))
}

/// Updates quiz time, passing percentage and graded question cap.
/// Absent fields keep their current value.
pub async fn update_config(
    State(store): State<SharedStore>,
    Json(payload): Json<UpdateConfigRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let mut config = engine::resolve_config(store.as_ref()).await?;
    config.apply(&payload);
    store.save_config(&config).await?;

    tracing::info!(
        "Quiz config updated: time={}m passing={}% questions={}",
        config.quiz_time,
        config.passing_percentage,
        config.total_questions
    );

    Ok(Json(json!({
        "success": true,
        "message": "Configuration updated successfully",
        "config": {
            "quizTime": config.quiz_time,
            "passingPercentage": config.passing_percentage,
            "totalQuestions": config.total_questions,
            "updatedAt": config.updated_at,
        }
    })))
}

/// Lists every question, grouped by category with the newest first.
pub async fn list_questions(
    State(store): State<SharedStore>,
) -> Result<impl IntoResponse, AppError> {
    let (mut questions, degraded) =
        super::or_degraded(store.all_questions().await, "listing questions", Vec::new)?;

    questions.sort_by(|a, b| {
        a.category
            .cmp(&b.category)
            .then(b.created_at.cmp(&a.created_at))
            .then(b.id.cmp(&a.id))
    });

    Ok(Json(json!({
        "success": true,
        "degraded": degraded,
        "count": questions.len(),
        "questions": questions,
    })))
}

/// Adds a question after checking it fits under the category marks cap,
/// then recomputes readiness for every category. A failed recomputation is
/// logged and the reported status is evaluated from the local bank instead.
pub async fn create_question(
    State(store): State<SharedStore>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new_question = payload.into_new_question()?;
    let category = new_question.category;

    let existing = store.questions_by_category(category).await?;
    let current_marks = readiness::total_marks(category, &existing);

    if let Err(e) = readiness::check_admission(category, current_marks, new_question.marks) {
        tracing::warn!(
            "Rejected {}-mark question for '{}': {}/{} marks used",
            new_question.marks,
            category,
            current_marks,
            crate::config::CATEGORY_MARKS_CAP
        );
        return Err(e);
    }

    let question = store.insert_question(new_question).await?;
    tracing::info!("Question {} added to '{}'", question.id, category);

    // Insert already committed; report a status even if the refresh fails.
    let status = match engine::refresh_category_status(store.as_ref()).await {
        Ok(config) => config
            .category_status
            .get(&category)
            .cloned()
            .unwrap_or_else(|| readiness::evaluate(category, &[])),
        Err(e) => {
            tracing::error!("Failed to refresh category status after adding question {}: {}", question.id, e);
            let mut bank = existing;
            bank.push(question.clone());
            readiness::evaluate(category, &bank)
        }
    };

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Question added successfully",
            "question": question,
            "categoryStatus": {
                "currentMarks": status.total_marks,
                "isReady": status.is_ready,
                "remaining": status.remaining_marks,
            }
        })),
    ))
}

/// Deletes a question by ID and recomputes readiness.
pub async fn delete_question(
    State(store): State<SharedStore>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let question = store
        .delete_question(id)
        .await?
        .ok_or(AppError::NotFound("Question not found".to_string()))?;

    tracing::info!("Question {} deleted from '{}'", question.id, question.category);
    if let Err(e) = engine::refresh_category_status(store.as_ref()).await {
        tracing::error!("Failed to refresh category status after deleting question {}: {}", question.id, e);
    }

    Ok(Json(json!({
        "success": true,
        "message": "Question deleted successfully",
        "deletedQuestion": {
            "id": question.id,
            "category": question.category,
            "questionText": question.question_text,
        }
    })))
}

/// Lists every participant with their latest result, newest first.
pub async fn list_results(State(store): State<SharedStore>) -> Result<impl IntoResponse, AppError> {
    let (participants, degraded) =
        super::or_degraded(store.list_participants().await, "listing results", Vec::new)?;
    let (config, _) = super::or_degraded(
        engine::resolve_config(store.as_ref()).await,
        "loading config",
        QuizConfig::default,
    )?;

    let results: Vec<ResultEntry> = participants
        .into_iter()
        .map(|p| to_result_entry(p, config.passing_percentage))
        .collect();

    Ok(Json(json!({
        "success": true,
        "degraded": degraded,
        "count": results.len(),
        "results": results,
    })))
}

/// Purges one participant and their result.
pub async fn delete_result(
    State(store): State<SharedStore>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !store.delete_participant(id).await? {
        return Err(AppError::NotFound("Result not found".to_string()));
    }

    tracing::info!("Participant {} deleted", id);
    Ok(Json(json!({
        "success": true,
        "message": "Result deleted successfully",
    })))
}

/// Purges every participant.
pub async fn delete_all_results(
    State(store): State<SharedStore>,
) -> Result<impl IntoResponse, AppError> {
    let removed = store.delete_all_participants().await?;

    tracing::warn!("All results deleted ({} participants)", removed);
    Ok(Json(json!({
        "success": true,
        "message": "All results deleted successfully",
        "deleted": removed,
    })))
}

/// Aggregated attempt figures for the dashboard.
#[derive(Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptSummary {
    pub total_students: usize,
    pub total_attempts: usize,
    pub average_score: f64,
    pub pass_rate: f64,
    pub today_attempts: usize,
}

/// Summarizes submitted attempts. Registered participants without a
/// submission count as students but not as attempts.
fn summarize_attempts(
    participants: &[Participant],
    passing_percentage: f64,
    now: DateTime<Utc>,
) -> AttemptSummary {
    let start_of_day = now
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|midnight| midnight.and_utc())
        .unwrap_or(now);

    let attempts: Vec<&Participant> = participants.iter().filter(|p| p.has_submitted()).collect();
    let total_attempts = attempts.len();

    if total_attempts == 0 {
        return AttemptSummary {
            total_students: participants.len(),
            ..Default::default()
        };
    }

    let total_percentage: f64 = attempts.iter().map(|p| p.percentage).sum();
    let passed = attempts
        .iter()
        .filter(|p| p.percentage >= passing_percentage)
        .count();
    let today_attempts = attempts
        .iter()
        .filter(|p| p.submitted_at.is_some_and(|at| at >= start_of_day))
        .count();

    AttemptSummary {
        total_students: participants.len(),
        total_attempts,
        average_score: round2(total_percentage / total_attempts as f64),
        pass_rate: round2(passed as f64 / total_attempts as f64 * 100.0),
        today_attempts,
    }
}

fn to_result_entry(p: Participant, passing_percentage: f64) -> ResultEntry {
    let passed = p.has_submitted() && p.percentage >= passing_percentage;
    ResultEntry {
        id: p.id,
        name: p.name,
        roll_number: p.roll_number,
        category: p.category,
        score: p.score,
        percentage: round2(p.percentage),
        marks_obtained: p.marks_obtained,
        total_marks: p.total_marks,
        created_at: p.created_at,
        submitted_at: p.submitted_at,
        passed,
    }
}

/// Headline dashboard numbers.
pub async fn dashboard(State(store): State<SharedStore>) -> Result<impl IntoResponse, AppError> {
    let (participants, degraded_participants) =
        super::or_degraded(store.list_participants().await, "loading dashboard", Vec::new)?;
    let (questions, degraded_questions) =
        super::or_degraded(store.all_questions().await, "loading dashboard", Vec::new)?;
    let (config, _) = super::or_degraded(
        engine::resolve_config(store.as_ref()).await,
        "loading config",
        QuizConfig::default,
    )?;

    let summary = summarize_attempts(&participants, config.passing_percentage, Utc::now());
    let status = readiness::evaluate_all(&questions);

    let category_stats: BTreeMap<Category, i64> =
        status.iter().map(|(c, s)| (*c, s.question_count)).collect();
    let category_marks: BTreeMap<Category, i64> =
        status.iter().map(|(c, s)| (*c, s.total_marks)).collect();

    Ok(Json(json!({
        "success": true,
        "degraded": degraded_participants || degraded_questions,
        "stats": {
            "totalStudents": summary.total_students,
            "totalQuestions": questions.len(),
            "totalAttempts": summary.total_attempts,
            "averageScore": summary.average_score,
            "passRate": summary.pass_rate,
            "todayAttempts": summary.today_attempts,
            "categoryStats": category_stats,
            "categoryMarks": category_marks,
        }
    })))
}

/// Dashboard with recent results, live readiness and the current config.
pub async fn dashboard_full(
    State(store): State<SharedStore>,
) -> Result<impl IntoResponse, AppError> {
    let (participants, degraded_participants) =
        super::or_degraded(store.list_participants().await, "loading dashboard", Vec::new)?;
    let (questions, degraded_questions) =
        super::or_degraded(store.all_questions().await, "loading dashboard", Vec::new)?;
    let (config, _) = super::or_degraded(
        engine::resolve_config(store.as_ref()).await,
        "loading config",
        QuizConfig::default,
    )?;

    let summary = summarize_attempts(&participants, config.passing_percentage, Utc::now());
    let recent_results: Vec<ResultEntry> = participants
        .into_iter()
        .take(5)
        .map(|p| to_result_entry(p, config.passing_percentage))
        .collect();

    Ok(Json(json!({
        "success": true,
        "degraded": degraded_participants || degraded_questions,
        "stats": {
            "totalUsers": summary.total_students,
            "totalQuestions": questions.len(),
            "totalResults": summary.total_attempts,
            "todayResults": summary.today_attempts,
            "recentResults": recent_results,
            "categoryStatus": readiness::evaluate_all(&questions),
            "config": config,
        },
        "timestamp": Utc::now().to_rfc3339(),
    })))
}

/// Ground-truth readiness of every category, recomputed from the question bank.
pub async fn category_stats(
    State(store): State<SharedStore>,
) -> Result<impl IntoResponse, AppError> {
    let (stats, degraded) = super::or_degraded(
        engine::recompute_category_status(store.as_ref()).await,
        "computing category stats",
        || readiness::evaluate_all(&[]),
    )?;

    Ok(Json(json!({
        "success": true,
        "degraded": degraded,
        "stats": stats,
        "timestamp": Utc::now().to_rfc3339(),
    })))
}

/// Forces a recomputation of the cached category status.
pub async fn update_category_status(
    State(store): State<SharedStore>,
) -> Result<impl IntoResponse, AppError> {
    let config = engine::refresh_category_status(store.as_ref()).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Category status updated successfully",
        "categoryStatus": config.category_status,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn participant(id: i64, percentage: f64, submitted_at: Option<DateTime<Utc>>) -> Participant {
        Participant {
            id,
            name: format!("Student {}", id),
            roll_number: format!("R-{}", id),
            category: Category::Node,
            score: 0,
            marks_obtained: percentage as i64,
            total_marks: 100,
            percentage,
            created_at: Utc::now(),
            submitted_at,
        }
    }

    #[test]
    fn summary_ignores_unsubmitted() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 15, 0, 0).unwrap();
        let participants = vec![
            participant(1, 80.0, Some(now - Duration::hours(1))),
            participant(2, 30.0, Some(now - Duration::days(1))),
            participant(3, 0.0, None),
        ];

        let summary = summarize_attempts(&participants, 40.0, now);
        assert_eq!(summary.total_students, 3);
        assert_eq!(summary.total_attempts, 2);
        assert_eq!(summary.average_score, 55.0);
        assert_eq!(summary.pass_rate, 50.0);
        assert_eq!(summary.today_attempts, 1);
    }

    #[test]
    fn summary_without_attempts() {
        let summary = summarize_attempts(&[participant(1, 0.0, None)], 40.0, Utc::now());
        assert_eq!(summary.total_students, 1);
        assert_eq!(summary.total_attempts, 0);
        assert_eq!(summary.average_score, 0.0);
    }

    #[test]
    fn result_entry_needs_a_submission_to_pass() {
        let entry = to_result_entry(participant(1, 0.0, None), 0.0);
        assert!(!entry.passed);

        let entry = to_result_entry(participant(2, 66.666, Some(Utc::now())), 40.0);
        assert!(entry.passed);
        assert_eq!(entry.percentage, 66.67);
    }
}
