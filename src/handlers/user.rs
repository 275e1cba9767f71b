// src/handlers/user.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use serde_json::json;

use crate::{
    engine::{self, readiness, scoring},
    error::AppError,
    extract::{Json, Path},
    models::{
        category::Category,
        participant::{RegisterRequest, SubmitQuizRequest},
        question::PublicQuestion,
    },
    store::SharedStore,
};

/// Entry of the student-facing category listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableCategory {
    pub value: Category,
    pub label: &'static str,
    pub icon: &'static str,
    pub total_marks: i64,
    pub question_count: i64,
    pub is_ready: bool,
}

/// Lists the categories students can take: exactly those whose cached
/// status is ready.
pub async fn available_categories(
    State(store): State<SharedStore>,
) -> Result<impl IntoResponse, AppError> {
    let (config, degraded) = super::or_degraded(
        engine::resolve_config(store.as_ref()).await.map(Some),
        "listing available categories",
        || None,
    )?;

    let mut categories = Vec::new();
    if let Some(config) = config {
        for category in readiness::available_categories(&config) {
            let questions = store.questions_by_category(category).await?;
            let status = readiness::evaluate(category, &questions);
            categories.push(AvailableCategory {
                value: category,
                label: category.label(),
                icon: category.icon(),
                total_marks: status.total_marks,
                question_count: status.question_count,
                is_ready: true,
            });
        }
    }

    Ok(Json(json!({
        "success": true,
        "degraded": degraded,
        "totalAvailable": categories.len(),
        "categories": categories,
    })))
}

/// Registers a student for a category.
pub async fn register(
    State(store): State<SharedStore>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new_participant = payload.into_new_participant()?;
    let participant = store.insert_participant(new_participant).await?;

    tracing::info!(
        "Participant {} registered for '{}'",
        participant.roll_number,
        participant.category
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "user": {
                "id": participant.id,
                "name": participant.name,
                "rollNumber": participant.roll_number,
                "category": participant.category,
            }
        })),
    ))
}

/// Returns the first `totalQuestions` questions of a ready category in
/// storage order, without correctness flags.
pub async fn get_questions(
    State(store): State<SharedStore>,
    Path(category): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let category: Category = category.parse()?;
    let config = engine::resolve_config(store.as_ref()).await?;

    if !config.is_ready(category) {
        return Err(AppError::NotFound(format!(
            "Category '{}' is not available yet",
            category
        )));
    }

    let questions = store.questions_by_category(category).await?;
    if questions.is_empty() {
        return Err(AppError::NotFound(
            "No questions available for this category".to_string(),
        ));
    }

    let limit = config.total_questions.max(1) as usize;
    let public: Vec<PublicQuestion> = questions.iter().take(limit).map(PublicQuestion::from).collect();

    Ok(Json(json!({
        "success": true,
        "category": category,
        "questions": public,
        "timeLimit": config.quiz_time,
        "totalQuestions": config.total_questions,
    })))
}

/// Scores a submission and stores the result on the participant.
///
/// A later submission overwrites an earlier one.
pub async fn submit(
    State(store): State<SharedStore>,
    Json(req): Json<SubmitQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let participant = store
        .find_participant(req.participant_id)
        .await?
        .ok_or(AppError::NotFound("Participant not found".to_string()))?;

    if participant.has_submitted() {
        tracing::warn!(
            "Participant {} resubmitted; previous result ({}%) will be overwritten",
            participant.roll_number,
            participant.percentage
        );
    }

    let questions = store.questions_by_category(participant.category).await?;
    let config = engine::resolve_config(store.as_ref()).await?;

    let result = scoring::score(&participant, &questions, &req.answers, &config);

    if !store
        .record_result(participant.id, &result.to_participant_result())
        .await?
    {
        return Err(AppError::NotFound("Participant not found".to_string()));
    }

    tracing::info!(
        "Participant {} scored {}/{} marks ({}%) in '{}'",
        participant.roll_number,
        result.marks_obtained,
        result.total_marks,
        result.percentage,
        result.category
    );

    Ok(Json(json!({
        "success": true,
        "score": result.score,
        "marksObtained": result.marks_obtained,
        "totalMarks": result.total_marks,
        "percentage": result.percentage,
        "totalQuestions": result.total_questions,
        "passed": result.passed,
        "category": result.category,
    })))
}
