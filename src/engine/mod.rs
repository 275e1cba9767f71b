// src/engine/mod.rs

//! Readiness and scoring rules, plus the storage round-trips that keep the
//! cached readiness in step with the question bank.

pub mod readiness;
pub mod scoring;

use std::collections::BTreeMap;

use chrono::Utc;

use crate::{
    error::AppError,
    models::{category::Category, quiz_config::QuizConfig},
    store::QuizStore,
};

use readiness::CategoryStatus;

/// Loads the quiz configuration, creating the singleton with defaults on
/// first access. Callers pass the result down explicitly.
pub async fn resolve_config(store: &dyn QuizStore) -> Result<QuizConfig, AppError> {
    if let Some(config) = store.load_config().await? {
        return Ok(config);
    }

    let mut config = QuizConfig::default();
    config.category_status = readiness::evaluate_all(&store.all_questions().await?);
    store.save_config(&config).await?;
    tracing::info!("Created default quiz configuration");
    Ok(config)
}

/// Ground-truth readiness of every category, read straight from the
/// question bank. Does not touch the cache.
pub async fn recompute_category_status(
    store: &dyn QuizStore,
) -> Result<BTreeMap<Category, CategoryStatus>, AppError> {
    let questions = store.all_questions().await?;
    Ok(readiness::evaluate_all(&questions))
}

/// Recomputes every category and replaces the cached status.
/// Runs after each question creation or deletion.
pub async fn refresh_category_status(store: &dyn QuizStore) -> Result<QuizConfig, AppError> {
    let category_status = recompute_category_status(store).await?;

    let mut config = resolve_config(store).await?;
    config.category_status = category_status;
    config.updated_at = Utc::now();
    store.save_config(&config).await?;

    let ready: Vec<&str> = readiness::available_categories(&config)
        .into_iter()
        .map(Category::as_str)
        .collect();
    tracing::debug!("Category status refreshed, ready: {:?}", ready);

    Ok(config)
}
