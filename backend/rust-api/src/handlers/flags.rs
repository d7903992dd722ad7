use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::num::IntErrorKind;
use std::sync::Arc;

use crate::error::QuizError;
use crate::metrics::{record_flags_served, QUESTIONS_GENERATED_TOTAL};
use crate::models::{Flag, Question};
use crate::services::{question_generator, sampler, AppState};

#[derive(Debug, Deserialize)]
pub struct RandomFlagsQuery {
    /// Kept as text so that junk values fall back to the default instead of
    /// rejecting the request
    count: Option<String>,
}

/// GET /api/flags - the full dataset with image URLs
pub async fn list_flags(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let flags = state.store.list_flags();
    record_flags_served("all", flags.len());
    Json(flags.to_vec())
}

/// GET /api/flags/random?count=N - N flags sampled without replacement
/// Query parameters:
/// - count: defaults to 10 when absent, non-numeric or below 1; capped at the
///   dataset size
pub async fn random_flags(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RandomFlagsQuery>,
) -> impl IntoResponse {
    let flags = state.store.list_flags();
    let count = sample_size(
        query.count.as_deref(),
        state.config.default_sample_size,
        flags.len(),
    );
    tracing::debug!("Sampling {} of {} flags", count, flags.len());

    let picked = pick_flags(flags, count);
    record_flags_served("random", picked.len());
    Json(picked)
}

/// GET /api/flags/question - one stateless question with four options
pub async fn question(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, QuizError> {
    let question = draw_question(state.store.list_flags())?;
    QUESTIONS_GENERATED_TOTAL.inc();
    Ok(Json(question))
}

fn pick_flags(flags: &[Flag], count: usize) -> Vec<Flag> {
    sampler::take_random(flags, count, &mut rand::rng())
}

fn draw_question(flags: &[Flag]) -> Result<Question, QuizError> {
    question_generator::single_question(flags, &mut rand::rng())
}

fn sample_size(raw: Option<&str>, default: usize, available: usize) -> usize {
    let requested = match raw.map(|value| value.trim().parse::<i64>()) {
        Some(Ok(n)) if n >= 1 => usize::try_from(n).unwrap_or(usize::MAX),
        // Still a positive number, just too big to represent
        Some(Err(e)) if *e.kind() == IntErrorKind::PosOverflow => usize::MAX,
        _ => default,
    };
    requested.min(available)
}
