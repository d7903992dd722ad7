use rand::Rng;
use std::collections::HashSet;

use crate::error::QuizError;
use crate::models::{Flag, Question};
use crate::services::sampler;

pub const OPTIONS_PER_QUESTION: usize = 4;
pub const DISTRACTORS_PER_QUESTION: usize = OPTIONS_PER_QUESTION - 1;

/// Builds one session's worth of questions.
///
/// Every flag is the correct answer at most once. Distractors are drawn per
/// question from the whole pool minus that question's answer, so they may
/// repeat across questions.
///
/// Fails with `InvalidArgument` for `n == 0` and with `InsufficientData`
/// when the pool has fewer than four distinct names or fewer than `n` flags.
pub fn generate<R: Rng + ?Sized>(
    flags: &[Flag],
    n: usize,
    rng: &mut R,
) -> Result<Vec<Question>, QuizError> {
    if n == 0 {
        return Err(QuizError::InvalidArgument(
            "at least one question is required".to_string(),
        ));
    }

    let pool = distinct_by_name(flags);
    ensure_options_available(&pool)?;
    if n > pool.len() {
        return Err(QuizError::InsufficientData {
            required: n,
            available: pool.len(),
        });
    }

    let answers = sampler::take_random(&pool, n, rng);
    let questions = answers
        .into_iter()
        .map(|answer| {
            let others: Vec<&Flag> = pool
                .iter()
                .copied()
                .filter(|flag| flag.name != answer.name)
                .collect();
            let distractors = sampler::take_random(&others, DISTRACTORS_PER_QUESTION, rng);
            build_question(answer, &distractors, rng)
        })
        .collect();

    Ok(questions)
}

/// One independently sampled question. Repeated calls share no state, so the
/// same flag can come up as the answer more than once across calls.
pub fn single_question<R: Rng + ?Sized>(flags: &[Flag], rng: &mut R) -> Result<Question, QuizError> {
    let pool = distinct_by_name(flags);
    ensure_options_available(&pool)?;

    let drawn = sampler::take_random(&pool, OPTIONS_PER_QUESTION, rng);
    let (answer, distractors) = drawn
        .split_first()
        .ok_or(QuizError::InsufficientData {
            required: OPTIONS_PER_QUESTION,
            available: 0,
        })?;

    Ok(build_question(answer, distractors, rng))
}

fn build_question<R: Rng + ?Sized>(answer: &Flag, distractors: &[&Flag], rng: &mut R) -> Question {
    let names: Vec<String> = distractors
        .iter()
        .map(|flag| flag.name.clone())
        .chain(std::iter::once(answer.name.clone()))
        .collect();

    Question {
        image: answer.image.clone(),
        answer: answer.name.clone(),
        options: sampler::shuffle(&names, rng),
    }
}

fn ensure_options_available(pool: &[&Flag]) -> Result<(), QuizError> {
    if pool.len() < OPTIONS_PER_QUESTION {
        return Err(QuizError::InsufficientData {
            required: OPTIONS_PER_QUESTION,
            available: pool.len(),
        });
    }
    Ok(())
}

// First occurrence wins; the server's store already rejects duplicates but
// client-side pools come from the network.
fn distinct_by_name(flags: &[Flag]) -> Vec<&Flag> {
    let mut seen = HashSet::new();
    flags
        .iter()
        .filter(|flag| seen.insert(flag.name.as_str()))
        .collect()
}
