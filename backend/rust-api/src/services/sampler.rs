//! Random selection helpers shared by the HTTP handlers and the question
//! generator. The random source is always passed in so callers can seed it.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::QuizError;

/// Returns a uniformly random permutation of `items`, leaving the input as is.
pub fn shuffle<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled = items.to_vec();
    shuffled.shuffle(rng);
    shuffled
}

/// Draws `min(n, items.len())` distinct elements in random order.
pub fn take_random<T: Clone, R: Rng + ?Sized>(items: &[T], n: usize, rng: &mut R) -> Vec<T> {
    let mut picked = shuffle(items, rng);
    picked.truncate(n);
    picked
}

/// Like [`take_random`] for untrusted counts: negative `n` is rejected,
/// `n` above the pool size is clamped to the pool size.
pub fn pick_without_replacement<T: Clone, R: Rng + ?Sized>(
    items: &[T],
    n: i64,
    rng: &mut R,
) -> Result<Vec<T>, QuizError> {
    if n < 0 {
        return Err(QuizError::InvalidArgument(format!(
            "sample size must not be negative, got {}",
            n
        )));
    }
    let n = usize::try_from(n).unwrap_or(usize::MAX);
    Ok(take_random(items, n, rng))
}
