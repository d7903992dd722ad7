use serde::{Deserialize, Serialize};
use std::fmt;

use super::Question;

/// Coarse state of a quiz session
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Ready,
    Playing,
    Finished,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Loading => "loading",
            Phase::Ready => "ready",
            Phase::Playing => "playing",
            Phase::Finished => "finished",
        };
        f.write_str(name)
    }
}

/// Feedback for a single option once the current question is answered
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OptionState {
    Neutral,
    Correct,
    Wrong,
}

/// Read-only view of a session for renderers
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub question: Option<Question>,
    /// 1-based position of `question`
    pub question_number: usize,
    pub total: usize,
    pub selected_option: Option<String>,
    pub score: u32,
    pub error: Option<String>,
}
