//! Client-side quiz state machine.
//!
//! `Idle -> Loading -> Ready -> Playing -> Finished -> Playing ...`
//!
//! User events that make no sense in the current state (a second answer, an
//! advance without an answer, a second load while one is in flight) are
//! ignored and reported as `false`. Transitions that need valid input
//! (`start_game`, `play_again`) return a `QuizError` and leave the session
//! untouched.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::QuizError;
use crate::models::{Flag, OptionState, Phase, Question, SessionSnapshot};
use crate::services::flag_client::FlagSource;
use crate::services::question_generator;

pub const MIN_QUESTIONS: usize = 5;
pub const MAX_QUESTIONS: usize = 36;
pub const DEFAULT_QUESTIONS: usize = MIN_QUESTIONS;

#[derive(Debug)]
pub struct QuizSession<R = StdRng> {
    phase: Phase,
    flags: Vec<Flag>,
    num_questions: usize,
    questions: Vec<Question>,
    current_index: usize,
    selected_option: Option<String>,
    score: u32,
    error: Option<String>,
    rng: R,
}

impl QuizSession<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }
}

impl Default for QuizSession<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> QuizSession<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            phase: Phase::Idle,
            flags: Vec::new(),
            num_questions: DEFAULT_QUESTIONS,
            questions: Vec::new(),
            current_index: 0,
            selected_option: None,
            score: 0,
            error: None,
            rng,
        }
    }

    /// Idle -> Loading. Only one fetch may be in flight.
    pub fn request_flags(&mut self) -> bool {
        if self.phase != Phase::Idle {
            debug!("Ignoring flag request while {}", self.phase);
            return false;
        }
        self.error = None;
        self.phase = Phase::Loading;
        debug!("Quiz phase: idle -> loading");
        true
    }

    /// Loading -> Ready on a non-empty pool, Loading -> Idle otherwise.
    pub fn flags_loaded(&mut self, result: Result<Vec<Flag>, QuizError>) {
        if self.phase != Phase::Loading {
            debug!("Ignoring flag response while {}", self.phase);
            return;
        }

        match result {
            Ok(flags) if !flags.is_empty() => {
                debug!("Quiz phase: loading -> ready ({} flags)", flags.len());
                self.flags = flags;
                self.phase = Phase::Ready;
            }
            Ok(_) => self.fail_loading(QuizError::FetchFailed("server sent no flags".to_string())),
            Err(e) => self.fail_loading(e),
        }
    }

    /// Runs the whole fetch step against `source`; a no-op unless idle.
    pub async fn load_flags<S: FlagSource + ?Sized>(&mut self, source: &S) {
        if !self.request_flags() {
            return;
        }
        let result = source.list_flags().await;
        self.flags_loaded(result);
    }

    fn fail_loading(&mut self, error: QuizError) {
        tracing::warn!("Loading flags failed: {}", error);
        self.error = Some(error.to_string());
        self.phase = Phase::Idle;
    }

    pub fn set_num_questions(&mut self, n: usize) {
        self.num_questions = n;
    }

    pub fn num_questions(&self) -> usize {
        self.num_questions
    }

    /// Inclusive range of question counts the current pool supports
    pub fn question_bounds(&self) -> (usize, usize) {
        (MIN_QUESTIONS, MAX_QUESTIONS.min(self.flags.len()))
    }

    /// Ready -> Playing
    pub fn start_game(&mut self) -> Result<(), QuizError> {
        if self.phase != Phase::Ready {
            return Err(QuizError::InvalidTransition {
                phase: self.phase,
                action: "start game",
            });
        }
        self.begin_round()
    }

    /// Finished -> Playing with a fresh draw of questions
    pub fn play_again(&mut self) -> Result<(), QuizError> {
        if self.phase != Phase::Finished {
            return Err(QuizError::InvalidTransition {
                phase: self.phase,
                action: "play again",
            });
        }
        self.begin_round()
    }

    fn begin_round(&mut self) -> Result<(), QuizError> {
        if self.flags.is_empty() {
            return Err(QuizError::FetchFailed("no flags loaded".to_string()));
        }

        let (min, max) = self.question_bounds();
        if max < min {
            return Err(QuizError::InsufficientData {
                required: min,
                available: self.flags.len(),
            });
        }
        if !(min..=max).contains(&self.num_questions) {
            return Err(QuizError::InvalidArgument(format!(
                "number of questions must be between {} and {}, got {}",
                min, max, self.num_questions
            )));
        }

        let questions =
            question_generator::generate(&self.flags, self.num_questions, &mut self.rng)?;

        debug!(
            "Quiz phase: {} -> playing ({} questions)",
            self.phase,
            questions.len()
        );
        self.questions = questions;
        self.current_index = 0;
        self.selected_option = None;
        self.score = 0;
        self.phase = Phase::Playing;
        Ok(())
    }

    /// Records the answer for the current question. One answer per question:
    /// later calls are ignored until the session advances.
    pub fn select_option(&mut self, option: &str) -> bool {
        if self.phase != Phase::Playing || self.selected_option.is_some() {
            return false;
        }
        let Some(question) = self.questions.get(self.current_index) else {
            return false;
        };
        if !question.has_option(option) {
            debug!("Ignoring unknown option {:?}", option);
            return false;
        }

        let correct = question.is_correct(option);
        if correct {
            self.score += 1;
        }
        self.selected_option = Some(option.to_string());
        debug!(
            "Question {} answered {:?} (correct: {}), score {}",
            self.current_index + 1,
            option,
            correct,
            self.score
        );
        true
    }

    /// Moves past an answered question, finishing after the last one.
    pub fn advance(&mut self) -> bool {
        if self.phase != Phase::Playing || self.selected_option.is_none() {
            return false;
        }

        if self.is_last_question() {
            debug!(
                "Quiz phase: playing -> finished, score {}/{}",
                self.score,
                self.total()
            );
            self.phase = Phase::Finished;
        } else {
            self.current_index += 1;
            self.selected_option = None;
        }
        true
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            Phase::Playing | Phase::Finished => self.questions.get(self.current_index),
            _ => None,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn selected_option(&self) -> Option<&str> {
        self.selected_option.as_deref()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 >= self.questions.len()
    }

    /// Highlight for `option` on the current question
    pub fn option_state(&self, option: &str) -> OptionState {
        let (Some(selected), Some(question)) = (self.selected_option(), self.current_question())
        else {
            return OptionState::Neutral;
        };
        if question.is_correct(option) {
            OptionState::Correct
        } else if option == selected {
            OptionState::Wrong
        } else {
            OptionState::Neutral
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            question: self.current_question().cloned(),
            question_number: self.current_index + 1,
            total: self.total(),
            selected_option: self.selected_option.clone(),
            score: self.score,
            error: self.error.clone(),
        }
    }
}
