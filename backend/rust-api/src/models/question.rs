use serde::{Deserialize, Serialize};

/// One multiple-choice question: a flag image and the names to pick from.
///
/// `answer` appears in `options` exactly once and `options` holds no
/// duplicates. Both are guaranteed by the generator, not re-checked here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Question {
    pub image: String,
    pub answer: String,
    pub options: Vec<String>,
}

impl Question {
    pub fn is_correct(&self, option: &str) -> bool {
        self.answer == option
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    /// Position of the correct name within `options`
    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|o| *o == self.answer)
    }
}
