pub mod flag;
pub mod question;
pub mod session;

pub use flag::{Flag, FlagRecord};
pub use question::Question;
pub use session::{OptionState, Phase, SessionSnapshot};
