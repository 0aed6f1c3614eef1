use crate::ai::AiError;
use crate::config::ConfigError;
use crate::cycle::CycleError;
use crate::goals::GoalError;
use crate::journal::JournalError;
use crate::prompts::PromptError;
use crate::storage::StorageError;
use crate::tips::TipError;

/// Any failure the library can hand back to a front end.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Ai(#[from] AiError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Cycle(#[from] CycleError),
    #[error(transparent)]
    Goal(#[from] GoalError),
    #[error(transparent)]
    Journal(#[from] JournalError),
    #[error(transparent)]
    Prompt(#[from] PromptError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Tip(#[from] TipError),
    #[error("invalid date {input:?}: expected YYYY-MM-DD")]
    InvalidDate { input: String },
    #[error("journal is locked")]
    Locked,
    #[error("journal has not been set up yet")]
    NotSetUp,
}

pub type Result<T> = std::result::Result<T, Error>;
