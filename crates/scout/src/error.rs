use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScoutError>;

#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("Strategy description is empty")]
    EmptyInput,

    #[error("Strategy description is {len} characters, the limit is {max}")]
    InputTooLong { len: usize, max: usize },

    #[error("Too many {kind} cards: {count} (max {max})")]
    TooManyCards {
        kind: &'static str,
        count: usize,
        max: usize,
    },

    #[error("Refinement failed: {0}")]
    Refine(String),

    #[error("Invalid card pattern: {0}")]
    Pattern(#[from] regex::Error),
}
