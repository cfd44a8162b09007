use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("tour has no cities")]
    EmptyTour,
    #[error("index {index} is out of range for a tour of {len} cities")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("iteration count must be >= 0, got {0}")]
    InvalidIterationCount(i64),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}
