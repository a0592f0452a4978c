use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings file: {0}")]
    Settings(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("replay line {line}: {message}")]
    Replay { line: usize, message: String },
    #[error("assignment solver failed: {0}")]
    Assignment(String),
}

pub type Result<T> = std::result::Result<T, Error>;
