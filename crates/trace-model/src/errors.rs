use thiserror::Error;

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("invalid argument: {0}")]
    InvalidArg(String),
    #[error("malformed trace event at line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type TraceResult<T> = Result<T, TraceError>;
