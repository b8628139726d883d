use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Unknown export format '{0}'")]
    UnknownFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Backend '{backend}' failed: {message}")]
    Backend { backend: String, message: String },
}

pub type CompileResult<T> = Result<T, CompileError>;
