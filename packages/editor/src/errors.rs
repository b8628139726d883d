//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("Load error: {0}")]
    Load(#[from] rulecraft_common::CommonError),

    #[error("Export error: {0}")]
    Export(#[from] rulecraft_export::CompileError),

    #[error("Document is not file-backed")]
    NotFileBacked,
}
