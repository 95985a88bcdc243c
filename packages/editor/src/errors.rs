//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Parse error: {0}")]
    Parse(#[from] storykeep_parser::ParseError),

    #[error("Evaluation error: {0}")]
    Evaluation(#[from] storykeep_evaluator::EvalError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("No insert default configured for '{0}'")]
    MissingInsertDefault(String),

    #[error("Insert default for '{kind}' produced no content")]
    EmptyInsertDefault { kind: String },
}

/// Failures of a document store backend
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid store data: {0}")]
    Json(#[from] serde_json::Error),
}
