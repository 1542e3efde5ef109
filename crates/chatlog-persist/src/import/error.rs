use thiserror::Error;

/// Whole-file import failures. Per-conversation problems are not errors at
/// this level; they are logged and counted in the import report.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("File is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error(
        "Unrecognized export format: expected a list of conversations, an object with a \
         \"conversations\" list, or a single exported conversation"
    )]
    UnrecognizedFormat,

    #[error("The file contains no conversations")]
    Empty,
}
