//! Parser error type.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A malformed card or element line.
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    /// An element referenced a `.model` name that was never defined.
    #[error("line {line}: unknown model '{name}'")]
    UnknownModel { line: usize, name: String },

    /// A token that should have been a number was not one.
    #[error("invalid numeric value '{0}'")]
    InvalidValue(String),
}

pub type Result<T> = std::result::Result<T, Error>;
