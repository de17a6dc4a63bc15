//! Infrastructure-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;

/// Application errors plus file access outside the document store
/// (export targets, import sources, the global config file).
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("cannot {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl InfraError {
    /// `context` reads as an action, e.g. `"write tree.json"`.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Result type for infrastructure layer operations.
pub type InfraResult<T> = Result<T, InfraError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn given_io_failure_when_displaying_then_names_action_and_cause() {
        let err = InfraError::io(
            "read /tmp/export.json",
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        );

        assert_eq!(
            err.to_string(),
            "cannot read /tmp/export.json: no such file"
        );
    }
}
