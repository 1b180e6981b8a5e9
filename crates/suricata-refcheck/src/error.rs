//! Error types for the reference checker.
//!
//! Per-URL failures (transport errors, failed navigations) are not errors
//! here: they are recorded as [`Status::Error`](crate::status::Status)
//! outcomes. Only conditions that stop a whole run surface as
//! [`RefcheckError`].

use std::path::PathBuf;

/// All errors that abort a run.
#[derive(thiserror::Error, Debug)]
pub enum RefcheckError {
    /// The selected strategy cannot work at all (missing Chromium, browser
    /// that refuses to launch, invalid settings).
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RefcheckError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, RefcheckError>;

/// Render an error and all of its sources as one line.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.contains(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_names_path() {
        let err = RefcheckError::io(
            "/tmp/rules",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        let text = err.to_string();
        assert!(text.contains("/tmp/rules"));
        assert!(text.contains("missing"));
    }

    #[test]
    fn test_error_chain_includes_sources() {
        let err = RefcheckError::io(
            "ledger.txt",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let chain = error_chain(&err);
        assert!(chain.starts_with("IO error on ledger.txt"));
        assert!(chain.contains("denied"));
        // Sources already present in the message are not repeated
        assert_eq!(chain.matches("denied").count(), 1);
    }
}
