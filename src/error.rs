use thiserror::Error;

/// Errors raised by the dashboard state layer.
///
/// None of these are fatal. Persistence failures in particular are logged
/// and absorbed by the theme resolver instead of reaching the view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Caller handed in data the derivations cannot work with
    /// (empty score series, score above 100, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The preference store could not be read or written.
    #[error("preference store unavailable: {0}")]
    PersistenceUnavailable(String),
    /// Two worklist records share the same id.
    #[error("duplicate record id: {0}")]
    DuplicateId(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::PersistenceUnavailable(e.to_string())
    }
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        Error::PersistenceUnavailable(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::PersistenceUnavailable(e.to_string())
    }
}
