use thiserror::Error;

/// Errors that abort a scheduling request before any option is built.
///
/// Unplaceable sections and labs are not errors; they are reported inline
/// as conflict records in the generated schedules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),
}

impl ScheduleError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_catalog(message: impl Into<String>) -> Self {
        Self::InvalidCatalog(message.into())
    }
}
