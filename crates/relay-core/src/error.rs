//! Error types shared by the relay panel crates

use thiserror_no_std::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("Relay index {0} out of range")]
    OutOfRangeRelay(usize),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(&'static str),
    #[error("Failed to drive relay output {0}")]
    RelayOutput(usize),
    #[error("Display initialization failed")]
    DisplayInitFailure,
    #[error("Flash storage mount failed")]
    StorageMountFailure,
    #[error("Flash storage access failed")]
    StorageAccess,
    #[error("Network reset requested")]
    NetworkResetRequested,
}

impl Error {
    /// Whether the error leaves the device without a usable UI or control
    /// surface, so the only way forward is a restart.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::DisplayInitFailure | Error::StorageMountFailure | Error::NetworkResetRequested
        )
    }
}

pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_recoverable() {
        assert!(!Error::OutOfRangeRelay(9).is_fatal());
        assert!(!Error::InvalidParameter("state").is_fatal());
        assert!(!Error::RelayOutput(1).is_fatal());
        assert!(!Error::StorageAccess.is_fatal());
    }

    #[test]
    fn test_init_failures_are_fatal() {
        assert!(Error::DisplayInitFailure.is_fatal());
        assert!(Error::StorageMountFailure.is_fatal());
        assert!(Error::NetworkResetRequested.is_fatal());
    }
}
