use thiserror::Error;

/// Errors raised by the simulator and the wastage estimator.
///
/// Every failure is a caller mistake: there is no I/O inside the core, so
/// nothing here is transient and nothing is retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl SimError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        SimError::InvalidInput(message.into())
    }
}

pub type SimResult<T> = Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = SimError::invalid("sample count must be positive");
        assert_eq!(
            error.to_string(),
            "Invalid input: sample count must be positive"
        );
    }
}
