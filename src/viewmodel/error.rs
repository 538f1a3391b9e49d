use thiserror::Error;

/// Errors with a fixed meaning to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ViewModelError {
    /// End the current cycle without emitting anything.
    #[error("input ignored")]
    IgnoreInput,
}

impl ViewModelError {
    /// Check whether an `accept` failure is the ignore sentinel.
    pub fn is_ignore(error: &anyhow::Error) -> bool {
        matches!(
            error.downcast_ref::<ViewModelError>(),
            Some(ViewModelError::IgnoreInput)
        )
    }
}
