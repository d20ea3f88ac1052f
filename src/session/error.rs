//! Errors raised when submitting a job

use thiserror::Error;

use crate::vision::InputError;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] InputError),

    /// A job is already in flight; new submissions are rejected, not queued
    #[error("A recognition is already in progress.")]
    Busy,
}

impl SubmitError {
    /// Message shown in the blocking notice
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::Invalid(_) => InputError::USER_MESSAGE.to_string(),
            SubmitError::Busy => self.to_string(),
        }
    }
}
