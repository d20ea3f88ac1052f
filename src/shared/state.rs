//! Application state shared between the UI and the coordinator

use crate::config::AppConfig;
use crate::session::job::JobOutcome;

/// Central shared state
#[derive(Debug, Clone, Default)]
pub struct SharedAppState {
    /// Application configuration
    pub config: AppConfig,
    /// Runtime state (not persisted)
    pub runtime: RuntimeState,
}

impl SharedAppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            runtime: RuntimeState::default(),
        }
    }
}

/// Runtime counters and status, not persisted
#[derive(Debug, Clone, Default)]
pub struct RuntimeState {
    /// Jobs that produced a result
    pub jobs_completed: u32,
    /// Jobs that failed in the recognition engine
    pub jobs_failed: u32,
    /// Jobs that ended with a translation attached
    pub translations: u32,
    /// Last error message (if any)
    pub last_error: Option<String>,
}

impl RuntimeState {
    /// Record the outcome of a finished job
    pub fn record(&mut self, outcome: &JobOutcome) {
        match outcome {
            JobOutcome::Completed(result) => {
                self.jobs_completed += 1;
                if result.translation.is_some() {
                    self.translations += 1;
                }
                self.clear_error();
            }
            JobOutcome::Failed(reason) => {
                self.jobs_failed += 1;
                self.set_error(reason.clone());
            }
            JobOutcome::Cancelled => {}
        }
    }

    /// Clear any error state
    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Set an error message
    pub fn set_error(&mut self, error: impl Into<String>) {
        self.last_error = Some(error.into());
    }
}
