//! Recognition session
//!
//! The view controller ([`SessionState`]), the jobs it tracks and the
//! [`RecognitionOrchestrator`] that runs them.

pub mod error;
pub mod job;
pub mod orchestrator;
pub mod progress;
pub mod state;
pub mod stats;

pub use error::SubmitError;
pub use job::{JobId, JobOutcome, RecognitionJob, RecognitionResult};
pub use orchestrator::RecognitionOrchestrator;
pub use progress::{ProgressEvent, ProgressSender};
pub use state::{SessionState, UiView};
pub use stats::TextStats;
