//! Message types sent from job tasks to the UI

use crate::session::job::{JobId, JobOutcome};
use crate::session::progress::ProgressEvent;

/// Messages sent from a running job to the UI
#[derive(Debug, Clone)]
pub enum JobEvent {
    /// Intermediate progress report
    Progress { job_id: JobId, event: ProgressEvent },
    /// Terminal outcome; always the last event of a job
    Finished { job_id: JobId, outcome: JobOutcome },
}

impl JobEvent {
    pub fn job_id(&self) -> JobId {
        match self {
            JobEvent::Progress { job_id, .. } | JobEvent::Finished { job_id, .. } => *job_id,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobEvent::Finished { .. })
    }
}
