//! Progress stream between a running job and the UI
//!
//! The job side holds a [`ProgressSender`]; the UI drains [`JobEvent`]s from
//! the matching receiver once per frame. Each sender carries the job's
//! cancellation token, so producers can stop early and stop emitting once
//! the job has been abandoned.

use crossbeam_channel::Sender;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::session::job::{JobId, JobOutcome};
use crate::shared::JobEvent;

pub const STATUS_INITIALIZING: &str = "initializing";
pub const STATUS_DOWNLOADING: &str = "downloading language data";
pub const STATUS_RECOGNIZING: &str = "recognizing text";
pub const STATUS_TRANSLATING: &str = "translating text";

/// One progress report from the recognition capability
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    /// Phase label
    pub status: String,
    /// Fraction complete in [0, 1], when the phase reports one
    pub progress: Option<f32>,
}

impl ProgressEvent {
    pub fn new(status: impl Into<String>, progress: Option<f32>) -> Self {
        Self {
            status: status.into(),
            progress,
        }
    }

    pub fn initializing() -> Self {
        Self::new(STATUS_INITIALIZING, None)
    }

    pub fn downloading(fraction: Option<f32>) -> Self {
        Self::new(STATUS_DOWNLOADING, fraction)
    }

    pub fn recognizing(fraction: f32) -> Self {
        Self::new(STATUS_RECOGNIZING, Some(fraction))
    }

    pub fn translating() -> Self {
        Self::new(STATUS_TRANSLATING, None)
    }

    pub fn is_recognizing(&self) -> bool {
        self.status == STATUS_RECOGNIZING
    }

    /// Progress as a whole percentage, clamped to 0..=100
    pub fn percent(&self) -> Option<u8> {
        self.progress
            .map(|p| (p.clamp(0.0, 1.0) * 100.0).round() as u8)
    }

    /// Human-readable status line for the processing view
    pub fn status_line(&self) -> String {
        if self.is_recognizing() {
            return format!("Recognizing... {}%", self.percent().unwrap_or(0));
        }

        if self.status.starts_with("downloading") {
            return match self.percent() {
                Some(p) => format!("Downloading language data... {}%", p),
                None => "Downloading language data...".to_string(),
            };
        }

        let mut line = capitalize(&self.status);
        if matches!(self.status.as_str(), STATUS_INITIALIZING | STATUS_TRANSLATING) {
            line.push_str("...");
        }
        line
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Producer half of a job's progress stream
#[derive(Debug, Clone)]
pub struct ProgressSender {
    job_id: JobId,
    tx: Sender<JobEvent>,
    cancel: CancellationToken,
}

impl ProgressSender {
    pub fn new(job_id: JobId, tx: Sender<JobEvent>, cancel: CancellationToken) -> Self {
        Self { job_id, tx, cancel }
    }

    /// Forward a progress event. Returns false once the job is cancelled or
    /// the consumer is gone.
    pub fn send(&self, event: ProgressEvent) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        trace!(job_id = %self.job_id, status = %event.status, progress = ?event.progress, "progress");
        self.tx
            .send(JobEvent::Progress {
                job_id: self.job_id,
                event,
            })
            .is_ok()
    }

    /// Report the terminal outcome. Always delivered, even after cancellation.
    pub fn finish(&self, outcome: JobOutcome) {
        let _ = self.tx.send(JobEvent::Finished {
            job_id: self.job_id,
            outcome,
        });
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolves when the job is cancelled
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[test]
    fn test_recognizing_status_line() {
        assert_eq!(ProgressEvent::recognizing(0.42).status_line(), "Recognizing... 42%");
        assert_eq!(ProgressEvent::recognizing(1.0).status_line(), "Recognizing... 100%");
        assert_eq!(ProgressEvent::recognizing(0.0).percent(), Some(0));
    }

    #[test]
    fn test_downloading_status_line() {
        assert_eq!(
            ProgressEvent::downloading(None).status_line(),
            "Downloading language data..."
        );
        assert_eq!(
            ProgressEvent::downloading(Some(0.5)).status_line(),
            "Downloading language data... 50%"
        );
        // Engines may report their own downloading label
        assert_eq!(
            ProgressEvent::new("downloading", None).status_line(),
            "Downloading language data..."
        );
    }

    #[test]
    fn test_other_statuses_are_capitalized() {
        assert_eq!(ProgressEvent::initializing().status_line(), "Initializing...");
        assert_eq!(ProgressEvent::translating().status_line(), "Translating text...");
        assert_eq!(
            ProgressEvent::new("loading engine", None).status_line(),
            "Loading engine"
        );
        assert_eq!(ProgressEvent::new("", None).status_line(), "");
    }

    #[test]
    fn test_percent_is_clamped() {
        assert_eq!(ProgressEvent::recognizing(1.7).percent(), Some(100));
        assert_eq!(ProgressEvent::recognizing(-0.3).percent(), Some(0));
        assert_eq!(ProgressEvent::initializing().percent(), None);
    }

    #[test]
    fn test_sender_stops_after_cancel() {
        let (tx, rx) = unbounded();
        let cancel = CancellationToken::new();
        let job_id = JobId::new();
        let sender = ProgressSender::new(job_id, tx, cancel.clone());

        assert!(sender.send(ProgressEvent::initializing()));
        cancel.cancel();
        assert!(!sender.send(ProgressEvent::recognizing(0.5)));
        sender.finish(JobOutcome::Cancelled);

        let events: Vec<JobEvent> = rx.try_iter().collect();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], JobEvent::Progress { .. }));
        assert!(matches!(
            events[1],
            JobEvent::Finished { outcome: JobOutcome::Cancelled, .. }
        ));
    }

    #[test]
    fn test_sender_reports_closed_consumer() {
        let (tx, rx) = unbounded();
        let sender = ProgressSender::new(JobId::new(), tx, CancellationToken::new());
        drop(rx);
        assert!(!sender.send(ProgressEvent::initializing()));
    }
}
