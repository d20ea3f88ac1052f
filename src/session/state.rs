//! View controller state
//!
//! `SessionState` is owned by the UI thread and is the only place the current
//! view changes. Worker tasks never touch it directly; they send [`JobEvent`]s
//! that are applied here.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::session::error::SubmitError;
use crate::session::job::{JobId, JobOutcome, RecognitionResult};
use crate::shared::JobEvent;
use crate::vision::SourceImage;

pub const STATUS_INITIAL: &str = "Initializing...";
pub const STATUS_FAILED: &str = "Error during recognition.";
pub const NOTICE_FAILED: &str = "An error occurred. Please try again.";

/// The three mutually exclusive views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiView {
    #[default]
    Uploading,
    Processing,
    Result,
}

impl UiView {
    pub fn name(&self) -> &'static str {
        match self {
            UiView::Uploading => "Upload",
            UiView::Processing => "Processing",
            UiView::Result => "Result",
        }
    }
}

#[derive(Debug)]
struct ActiveJob {
    id: JobId,
    cancel: CancellationToken,
}

/// UI session state passed through every handler
#[derive(Debug)]
pub struct SessionState {
    view: UiView,
    /// Recognition language currently selected
    pub language: String,
    /// Path typed into the open-file field
    pub staged_path: String,
    /// Status line of the processing view
    pub status_line: String,
    /// Recognition progress, 0..=100
    pub progress_percent: u8,
    /// Image of the current or last job
    pub preview: Option<Arc<SourceImage>>,
    /// Result of the last successful job
    pub result: Option<RecognitionResult>,
    /// Editable copy of the recognized text
    pub output_text: String,
    /// Pending blocking notification
    pub notice: Option<String>,
    active_job: Option<ActiveJob>,
}

impl SessionState {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            view: UiView::Uploading,
            language: language.into(),
            staged_path: String::new(),
            status_line: String::new(),
            progress_percent: 0,
            preview: None,
            result: None,
            output_text: String::new(),
            notice: None,
            active_job: None,
        }
    }

    pub fn view(&self) -> UiView {
        self.view
    }

    pub fn is_visible(&self, view: UiView) -> bool {
        self.view == view
    }

    /// Make `view` the only visible view
    pub fn show(&mut self, view: UiView) {
        if self.view != view {
            debug!("View {} -> {}", self.view.name(), view.name());
        }
        self.view = view;
    }

    /// Back to the upload view, clearing staged input and any shown translation.
    /// A job still running is cancelled.
    pub fn reset(&mut self) {
        self.cancel_active();
        self.show(UiView::Uploading);
        self.staged_path.clear();
        self.active_job = None;
        if let Some(result) = self.result.as_mut() {
            result.translation = None;
        }
    }

    pub fn is_busy(&self) -> bool {
        self.active_job.is_some()
    }

    pub fn active_job_id(&self) -> Option<JobId> {
        self.active_job.as_ref().map(|job| job.id)
    }

    pub fn translation(&self) -> Option<&str> {
        self.result.as_ref().and_then(|r| r.translation.as_deref())
    }

    /// Enter the processing view for a new job
    pub fn begin_job(
        &mut self,
        id: JobId,
        cancel: CancellationToken,
        preview: Arc<SourceImage>,
    ) -> Result<(), SubmitError> {
        if self.is_busy() {
            return Err(SubmitError::Busy);
        }

        self.active_job = Some(ActiveJob { id, cancel });
        self.preview = Some(preview);
        self.result = None;
        self.output_text.clear();
        self.progress_percent = 0;
        self.status_line = STATUS_INITIAL.to_string();
        self.show(UiView::Processing);
        Ok(())
    }

    /// Cancel the active job, if any. Its `Cancelled` outcome resets the view.
    pub fn cancel_active(&self) {
        if let Some(job) = &self.active_job {
            info!(job_id = %job.id, "Cancelling recognition job");
            job.cancel.cancel();
        }
    }

    /// Apply an event from a job. Events from any job other than the active
    /// one are ignored.
    pub fn apply(&mut self, event: JobEvent) {
        if self.active_job_id() != Some(event.job_id()) {
            debug!(job_id = %event.job_id(), "Ignoring event from stale job");
            return;
        }

        match event {
            JobEvent::Progress { event, .. } => {
                if event.is_recognizing() {
                    if let Some(percent) = event.percent() {
                        self.progress_percent = percent;
                    }
                }
                self.status_line = event.status_line();
            }
            JobEvent::Finished { outcome, .. } => {
                self.active_job = None;
                match outcome {
                    JobOutcome::Completed(result) => {
                        self.output_text = result.text.clone();
                        self.result = Some(result);
                        self.progress_percent = 100;
                        self.show(UiView::Result);
                    }
                    JobOutcome::Failed(reason) => {
                        warn!("Recognition failed: {}", reason);
                        self.status_line = STATUS_FAILED.to_string();
                        self.notify(NOTICE_FAILED);
                        self.reset();
                    }
                    JobOutcome::Cancelled => self.reset(),
                }
            }
        }
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::progress::ProgressEvent;

    fn preview() -> Arc<SourceImage> {
        Arc::new(SourceImage::solid_for_tests(4, 4))
    }

    fn started() -> (SessionState, JobId) {
        let mut state = SessionState::new("eng");
        let id = JobId::new();
        state.begin_job(id, CancellationToken::new(), preview()).unwrap();
        (state, id)
    }

    #[test]
    fn test_initial_state_is_uploading() {
        let state = SessionState::new("eng");
        assert_eq!(state.view(), UiView::Uploading);
        assert!(state.is_visible(UiView::Uploading));
        assert!(!state.is_visible(UiView::Processing));
        assert!(!state.is_visible(UiView::Result));
        assert!(!state.is_busy());
    }

    #[test]
    fn test_exactly_one_view_visible() {
        let mut state = SessionState::new("eng");
        for view in [UiView::Processing, UiView::Result, UiView::Uploading] {
            state.show(view);
            let visible = [UiView::Uploading, UiView::Processing, UiView::Result]
                .iter()
                .filter(|v| state.is_visible(**v))
                .count();
            assert_eq!(visible, 1);
            assert!(state.is_visible(view));
        }
    }

    #[test]
    fn test_begin_job_enters_processing() {
        let (state, id) = started();
        assert_eq!(state.view(), UiView::Processing);
        assert_eq!(state.progress_percent, 0);
        assert_eq!(state.status_line, STATUS_INITIAL);
        assert_eq!(state.active_job_id(), Some(id));
    }

    #[test]
    fn test_second_job_is_rejected_while_busy() {
        let (mut state, first) = started();
        let err = state
            .begin_job(JobId::new(), CancellationToken::new(), preview())
            .unwrap_err();
        assert!(matches!(err, SubmitError::Busy));
        assert_eq!(state.active_job_id(), Some(first));
    }

    #[test]
    fn test_progress_updates_status_and_percent() {
        let (mut state, id) = started();

        state.apply(JobEvent::Progress { job_id: id, event: ProgressEvent::downloading(None) });
        assert_eq!(state.status_line, "Downloading language data...");
        assert_eq!(state.progress_percent, 0);

        state.apply(JobEvent::Progress { job_id: id, event: ProgressEvent::recognizing(0.42) });
        assert_eq!(state.status_line, "Recognizing... 42%");
        assert_eq!(state.progress_percent, 42);
    }

    #[test]
    fn test_completion_shows_result() {
        let (mut state, id) = started();
        let result = RecognitionResult::new("hello world".to_string(), None);

        state.apply(JobEvent::Finished { job_id: id, outcome: JobOutcome::Completed(result) });

        assert_eq!(state.view(), UiView::Result);
        assert_eq!(state.output_text, "hello world");
        assert_eq!(state.result.as_ref().unwrap().stats.words, 2);
        assert!(state.translation().is_none());
        assert!(!state.is_busy());
    }

    #[test]
    fn test_failure_returns_to_upload_with_notice() {
        let (mut state, id) = started();
        state.apply(JobEvent::Finished {
            job_id: id,
            outcome: JobOutcome::Failed("engine crashed".to_string()),
        });

        assert_eq!(state.view(), UiView::Uploading);
        assert_eq!(state.notice.as_deref(), Some(NOTICE_FAILED));
        assert_eq!(state.status_line, STATUS_FAILED);
        assert!(!state.is_busy());
    }

    #[test]
    fn test_cancellation_returns_to_upload() {
        let (mut state, id) = started();
        state.apply(JobEvent::Finished { job_id: id, outcome: JobOutcome::Cancelled });
        assert_eq!(state.view(), UiView::Uploading);
        assert!(state.notice.is_none());
    }

    #[test]
    fn test_stale_events_are_ignored() {
        let (mut state, _) = started();
        let stale = JobId::new();

        state.apply(JobEvent::Progress { job_id: stale, event: ProgressEvent::recognizing(0.9) });
        state.apply(JobEvent::Finished {
            job_id: stale,
            outcome: JobOutcome::Completed(RecognitionResult::new("old".to_string(), None)),
        });

        assert_eq!(state.view(), UiView::Processing);
        assert_eq!(state.progress_percent, 0);
        assert!(state.result.is_none());
    }

    #[test]
    fn test_new_job_discards_previous_result() {
        let (mut state, id) = started();
        state.apply(JobEvent::Finished {
            job_id: id,
            outcome: JobOutcome::Completed(RecognitionResult::new("first".to_string(), None)),
        });
        state.reset();

        state.begin_job(JobId::new(), CancellationToken::new(), preview()).unwrap();
        assert!(state.result.is_none());
        assert!(state.output_text.is_empty());
    }

    #[test]
    fn test_reset_clears_translation_and_staged_path() {
        let (mut state, id) = started();
        state.apply(JobEvent::Finished {
            job_id: id,
            outcome: JobOutcome::Completed(RecognitionResult::new(
                "আমি".to_string(),
                Some("I".to_string()),
            )),
        });
        state.staged_path = "/tmp/scan.png".to_string();
        assert_eq!(state.translation(), Some("I"));

        state.reset();

        assert_eq!(state.view(), UiView::Uploading);
        assert!(state.translation().is_none());
        assert!(state.staged_path.is_empty());
    }

    #[test]
    fn test_cancel_active_trips_token() {
        let mut state = SessionState::new("eng");
        let token = CancellationToken::new();
        state.begin_job(JobId::new(), token.clone(), preview()).unwrap();

        state.cancel_active();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_reset_cancels_running_job() {
        let mut state = SessionState::new("eng");
        let token = CancellationToken::new();
        state.begin_job(JobId::new(), token.clone(), preview()).unwrap();

        state.reset();

        assert!(token.is_cancelled());
        assert!(!state.is_busy());
        assert_eq!(state.view(), UiView::Uploading);
    }

    #[test]
    fn test_notice_lifecycle() {
        let mut state = SessionState::new("eng");
        state.notify("Please select a valid image file.");
        assert!(state.notice.is_some());
        state.dismiss_notice();
        assert!(state.notice.is_none());
    }
}
