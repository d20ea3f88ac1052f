//! Per-view UI state that does not belong in the session

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::vision::ImageInput;

/// How long the copy button shows its confirmation
pub const COPY_FEEDBACK: Duration = Duration::from_secs(2);

/// Something the user asked for during a frame
#[derive(Debug)]
pub enum UiAction {
    /// Recognize this image
    Submit(ImageInput),
    /// Load the file named in the path field
    OpenPath(PathBuf),
    /// Read an image from the clipboard
    PasteImage { explicit: bool },
    /// Copy the output text to the clipboard
    CopyText,
    StartOver,
    ToggleTheme(bool),
    DismissNotice,
}

#[derive(Debug, Default)]
pub struct UploadViewState {
    /// Files are being dragged over the window
    pub hovering_files: bool,
    /// Move keyboard focus to the path field on the next frame
    pub focus_path_field: bool,
}

#[derive(Debug, Default)]
pub struct ResultViewState {
    copied_at: Option<Instant>,
}

impl ResultViewState {
    pub fn mark_copied(&mut self, now: Instant) {
        self.copied_at = Some(now);
    }

    /// Whether the "Copied!" confirmation is still showing at `now`
    pub fn show_copied(&self, now: Instant) -> bool {
        self.copied_at
            .map(|at| now.saturating_duration_since(at) < COPY_FEEDBACK)
            .unwrap_or(false)
    }

    /// Time left before the confirmation reverts
    pub fn feedback_remaining(&self, now: Instant) -> Option<Duration> {
        self.copied_at
            .map(|at| COPY_FEEDBACK.saturating_sub(now.saturating_duration_since(at)))
            .filter(|d| !d.is_zero())
    }

    pub fn reset(&mut self) {
        self.copied_at = None;
    }
}

/// All view-local state
#[derive(Debug, Default)]
pub struct ViewStates {
    pub upload: UploadViewState,
    pub result: ResultViewState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_feedback_expires() {
        let mut state = ResultViewState::default();
        let start = Instant::now();
        assert!(!state.show_copied(start));

        state.mark_copied(start);
        assert!(state.show_copied(start + Duration::from_millis(1500)));
        assert_eq!(
            state.feedback_remaining(start + Duration::from_millis(500)),
            Some(Duration::from_millis(1500))
        );

        assert!(!state.show_copied(start + COPY_FEEDBACK));
        assert_eq!(state.feedback_remaining(start + Duration::from_secs(3)), None);
    }

    #[test]
    fn test_reset_clears_feedback() {
        let mut state = ResultViewState::default();
        let now = Instant::now();
        state.mark_copied(now);
        state.reset();
        assert!(!state.show_copied(now));
    }
}
