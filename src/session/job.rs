//! Recognition jobs and their outcomes

use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::session::stats::TextStats;
use crate::vision::SourceImage;

/// Identifier of one recognition attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form is enough to tell jobs apart in logs
        write!(f, "{}", &self.0.simple().to_string()[..8])
    }
}

/// One end-to-end attempt to recognize a single image
#[derive(Debug, Clone)]
pub struct RecognitionJob {
    pub id: JobId,
    pub image: Arc<SourceImage>,
    /// Recognition language code selected when the job was submitted
    pub language: String,
}

impl RecognitionJob {
    pub fn new(image: Arc<SourceImage>, language: impl Into<String>) -> Self {
        Self {
            id: JobId::new(),
            image,
            language: language.into(),
        }
    }
}

/// Text produced by a successful job
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionResult {
    pub text: String,
    pub stats: TextStats,
    /// Present only when translation was triggered
    pub translation: Option<String>,
}

impl RecognitionResult {
    pub fn new(text: String, translation: Option<String>) -> Self {
        let stats = TextStats::from_text(&text);
        Self {
            text,
            stats,
            translation,
        }
    }
}

/// Terminal state of a job
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Completed(RecognitionResult),
    /// Recognition failed; carries the error description for logs
    Failed(String),
    Cancelled,
}
