//! Application Coordinator
//!
//! Owns the tokio runtime jobs run on, the job-event channel and the
//! recognition orchestrator for the lifetime of the window.

use anyhow::{Context, Result};
use crossbeam_channel::{unbounded, Receiver};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::session::{JobId, RecognitionOrchestrator, SessionState, SubmitError};
use crate::shared::{JobEvent, SharedAppState};
use crate::translation::{HttpTranslator, TranslationRelay, TranslationTrigger, Translator};
use crate::vision::{self, ImageInput, RecognitionEngine};

/// Main application coordinator
pub struct TextLensApp {
    /// Configuration and runtime counters
    pub shared_state: Arc<RwLock<SharedAppState>>,
    orchestrator: RecognitionOrchestrator,
    /// Events from running jobs, drained by the UI
    events: Receiver<JobEvent>,
    runtime: Option<Runtime>,
}

impl TextLensApp {
    /// Create a coordinator using the backends named in `config`
    pub fn new(config: AppConfig) -> Result<Self> {
        let engine = vision::build_engine(&config.recognition, &config.preprocessing)?;
        let translator = Arc::new(HttpTranslator::new(&config.translation)?);
        info!("Translation endpoint: {}", translator.endpoint());
        Self::with_backends(config, engine, translator)
    }

    /// Create a coordinator with explicit recognition and translation backends
    pub fn with_backends(
        config: AppConfig,
        engine: Arc<dyn RecognitionEngine>,
        translator: Arc<dyn Translator>,
    ) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("textlens-worker")
            .enable_all()
            .build()
            .context("Failed to start async runtime")?;

        let relay = TranslationRelay::from_settings(translator, &config.translation);
        let trigger = TranslationTrigger::from_settings(&config.translation);
        let (tx, events) = unbounded();
        let orchestrator =
            RecognitionOrchestrator::new(engine, relay, trigger, runtime.handle().clone(), tx);

        info!("Recognition engine: {}", orchestrator.engine_name());

        Ok(Self {
            shared_state: Arc::new(RwLock::new(SharedAppState::new(config))),
            orchestrator,
            events,
            runtime: Some(runtime),
        })
    }

    /// Submit an image for recognition in `language`
    pub fn submit(
        &self,
        session: &mut SessionState,
        input: ImageInput,
        language: &str,
    ) -> Result<JobId, SubmitError> {
        self.orchestrator.submit(session, input, language)
    }

    /// Apply all pending job events to `session`. Returns true if any
    /// event was received.
    pub fn poll_events(&self, session: &mut SessionState) -> bool {
        let mut received = false;
        for event in self.events.try_iter() {
            received = true;
            if let JobEvent::Finished { job_id, outcome } = &event {
                if session.active_job_id() == Some(*job_id) {
                    self.shared_state.write().runtime.record(outcome);
                }
            }
            session.apply(event);
        }
        received
    }
}

impl Drop for TextLensApp {
    fn drop(&mut self) {
        // Running jobs are abandoned; child processes die with kill_on_drop
        if let Some(runtime) = self.runtime.take() {
            debug!("Shutting down async runtime");
            runtime.shutdown_timeout(Duration::from_secs(2));
        }
    }
}
