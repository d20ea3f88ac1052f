//! Recognition orchestrator
//!
//! Validates submitted images, moves the session into the processing view and
//! runs each job on the tokio runtime. A job acquires a worker from the
//! configured [`RecognitionEngine`], recognizes the image, always terminates
//! the worker, and then hands the text to the translation relay when the
//! trigger matches.

use crossbeam_channel::Sender;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

use crate::session::error::SubmitError;
use crate::session::job::{JobId, JobOutcome, RecognitionJob, RecognitionResult};
use crate::session::progress::{ProgressEvent, ProgressSender};
use crate::session::state::SessionState;
use crate::shared::JobEvent;
use crate::translation::{TranslationRelay, TranslationTrigger};
use crate::vision::{ImageInput, RecognitionEngine, RecognitionError, SourceImage};

/// Starts recognition jobs and drives them to a terminal outcome
#[derive(Clone)]
pub struct RecognitionOrchestrator {
    engine: Arc<dyn RecognitionEngine>,
    relay: TranslationRelay,
    trigger: TranslationTrigger,
    runtime: Handle,
    events: Sender<JobEvent>,
}

impl RecognitionOrchestrator {
    pub fn new(
        engine: Arc<dyn RecognitionEngine>,
        relay: TranslationRelay,
        trigger: TranslationTrigger,
        runtime: Handle,
        events: Sender<JobEvent>,
    ) -> Self {
        Self {
            engine,
            relay,
            trigger,
            runtime,
            events,
        }
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    /// Validate `input` and start a job for it.
    ///
    /// Invalid input leaves the session untouched. While another job is
    /// active the submission is rejected with [`SubmitError::Busy`].
    pub fn submit(
        &self,
        state: &mut SessionState,
        input: ImageInput,
        language: &str,
    ) -> Result<JobId, SubmitError> {
        let image = Arc::new(SourceImage::validate(input)?);
        let job = RecognitionJob::new(image.clone(), language);
        let cancel = CancellationToken::new();

        state.begin_job(job.id, cancel.clone(), image)?;

        info!(
            job_id = %job.id,
            image = %job.image.name,
            language = %job.language,
            "Submitted recognition job"
        );

        let progress = ProgressSender::new(job.id, self.events.clone(), cancel);
        let orchestrator = self.clone();
        let job_id = job.id;
        let task_progress = progress.clone();
        let task = self
            .runtime
            .spawn(async move { orchestrator.execute(&job, &task_progress).await });

        // A panicking engine must still deliver a terminal outcome
        self.runtime.spawn(async move {
            let outcome = match task.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(job_id = %job_id, "Recognition task aborted: {}", e);
                    JobOutcome::Failed(format!("recognition task aborted: {}", e))
                }
            };
            progress.finish(outcome);
        });

        Ok(job_id)
    }

    /// Run one job to completion. Never panics on engine or translation
    /// failures; they are folded into the returned outcome.
    #[instrument(skip_all, fields(job_id = %job.id, language = %job.language))]
    pub async fn execute(&self, job: &RecognitionJob, progress: &ProgressSender) -> JobOutcome {
        debug!("Using {} engine", self.engine.name());
        progress.send(ProgressEvent::initializing());

        let created = tokio::select! {
            biased;
            _ = progress.cancelled() => Err(RecognitionError::Cancelled),
            created = self.engine.create_worker(&job.language, progress) => created,
        };
        let mut worker = match created {
            Ok(worker) => worker,
            Err(e) => return failure(e),
        };

        let recognized = tokio::select! {
            biased;
            _ = progress.cancelled() => Err(RecognitionError::Cancelled),
            text = worker.recognize(&job.image, progress) => text,
        };
        worker.terminate().await;

        let text = match recognized {
            Ok(text) => text,
            Err(e) => return failure(e),
        };

        let translation = if self.trigger.should_translate(&job.language, &text) {
            progress.send(ProgressEvent::translating());
            tokio::select! {
                biased;
                _ = progress.cancelled() => return JobOutcome::Cancelled,
                translated = self.relay.translate(&text) => Some(translated),
            }
        } else {
            None
        };

        let result = RecognitionResult::new(text, translation);
        info!(
            characters = result.stats.characters,
            words = result.stats.words,
            translated = result.translation.is_some(),
            "Recognition completed"
        );
        JobOutcome::Completed(result)
    }
}

fn failure(err: RecognitionError) -> JobOutcome {
    match err {
        RecognitionError::Cancelled => {
            info!("Recognition cancelled");
            JobOutcome::Cancelled
        }
        err => {
            error!("Recognition failed: {}", err);
            JobOutcome::Failed(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::state::UiView;
    use crate::translation::{TranslationError, Translator};
    use async_trait::async_trait;
    use crossbeam_channel::{unbounded, Receiver};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::vision::RecognitionWorker;

    #[derive(Clone)]
    enum Script {
        Text(&'static str),
        Fail,
        Hang,
        Panic,
    }

    /// Engine returning scripted text and counting worker lifecycles
    struct StubEngine {
        script: Script,
        created: Arc<AtomicUsize>,
        terminated: Arc<AtomicUsize>,
    }

    impl StubEngine {
        fn new(script: Script) -> Self {
            Self {
                script,
                created: Arc::new(AtomicUsize::new(0)),
                terminated: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl RecognitionEngine for StubEngine {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn create_worker(
            &self,
            _language: &str,
            _progress: &ProgressSender,
        ) -> Result<Box<dyn RecognitionWorker>, RecognitionError> {
            self.created.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(StubWorker {
                script: self.script.clone(),
                terminated: self.terminated.clone(),
            }))
        }
    }

    struct StubWorker {
        script: Script,
        terminated: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl RecognitionWorker for StubWorker {
        async fn recognize(
            &mut self,
            _image: &SourceImage,
            progress: &ProgressSender,
        ) -> Result<String, RecognitionError> {
            progress.send(ProgressEvent::recognizing(0.5));
            match self.script {
                Script::Text(text) => {
                    progress.send(ProgressEvent::recognizing(1.0));
                    Ok(text.to_string())
                }
                Script::Fail => Err(anyhow::anyhow!("engine crashed").into()),
                Script::Hang => std::future::pending().await,
                Script::Panic => panic!("engine bug"),
            }
        }

        async fn terminate(self: Box<Self>) {
            self.terminated.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct RecordingTranslator {
        calls: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl Translator for RecordingTranslator {
        async fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslationError> {
            self.calls.lock().push(text.to_string());
            if self.fail {
                Err(TranslationError::Malformed("down".to_string()))
            } else {
                Ok(format!("[{}] {}", target_lang, text))
            }
        }
    }

    struct Fixture {
        orchestrator: RecognitionOrchestrator,
        events: Receiver<JobEvent>,
        terminated: Arc<AtomicUsize>,
        created: Arc<AtomicUsize>,
        translator: Arc<RecordingTranslator>,
    }

    fn fixture(script: Script, translation_fails: bool, runtime: Handle) -> Fixture {
        let engine = StubEngine::new(script);
        let terminated = engine.terminated.clone();
        let created = engine.created.clone();
        let translator = Arc::new(RecordingTranslator {
            calls: Mutex::new(Vec::new()),
            fail: translation_fails,
        });
        let (tx, rx) = unbounded();

        let orchestrator = RecognitionOrchestrator::new(
            Arc::new(engine),
            TranslationRelay::new(translator.clone(), "en", "translation unavailable"),
            TranslationTrigger::new("ben"),
            runtime,
            tx,
        );

        Fixture {
            orchestrator,
            events: rx,
            terminated,
            created,
            translator,
        }
    }

    fn job(language: &str) -> RecognitionJob {
        RecognitionJob::new(Arc::new(SourceImage::solid_for_tests(4, 4)), language)
    }

    fn completed(outcome: JobOutcome) -> RecognitionResult {
        match outcome {
            JobOutcome::Completed(result) => result,
            other => panic!("expected completion, got {:?}", other),
        }
    }

    fn png_input() -> ImageInput {
        ImageInput::from_rgba("scan.png", 2, 2, vec![255; 16]).unwrap()
    }

    fn sender(fx: &Fixture, job: &RecognitionJob) -> (ProgressSender, CancellationToken) {
        let cancel = CancellationToken::new();
        (
            ProgressSender::new(job.id, fx.orchestrator.events.clone(), cancel.clone()),
            cancel,
        )
    }

    /// Apply events to `state` until the job finishes
    fn drain_until_finished(state: &mut SessionState, events: &Receiver<JobEvent>) -> Vec<String> {
        let mut statuses = Vec::new();
        loop {
            let event = events
                .recv_timeout(Duration::from_secs(5))
                .expect("job did not finish");
            let terminal = event.is_terminal();
            state.apply(event);
            statuses.push(state.status_line.clone());
            if terminal {
                return statuses;
            }
        }
    }

    #[tokio::test]
    async fn test_english_job_completes_without_translation() {
        let fx = fixture(Script::Text("Hello world"), false, Handle::current());
        let job = job("eng");
        let (progress, _) = sender(&fx, &job);

        let outcome = fx.orchestrator.execute(&job, &progress).await;

        let result = completed(outcome);
        assert_eq!(result.text, "Hello world");
        assert_eq!(result.stats.characters, 11);
        assert_eq!(result.stats.words, 2);
        assert!(result.translation.is_none());
        assert!(fx.translator.calls.lock().is_empty());
        assert_eq!(fx.terminated.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_trigger_language_is_translated() {
        let fx = fixture(Script::Text("আমি ভাত খাই"), false, Handle::current());
        let job = job("ben");
        let (progress, _) = sender(&fx, &job);

        let outcome = fx.orchestrator.execute(&job, &progress).await;

        let result = completed(outcome);
        assert_eq!(result.translation.as_deref(), Some("[en] আমি ভাত খাই"));
        assert_eq!(fx.translator.calls.lock().as_slice(), &["আমি ভাত খাই".to_string()]);

        let statuses: Vec<String> = fx
            .events
            .try_iter()
            .filter_map(|e| match e {
                JobEvent::Progress { event, .. } => Some(event.status_line()),
                _ => None,
            })
            .collect();
        assert_eq!(statuses.first().map(String::as_str), Some("Initializing..."));
        assert_eq!(statuses.last().map(String::as_str), Some("Translating text..."));
    }

    #[tokio::test]
    async fn test_blank_text_is_not_translated() {
        let fx = fixture(Script::Text("  \n "), false, Handle::current());
        let job = job("ben");
        let (progress, _) = sender(&fx, &job);

        let outcome = fx.orchestrator.execute(&job, &progress).await;

        assert!(matches!(
            outcome,
            JobOutcome::Completed(RecognitionResult { translation: None, .. })
        ));
        assert!(fx.translator.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn test_translation_failure_uses_fallback() {
        let fx = fixture(Script::Text("আমি"), true, Handle::current());
        let job = job("ben");
        let (progress, _) = sender(&fx, &job);

        let outcome = fx.orchestrator.execute(&job, &progress).await;

        let result = completed(outcome);
        assert_eq!(result.text, "আমি");
        assert_eq!(result.translation.as_deref(), Some("translation unavailable"));
    }

    #[tokio::test]
    async fn test_engine_failure_still_terminates_worker() {
        let fx = fixture(Script::Fail, false, Handle::current());
        let job = job("eng");
        let (progress, _) = sender(&fx, &job);

        let outcome = fx.orchestrator.execute(&job, &progress).await;

        let reason = match outcome {
            JobOutcome::Failed(reason) => reason,
            other => panic!("expected failure, got {:?}", other),
        };
        assert!(reason.contains("engine crashed"));
        assert_eq!(fx.created.load(Ordering::SeqCst), 1);
        assert_eq!(fx.terminated.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancelled_job_terminates_worker() {
        let fx = fixture(Script::Hang, false, Handle::current());
        let job = job("eng");
        let (progress, cancel) = sender(&fx, &job);

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            cancel.cancel();
        });
        let outcome = fx.orchestrator.execute(&job, &progress).await;
        canceller.await.unwrap();

        assert_eq!(outcome, JobOutcome::Cancelled);
        assert_eq!(fx.terminated.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_submit_runs_job_to_result_view() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let fx = fixture(Script::Text("Hello world"), false, runtime.handle().clone());
        let mut state = SessionState::new("eng");

        let id = fx.orchestrator.submit(&mut state, png_input(), "eng").unwrap();
        assert_eq!(state.view(), UiView::Processing);
        assert_eq!(state.active_job_id(), Some(id));

        let statuses = drain_until_finished(&mut state, &fx.events);

        assert!(statuses.iter().any(|s| s == "Recognizing... 50%"));
        assert_eq!(state.view(), UiView::Result);
        assert_eq!(state.output_text, "Hello world");
        assert_eq!(state.progress_percent, 100);
        assert!(state.translation().is_none());
    }

    #[test]
    fn test_submit_failure_returns_to_upload() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let fx = fixture(Script::Fail, false, runtime.handle().clone());
        let mut state = SessionState::new("eng");

        fx.orchestrator.submit(&mut state, png_input(), "eng").unwrap();
        drain_until_finished(&mut state, &fx.events);

        assert_eq!(state.view(), UiView::Uploading);
        assert!(state.notice.is_some());
        assert!(!state.is_busy());
        assert_eq!(fx.terminated.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_panicking_engine_returns_to_upload() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let fx = fixture(Script::Panic, false, runtime.handle().clone());
        let mut state = SessionState::new("eng");

        fx.orchestrator.submit(&mut state, png_input(), "eng").unwrap();
        drain_until_finished(&mut state, &fx.events);

        assert_eq!(state.view(), UiView::Uploading);
        assert!(!state.is_busy());
        assert!(state.notice.is_some());
    }

    #[test]
    fn test_non_image_is_rejected_before_processing() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let fx = fixture(Script::Text("unused"), false, runtime.handle().clone());
        let mut state = SessionState::new("eng");

        let input = ImageInput::from_bytes(
            "notes.txt",
            Some("text/plain".to_string()),
            b"not an image".to_vec(),
        );
        let err = fx.orchestrator.submit(&mut state, input, "eng").unwrap_err();

        assert!(matches!(err, SubmitError::Invalid(_)));
        assert_eq!(state.view(), UiView::Uploading);
        assert!(!state.is_busy());
        assert_eq!(fx.created.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_second_submit_is_rejected_while_busy() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let fx = fixture(Script::Hang, false, runtime.handle().clone());
        let mut state = SessionState::new("eng");

        let first = fx.orchestrator.submit(&mut state, png_input(), "eng").unwrap();
        let err = fx.orchestrator.submit(&mut state, png_input(), "eng").unwrap_err();

        assert!(matches!(err, SubmitError::Busy));
        assert_eq!(state.active_job_id(), Some(first));

        state.cancel_active();
        drain_until_finished(&mut state, &fx.events);
        assert_eq!(state.view(), UiView::Uploading);
        assert!(state.notice.is_none());
    }
}
