//! Tracks one remote render from submission to a terminal state.
//!
//! [`StatusPoller`] is the state machine: it is fed one status query result
//! at a time and decides whether polling continues. [`PollerHandle`] runs it
//! on a timer in a tokio task and publishes every change through a `watch`
//! channel. [`PollerSlot`] owns at most one running poller and cancels the
//! previous one when a new job is tracked.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;
use crate::models::generation::JobId;
use crate::models::job::{EmbeddedError, JobStatus, StatusEnvelope, StatusSnapshot};
use crate::services::heygen::HeyGenError;

/// Error text when the status query itself fails.
pub const STATUS_CHECK_FAILED: &str = "Failed to check video status";

/// Error text when the status envelope does not signal success.
pub const UNEXPECTED_RESPONSE: &str = "Unexpected response from server";

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Anywhere a job's status can be read from.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_status(&self, job_id: &JobId) -> Result<StatusEnvelope, HeyGenError>;
}

/// Upstream combinations that are accepted but worth flagging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anomaly {
    /// `completed` arrived together with an embedded error object.
    CompletedWithError,
    /// `completed` arrived without a video URL.
    CompletedWithoutUrl,
}

/// What an observer of a tracked job can see.
#[derive(Debug, Clone, PartialEq)]
pub struct PollView {
    pub job_id: JobId,
    pub status: JobStatus,
    pub video_url: Option<String>,
    pub error: Option<String>,
    pub anomaly: Option<Anomaly>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

#[derive(Debug, Clone, Copy)]
pub struct PollerSettings {
    pub interval: Duration,
    /// Consecutive failed queries before the job is declared failed (minimum 1).
    pub max_query_failures: u32,
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_query_failures: 1,
        }
    }
}

impl PollerSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            interval: config.poll_interval(),
            max_query_failures: config.max_status_failures,
        }
    }
}

pub type CompletionCallback = Box<dyn FnOnce(String) + Send + 'static>;

/// Status state machine for a single job.
pub struct StatusPoller {
    view: PollView,
    on_complete: Option<CompletionCallback>,
    consecutive_failures: u32,
    max_query_failures: u32,
}

impl StatusPoller {
    pub fn new(
        job_id: JobId,
        max_query_failures: u32,
        on_complete: impl FnOnce(String) + Send + 'static,
    ) -> Self {
        Self {
            view: PollView {
                job_id,
                status: JobStatus::Pending,
                video_url: None,
                error: None,
                anomaly: None,
            },
            on_complete: Some(Box::new(on_complete)),
            consecutive_failures: 0,
            max_query_failures: max_query_failures.max(1),
        }
    }

    pub fn job_id(&self) -> &JobId {
        &self.view.job_id
    }

    pub fn view(&self) -> &PollView {
        &self.view
    }

    pub fn into_view(self) -> PollView {
        self.view
    }

    pub fn is_terminal(&self) -> bool {
        self.view.status.is_terminal()
    }

    /// Apply the result of one status query.
    ///
    /// Results arriving after a terminal state are ignored, so the
    /// completion callback runs at most once.
    pub fn observe(&mut self, result: Result<StatusEnvelope, HeyGenError>) -> Flow {
        if self.is_terminal() {
            return Flow::Stop;
        }

        let envelope = match result {
            Ok(envelope) => envelope,
            Err(e) => return self.query_failed(&e),
        };
        self.consecutive_failures = 0;

        let Some(snapshot) = envelope.snapshot() else {
            tracing::warn!(
                job_id = %self.view.job_id,
                code = envelope.code,
                message = envelope.message.as_deref().unwrap_or_default(),
                "Unexpected status envelope"
            );
            return self.fail(UNEXPECTED_RESPONSE);
        };

        if self.view.status != snapshot.status {
            tracing::info!(
                job_id = %self.view.job_id,
                from = %self.view.status,
                to = %snapshot.status,
                "Job status changed"
            );
        }
        self.view.status = snapshot.status;

        if let Some(text) = snapshot.error.as_ref().and_then(EmbeddedError::text) {
            self.view.error = Some(text.to_string());
        }

        match snapshot.status {
            JobStatus::Completed => self.complete(snapshot),
            JobStatus::Failed => {
                tracing::warn!(
                    job_id = %self.view.job_id,
                    error = self.view.error.as_deref().unwrap_or_default(),
                    "Video generation failed upstream"
                );
                Flow::Stop
            }
            JobStatus::Pending | JobStatus::Processing | JobStatus::Waiting => Flow::Continue,
        }
    }

    fn query_failed(&mut self, error: &HeyGenError) -> Flow {
        self.consecutive_failures += 1;
        metrics::counter!("status_poll_failures_total").increment(1);
        tracing::warn!(
            job_id = %self.view.job_id,
            error = %error,
            transport = error.is_transport(),
            failures = self.consecutive_failures,
            "Status check failed"
        );

        if self.consecutive_failures >= self.max_query_failures {
            self.fail(STATUS_CHECK_FAILED)
        } else {
            Flow::Continue
        }
    }

    fn complete(&mut self, snapshot: &StatusSnapshot) -> Flow {
        let Some(url) = snapshot.video_url() else {
            tracing::warn!(job_id = %self.view.job_id, "Job completed without a video URL");
            self.view.anomaly = Some(Anomaly::CompletedWithoutUrl);
            return Flow::Stop;
        };

        self.view.video_url = Some(url.to_string());
        if snapshot.error.is_some() {
            tracing::warn!(
                job_id = %self.view.job_id,
                error = self.view.error.as_deref().unwrap_or_default(),
                "Job completed with an embedded error"
            );
            self.view.anomaly = Some(Anomaly::CompletedWithError);
        }

        tracing::info!(job_id = %self.view.job_id, video_url = %url, "Video generation completed");
        if let Some(on_complete) = self.on_complete.take() {
            on_complete(url.to_string());
        }
        Flow::Stop
    }

    fn fail(&mut self, detail: &str) -> Flow {
        self.view.status = JobStatus::Failed;
        self.view.error = Some(detail.to_string());
        Flow::Stop
    }
}

/// Query `source` every `interval` until the poller stops or `cancel` fires.
async fn drive<S>(
    mut poller: StatusPoller,
    source: Arc<S>,
    interval: Duration,
    cancel: CancellationToken,
    view_tx: watch::Sender<PollView>,
) -> PollView
where
    S: StatusSource + ?Sized,
{
    let job_id = poller.job_id().clone();
    let mut ticker = interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!(job_id = %job_id, "Status polling cancelled");
                break;
            }
            _ = ticker.tick() => {
                metrics::counter!("status_polls_total").increment(1);
                let result = tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::debug!(job_id = %job_id, "Status polling cancelled mid-query");
                        break;
                    }
                    result = source.fetch_status(&job_id) => result,
                };

                let flow = poller.observe(result);
                view_tx.send_replace(poller.view().clone());
                if flow == Flow::Stop {
                    break;
                }
            }
        }
    }

    poller.into_view()
}

/// A running poller. Dropping the handle cancels its timer.
pub struct PollerHandle {
    job_id: JobId,
    cancel: CancellationToken,
    view: watch::Receiver<PollView>,
    task: Option<JoinHandle<PollView>>,
}

impl PollerHandle {
    pub fn spawn<S>(
        job_id: JobId,
        source: Arc<S>,
        settings: PollerSettings,
        on_complete: impl FnOnce(String) + Send + 'static,
    ) -> Self
    where
        S: StatusSource + ?Sized + 'static,
    {
        let interval = settings.interval.max(MIN_INTERVAL);
        let poller = StatusPoller::new(job_id.clone(), settings.max_query_failures, on_complete);
        let (view_tx, view_rx) = watch::channel(poller.view().clone());
        let cancel = CancellationToken::new();

        tracing::info!(
            job_id = %job_id,
            interval_ms = interval.as_millis() as u64,
            "Status polling started"
        );
        let task = tokio::spawn(drive(poller, source, interval, cancel.clone(), view_tx));

        Self {
            job_id,
            cancel,
            view: view_rx,
            task: Some(task),
        }
    }

    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    /// Receiver that sees every state the poller publishes.
    pub fn subscribe(&self) -> watch::Receiver<PollView> {
        self.view.clone()
    }

    pub fn current(&self) -> PollView {
        self.view.borrow().clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the polling task to end and return its final view.
    pub async fn wait(&mut self) -> PollView {
        match self.task.take() {
            Some(task) => match task.await {
                Ok(view) => view,
                Err(e) => {
                    tracing::error!(job_id = %self.job_id, error = %e, "Status polling task aborted");
                    self.current()
                }
            },
            None => self.current(),
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Holds the one active poller of an owner (a page, a terminal session).
#[derive(Default)]
pub struct PollerSlot {
    active: Option<PollerHandle>,
}

impl PollerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `job_id`, cancelling whatever was tracked before.
    pub fn track<S>(
        &mut self,
        job_id: JobId,
        source: Arc<S>,
        settings: PollerSettings,
        on_complete: impl FnOnce(String) + Send + 'static,
    ) -> &mut PollerHandle
    where
        S: StatusSource + ?Sized + 'static,
    {
        if let Some(previous) = self.active.take() {
            tracing::info!(
                previous = %previous.job_id(),
                next = %job_id,
                "Superseding active status poller"
            );
            previous.cancel();
        }
        self.active
            .insert(PollerHandle::spawn(job_id, source, settings, on_complete))
    }

    pub fn active(&self) -> Option<&PollerHandle> {
        self.active.as_ref()
    }

    pub fn active_mut(&mut self) -> Option<&mut PollerHandle> {
        self.active.as_mut()
    }

    /// Cancel and forget the active poller, if any.
    pub fn clear(&mut self) {
        if let Some(handle) = self.active.take() {
            handle.cancel();
        }
    }
}
