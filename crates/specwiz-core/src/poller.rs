//! Background polling of long-running backend jobs.
//!
//! [`JobPoller::spawn`] starts a task that fetches one job on a fixed
//! interval and publishes each snapshot through a `watch` channel. The task
//! stops by itself once the job reaches a terminal status. Callers hold a
//! [`JobPollHandle`]; cancelling or dropping it stops the task.
//!
//! ```rust
//! use std::{sync::Arc, time::Duration};
//!
//! use specwiz_core::{
//!     backend::MemoryBackend,
//!     models::{Job, JobStatus},
//!     poller::JobPoller,
//! };
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let backend = Arc::new(MemoryBackend::new(1).with_job(Job::new(5, JobStatus::Completed)));
//! let handle = JobPoller::spawn(backend, 5, Duration::from_millis(10));
//!
//! let last = handle.wait().await.expect("one snapshot");
//! assert_eq!(last.status, JobStatus::Completed);
//! # }
//! ```

use std::{sync::Arc, time::Duration};

use log::{debug, warn};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::{backend::JobBackend, models::Job};

/// Shortest interval a poller ticks at.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Spawns job polling tasks.
pub struct JobPoller;

impl JobPoller {
    /// Starts polling `job_id` every `interval`.
    ///
    /// The first fetch happens immediately. Fetch errors are logged and the
    /// next tick tries again. Intervals below [`MIN_POLL_INTERVAL`],
    /// including zero, are raised to it.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn spawn(backend: Arc<dyn JobBackend>, job_id: u64, interval: Duration) -> JobPollHandle {
        let interval = interval.max(MIN_POLL_INTERVAL);
        let (tx, rx) = watch::channel(None);
        let token = CancellationToken::new();
        let task = tokio::spawn(poll_loop(backend, job_id, interval, tx, token.clone()));

        JobPollHandle {
            job_id,
            rx,
            token,
            task: Some(task),
        }
    }
}

async fn poll_loop(
    backend: Arc<dyn JobBackend>,
    job_id: u64,
    interval: Duration,
    tx: watch::Sender<Option<Job>>,
    token: CancellationToken,
) {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = token.cancelled() => {
                debug!("Polling of job {job_id} cancelled");
                break;
            }
            _ = ticker.tick() => {}
        }

        let fetched = tokio::select! {
            _ = token.cancelled() => {
                debug!("Polling of job {job_id} cancelled mid-fetch");
                break;
            }
            fetched = backend.get_job(job_id) => fetched,
        };

        match fetched {
            Ok(job) => {
                let terminal = job.status.is_terminal();
                debug!("Job {job_id} is {}", job.status);
                tx.send_replace(Some(job));
                if terminal {
                    break;
                }
            }
            Err(e) => warn!("Failed to poll job {job_id}: {e}"),
        }
    }
}

/// Handle to a running job poller.
///
/// Dropping the handle cancels the task.
pub struct JobPollHandle {
    job_id: u64,
    rx: watch::Receiver<Option<Job>>,
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl JobPollHandle {
    pub fn job_id(&self) -> u64 {
        self.job_id
    }

    /// The most recent snapshot, if any fetch has succeeded yet.
    pub fn latest(&self) -> Option<Job> {
        self.rx.borrow().clone()
    }

    /// Waits for the next snapshot.
    ///
    /// Returns `None` once the poller has stopped and every snapshot has
    /// been seen.
    pub async fn changed(&mut self) -> Option<Job> {
        self.rx.changed().await.ok()?;
        self.rx.borrow_and_update().clone()
    }

    /// Stops polling. Idempotent.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the polling task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Waits for the poller to stop and returns the last snapshot.
    pub async fn wait(mut self) -> Option<Job> {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Poller for job {} ended abnormally: {e}", self.job_id);
            }
        }
        self.latest()
    }
}

impl Drop for JobPollHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
