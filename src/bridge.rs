//! Worker/UI bridge
//!
//! Runs one download off the UI thread and hands its notifications back in
//! order: zero or more `Progress` events, then exactly one `Completed` or
//! `Failed`. The UI drains the handle from its frame loop and never blocks.

use std::sync::Arc;

use tokio::{
    runtime::Handle,
    sync::mpsc::{unbounded_channel, UnboundedReceiver},
};
use tracing::{debug, info, warn};

use crate::{
    downloader::Extractor,
    model::{JobRequest, WorkerEvent},
    progress::ProgressHook,
};

/// Receiving end of one job's notifications
#[derive(Debug)]
pub struct WorkerHandle {
    rx: UnboundedReceiver<WorkerEvent>,
    terminated: bool,
}

impl WorkerHandle {
    /// Next pending event without waiting; `None` once the job has ended.
    pub fn try_next(&mut self) -> Option<WorkerEvent> {
        if self.terminated {
            return None;
        }
        let event = self.rx.try_recv().ok()?;
        self.observe(event)
    }

    /// Waits for the next event; `None` once the job has ended.
    pub async fn next(&mut self) -> Option<WorkerEvent> {
        if self.terminated {
            return None;
        }
        let event = self.rx.recv().await?;
        self.observe(event)
    }

    /// All events currently queued, in emission order.
    pub fn drain(&mut self) -> Vec<WorkerEvent> {
        std::iter::from_fn(|| self.try_next()).collect()
    }

    /// Whether the terminal event has been observed.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    fn observe(&mut self, event: WorkerEvent) -> Option<WorkerEvent> {
        if event.is_terminal() {
            self.terminated = true;
            // Nothing may follow the terminal event
            self.rx.close();
        }
        Some(event)
    }
}

/// Starts one worker for `job` on `runtime` and returns immediately.
///
/// The job is not validated here.
pub fn start<E: Extractor>(
    runtime: &Handle,
    extractor: Arc<E>,
    job: JobRequest,
    success_message: String,
) -> WorkerHandle {
    let (tx, rx) = unbounded_channel();
    let terminal_tx = tx.clone();

    info!(url = %job.source_url, folder = %job.destination_folder.display(), "Starting download");
    let inner = runtime.spawn(async move {
        let hook = ProgressHook::new(tx);
        extractor.download(&job, &hook).await
    });

    runtime.spawn(async move {
        let event = match inner.await {
            Ok(Ok(())) => {
                info!("Download complete");
                WorkerEvent::Completed(success_message)
            }
            Ok(Err(err)) => {
                warn!(error = %err, "Download failed");
                WorkerEvent::Failed(err.to_string())
            }
            Err(join_err) => {
                warn!(error = %join_err, "Download worker aborted");
                WorkerEvent::Failed(join_err.to_string())
            }
        };
        if terminal_tx.send(event).is_err() {
            debug!("Job outcome dropped; receiver is gone");
        }
    });

    WorkerHandle {
        rx,
        terminated: false,
    }
}
