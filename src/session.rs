//! Per-window session state: inputs, the in-flight job and pending dialogs.

use std::{collections::VecDeque, path::PathBuf, sync::Arc};

use tokio::runtime::Handle;
use tracing::{info, warn};

use crate::{
    bridge::{self, WorkerHandle},
    downloader::Extractor,
    errors::ValidationError,
    model::{Dialog, JobOutcome, JobRequest, WorkerEvent},
};

/// Everything the window needs to run one job at a time.
pub struct Session<E: Extractor> {
    /// Text of the URL field
    pub url_input: String,
    /// Text of the destination folder field
    pub folder_input: String,
    progress: u8,
    worker: Option<WorkerHandle>,
    dialogs: VecDeque<Dialog>,
    extractor: Arc<E>,
    runtime: Handle,
    success_message: String,
}

impl<E: Extractor> Session<E> {
    pub fn new(
        runtime: Handle,
        extractor: E,
        download_dir: PathBuf,
        success_message: impl Into<String>,
    ) -> Self {
        Self {
            url_input: String::new(),
            folder_input: download_dir.display().to_string(),
            progress: 0,
            worker: None,
            dialogs: VecDeque::new(),
            extractor: Arc::new(extractor),
            runtime,
            success_message: success_message.into(),
        }
    }

    /// Current progress bar value, 0..=100
    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// The download trigger is usable only while no job is in flight.
    pub fn trigger_enabled(&self) -> bool {
        self.worker.is_none()
    }

    /// Dialog that should currently be on screen.
    pub fn current_dialog(&self) -> Option<&Dialog> {
        self.dialogs.front()
    }

    /// Closes the dialog on screen.
    pub fn dismiss_dialog(&mut self) {
        self.dialogs.pop_front();
    }

    /// Checks the inputs and builds the job they describe.
    pub fn validate(&self) -> Result<JobRequest, ValidationError> {
        let url = self.url_input.trim();
        if url.is_empty() {
            return Err(ValidationError::EmptyUrl);
        }
        let folder = PathBuf::from(self.folder_input.trim());
        if !folder.is_dir() {
            return Err(ValidationError::MissingFolder);
        }
        Ok(JobRequest {
            source_url: url.to_string(),
            destination_folder: folder,
        })
    }

    /// Handles a click on the download button.
    ///
    /// Returns whether a worker was started.
    pub fn start_download(&mut self) -> bool {
        if !self.trigger_enabled() {
            return false;
        }
        let job = match self.validate() {
            Ok(job) => job,
            Err(err) => {
                warn!(error = %err, "Rejected download request");
                self.dialogs.push_back(Dialog::error(err.to_string()));
                return false;
            }
        };

        self.progress = 0;
        self.worker = Some(bridge::start(
            &self.runtime,
            Arc::clone(&self.extractor),
            job,
            self.success_message.clone(),
        ));
        true
    }

    /// Applies every queued worker event; returns the outcome if the job ended.
    pub fn pump(&mut self) -> Option<JobOutcome> {
        let worker = self.worker.as_mut()?;
        let events = worker.drain();
        let finished = worker.is_terminated();
        let mut outcome = None;
        for event in events {
            match &event {
                WorkerEvent::Progress(pct) => self.progress = *pct,
                WorkerEvent::Completed(msg) => {
                    self.dialogs.push_back(Dialog::info("Done", msg.clone()));
                }
                WorkerEvent::Failed(err) => {
                    self.dialogs
                        .push_back(Dialog::error(format!("Download failed:\n{err}")));
                }
            }
            if let Some(done) = JobOutcome::from_event(&event) {
                outcome = Some(done);
            }
        }
        if finished {
            self.worker = None;
            info!(progress = self.progress, "Job finished; download re-enabled");
        }
        outcome
    }
}
