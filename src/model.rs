use std::path::PathBuf;

/// One user request: fetch a single remote track into a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    /// Page URL of the track (non-empty, already trimmed)
    pub source_url: String,
    /// Existing directory the converted file is written to
    pub destination_folder: PathBuf,
}

/// Notification sent from the worker to the UI thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEvent {
    /// Percent complete, 0..=100
    Progress(u8),
    /// Terminal: the job succeeded
    Completed(String),
    /// Terminal: the job failed with the given text
    Failed(String),
}

impl WorkerEvent {
    /// Whether this event ends the job's stream.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, WorkerEvent::Progress(_))
    }
}

/// Final result of a job as seen by the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Success(String),
    Failure(String),
}

impl JobOutcome {
    /// Maps a terminal event to its outcome; `None` for progress events.
    pub fn from_event(event: &WorkerEvent) -> Option<Self> {
        match event {
            WorkerEvent::Progress(_) => None,
            WorkerEvent::Completed(msg) => Some(JobOutcome::Success(msg.clone())),
            WorkerEvent::Failed(err) => Some(JobOutcome::Failure(err.clone())),
        }
    }
}

/// Severity of a modal message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogLevel {
    Info,
    Error,
}

/// A modal message waiting to be shown by the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub level: DialogLevel,
    pub title: String,
    pub message: String,
}

impl Dialog {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: DialogLevel::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: DialogLevel::Error,
            title: "Error".to_string(),
            message: message.into(),
        }
    }
}
