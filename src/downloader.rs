use std::{future::Future, process::Stdio};

use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, BufReader},
    process::Command,
};
use tracing::{debug, info};

use crate::{
    config::DownloadProfile,
    errors::{DownloadError, Result},
    model::JobRequest,
    progress::{parse_tick, progress_template, ProgressHook},
};

/// Fetches and converts one track, reporting ticks to the hook as it goes.
pub trait Extractor: Send + Sync + 'static {
    fn download(
        &self,
        job: &JobRequest,
        hook: &ProgressHook,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Extractor backed by the `yt-dlp` executable (which runs ffmpeg itself).
#[derive(Debug, Clone, Default)]
pub struct YtDlp {
    profile: DownloadProfile,
}

impl YtDlp {
    pub fn new(profile: DownloadProfile) -> Self {
        Self { profile }
    }

    /// Command line for one job, without the program name.
    pub fn args(&self, job: &JobRequest) -> Vec<String> {
        let p = &self.profile;
        let mut args = Vec::new();
        if p.single_item {
            args.push("--no-playlist".to_owned());
        }
        args.extend(
            ["--newline", "--quiet", "--progress", "--no-warnings", "--progress-template"]
                .map(String::from),
        );
        args.push(progress_template());

        args.push("-f".to_owned());
        args.push(p.format.clone());

        args.push("-x".to_owned());
        args.push("--audio-format".to_owned());
        args.push(p.audio_format.clone());
        args.push("--audio-quality".to_owned());
        args.push(p.audio_quality.clone());

        args.push("-o".to_owned());
        args.push(p.output_path(&job.destination_folder));
        args.push(job.source_url.clone());
        args
    }
}

impl Extractor for YtDlp {
    async fn download(&self, job: &JobRequest, hook: &ProgressHook) -> Result<()> {
        let mut child = Command::new(&self.profile.binary)
            .args(self.args(job))
            .env("PYTHONIOENCODING", "UTF-8")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(DownloadError::Spawn)?;
        info!(binary = %self.profile.binary, url = %job.source_url, "Spawned yt-dlp");

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| DownloadError::Tool("failed to capture yt-dlp output".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| DownloadError::Tool("failed to capture yt-dlp errors".to_string()))?;
        let stderr_task = tokio::spawn(collect_lines(stderr));

        let mut stdout = BufReader::new(stdout);
        let mut raw = Vec::new();
        while let Some(line) = read_lossy_line(&mut stdout, &mut raw).await? {
            match parse_tick(&line) {
                Some(tick) => hook.report(&tick),
                None => debug!(line = %line, "yt-dlp output"),
            }
        }

        let status = child.wait().await?;
        let stderr_lines = stderr_task.await.unwrap_or_default();
        if status.success() {
            return Ok(());
        }
        Err(match failure_text(&stderr_lines) {
            Some(text) => DownloadError::Tool(text),
            None => DownloadError::Exited(status),
        })
    }
}

/// Reads one line, replacing invalid UTF-8 instead of failing on it.
async fn read_lossy_line<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    raw: &mut Vec<u8>,
) -> std::io::Result<Option<String>> {
    raw.clear();
    if reader.read_until(b'\n', raw).await? == 0 {
        return Ok(None);
    }
    let line = String::from_utf8_lossy(raw);
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_owned()))
}

async fn collect_lines<R: AsyncRead + Unpin>(reader: R) -> Vec<String> {
    let mut out = Vec::new();
    let mut reader = BufReader::new(reader);
    let mut raw = Vec::new();
    loop {
        match read_lossy_line(&mut reader, &mut raw).await {
            Ok(Some(line)) => {
                debug!(line = %line, "yt-dlp stderr");
                out.push(line);
            }
            Ok(None) => break,
            Err(err) => {
                debug!(error = %err, "Stopped reading yt-dlp stderr");
                break;
            }
        }
    }
    out
}

/// Error text from yt-dlp's stderr: its `ERROR:` lines, or the last non-empty line.
pub fn failure_text(lines: &[String]) -> Option<String> {
    let errors: Vec<&str> = lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| l.starts_with("ERROR:"))
        .collect();
    if !errors.is_empty() {
        return Some(errors.join("\n"));
    }
    lines
        .iter()
        .map(|l| l.trim())
        .rev()
        .find(|l| !l.is_empty())
        .map(str::to_owned)
}
