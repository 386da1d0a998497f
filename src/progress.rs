//! Progress reporting: yt-dlp progress lines in, percent events out.

use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::model::WorkerEvent;

/// Prefix written by the progress template on every tick
pub const PROGRESS_PREFIX: &str = "SCDL_PROGRESS|";

/// yt-dlp `--progress-template` producing lines `parse_tick` understands.
pub fn progress_template() -> String {
    format!(
        "download:{PROGRESS_PREFIX}%(progress.status)s|%(progress.downloaded_bytes)s|%(progress.total_bytes)s|%(progress.total_bytes_estimate)s"
    )
}

/// Status tag of a progress hook invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickStatus {
    Downloading,
    Finished,
    Other(String),
}

impl From<&str> for TickStatus {
    fn from(raw: &str) -> Self {
        match raw.trim() {
            "downloading" => TickStatus::Downloading,
            "finished" => TickStatus::Finished,
            other => TickStatus::Other(other.to_string()),
        }
    }
}

/// One invocation of the download progress hook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressTick {
    pub status: TickStatus,
    pub downloaded_bytes: Option<u64>,
    pub total_bytes: Option<u64>,
    pub total_bytes_estimate: Option<u64>,
}

impl ProgressTick {
    pub fn downloading(downloaded: u64, total: Option<u64>) -> Self {
        Self {
            status: TickStatus::Downloading,
            downloaded_bytes: Some(downloaded),
            total_bytes: total,
            total_bytes_estimate: None,
        }
    }

    pub fn finished() -> Self {
        Self {
            status: TickStatus::Finished,
            downloaded_bytes: None,
            total_bytes: None,
            total_bytes_estimate: None,
        }
    }

    /// Percent this tick should surface, if any.
    ///
    /// `downloading` needs both a byte count and a non-zero total (exact size
    /// first, estimate second); `finished` is always 100.
    pub fn percent(&self) -> Option<u8> {
        match self.status {
            TickStatus::Downloading => {
                let done = self.downloaded_bytes?;
                let total = self
                    .total_bytes
                    .filter(|t| *t > 0)
                    .or(self.total_bytes_estimate.filter(|t| *t > 0))?;
                let pct = (done as u128 * 100) / total as u128;
                Some(pct.min(100) as u8)
            }
            TickStatus::Finished => Some(100),
            TickStatus::Other(_) => None,
        }
    }
}

fn parse_bytes_field(raw: Option<&str>) -> Option<u64> {
    let raw = raw?.trim();
    // Estimates are printed as floats
    raw.parse::<u64>()
        .ok()
        .or_else(|| raw.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0).map(|v| v as u64))
}

/// Parses a line written by [`progress_template`]; other lines give `None`.
pub fn parse_tick(line: &str) -> Option<ProgressTick> {
    let rest = line.trim().strip_prefix(PROGRESS_PREFIX)?;
    let mut parts = rest.split('|');
    let status = TickStatus::from(parts.next()?);
    let tick = ProgressTick {
        status,
        downloaded_bytes: parse_bytes_field(parts.next()),
        total_bytes: parse_bytes_field(parts.next()),
        total_bytes_estimate: parse_bytes_field(parts.next()),
    };
    Some(tick)
}

/// Callback handed to the extractor; turns ticks into `Progress` events.
///
/// Never blocks: events go onto an unbounded channel.
#[derive(Debug, Clone)]
pub struct ProgressHook {
    tx: UnboundedSender<WorkerEvent>,
}

impl ProgressHook {
    pub fn new(tx: UnboundedSender<WorkerEvent>) -> Self {
        Self { tx }
    }

    pub fn report(&self, tick: &ProgressTick) {
        match tick.percent() {
            Some(pct) => {
                if self.tx.send(WorkerEvent::Progress(pct)).is_err() {
                    debug!(percent = pct, "Progress dropped; receiver is gone");
                }
            }
            None => debug!(?tick, "Progress tick without percent"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    #[test]
    fn test_percent_floors() {
        assert_eq!(ProgressTick::downloading(10, Some(100)).percent(), Some(10));
        assert_eq!(ProgressTick::downloading(555, Some(1000)).percent(), Some(55));
        assert_eq!(ProgressTick::downloading(999, Some(1000)).percent(), Some(99));
    }

    #[test]
    fn test_percent_uses_estimate_when_total_missing() {
        let tick = ProgressTick {
            status: TickStatus::Downloading,
            downloaded_bytes: Some(50),
            total_bytes: None,
            total_bytes_estimate: Some(200),
        };
        assert_eq!(tick.percent(), Some(25));
    }

    #[test]
    fn test_percent_unknown_total_is_silent() {
        assert_eq!(ProgressTick::downloading(50, None).percent(), None);
        assert_eq!(ProgressTick::downloading(50, Some(0)).percent(), None);
    }

    #[test]
    fn test_percent_clamped_when_estimate_low() {
        let tick = ProgressTick {
            status: TickStatus::Downloading,
            downloaded_bytes: Some(300),
            total_bytes: None,
            total_bytes_estimate: Some(200),
        };
        assert_eq!(tick.percent(), Some(100));
    }

    #[test]
    fn test_finished_is_always_100() {
        assert_eq!(ProgressTick::finished().percent(), Some(100));
    }

    #[test]
    fn test_parse_tick() {
        let tick = parse_tick("SCDL_PROGRESS|downloading|1024|4096|NA").unwrap();
        assert_eq!(tick.status, TickStatus::Downloading);
        assert_eq!(tick.downloaded_bytes, Some(1024));
        assert_eq!(tick.total_bytes, Some(4096));
        assert_eq!(tick.total_bytes_estimate, None);
        assert_eq!(tick.percent(), Some(25));
    }

    #[test]
    fn test_parse_tick_float_estimate() {
        let tick = parse_tick("SCDL_PROGRESS|downloading|100|NA|400.5").unwrap();
        assert_eq!(tick.total_bytes_estimate, Some(400));
    }

    #[test]
    fn test_parse_tick_ignores_other_lines() {
        assert_eq!(parse_tick("[soundcloud] Extracting URL"), None);
        assert_eq!(parse_tick(""), None);
    }

    #[test]
    fn test_parse_tick_unknown_status() {
        let tick = parse_tick("SCDL_PROGRESS|error|NA|NA|NA").unwrap();
        assert_eq!(tick.status, TickStatus::Other("error".to_string()));
        assert_eq!(tick.percent(), None);
    }

    #[test]
    fn test_template_matches_parser_prefix() {
        assert!(progress_template().starts_with("download:SCDL_PROGRESS|"));
    }

    #[test]
    fn test_hook_forwards_only_known_percent() {
        let (tx, mut rx) = unbounded_channel();
        let hook = ProgressHook::new(tx);
        hook.report(&ProgressTick::downloading(5, None));
        hook.report(&ProgressTick::downloading(5, Some(10)));
        hook.report(&ProgressTick::finished());
        drop(hook);

        assert_eq!(rx.try_recv().unwrap(), WorkerEvent::Progress(50));
        assert_eq!(rx.try_recv().unwrap(), WorkerEvent::Progress(100));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_hook_keeps_reporting_after_receiver_dropped() {
        let (tx, rx) = unbounded_channel();
        let hook = ProgressHook::new(tx);
        drop(rx);
        hook.report(&ProgressTick::downloading(5, Some(10)));
        hook.report(&ProgressTick::finished());
    }
}
