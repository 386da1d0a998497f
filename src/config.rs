//! Fixed download profile and application defaults

use std::path::{Path, PathBuf};

use tracing::info;

/// How yt-dlp is asked to fetch and convert a track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadProfile {
    /// Executable looked up on PATH
    pub binary: String,
    /// yt-dlp format selector
    pub format: String,
    /// Codec the post-processor transcodes to
    pub audio_format: String,
    /// Target bitrate for the post-processor
    pub audio_quality: String,
    /// File name template, joined onto the destination folder
    pub output_template: String,
    /// Download only the referenced item, never a whole playlist
    pub single_item: bool,
}

impl Default for DownloadProfile {
    fn default() -> Self {
        let binary = if cfg!(target_os = "windows") { "yt-dlp.exe" } else { "yt-dlp" };
        Self {
            binary: binary.to_string(),
            format: "bestaudio/best".to_string(),
            audio_format: "mp3".to_string(),
            audio_quality: "192K".to_string(),
            output_template: "%(title)s.%(ext)s".to_string(),
            single_item: true,
        }
    }
}

impl DownloadProfile {
    /// Full output path template for a destination folder.
    pub fn output_path(&self, folder: &Path) -> String {
        folder.join(&self.output_template).to_string_lossy().into_owned()
    }
}

/// Window and session defaults
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub window_title: String,
    pub window_size: [f32; 2],
    pub download_dir: PathBuf,
    pub success_message: String,
    pub profile: DownloadProfile,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_title: "🎵 SoundCloud Downloader".to_string(),
            window_size: [400.0, 250.0],
            download_dir: Self::default_download_dir(),
            success_message: "✅ Download complete!".to_string(),
            profile: DownloadProfile::default(),
        }
    }
}

impl AppConfig {
    /// `<cwd>/downloads`, or a relative `downloads` if the cwd is unreadable.
    pub fn default_download_dir() -> PathBuf {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join("downloads")
    }

    /// Creates the download directory if it is missing.
    pub fn ensure_download_dir(&self) -> std::io::Result<()> {
        if !self.download_dir.is_dir() {
            std::fs::create_dir_all(&self.download_dir)?;
            info!(path = %self.download_dir.display(), "Created download folder");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile() {
        let profile = DownloadProfile::default();
        assert_eq!(profile.format, "bestaudio/best");
        assert_eq!(profile.audio_format, "mp3");
        assert_eq!(profile.audio_quality, "192K");
        assert!(profile.single_item);
    }

    #[test]
    fn test_output_path_joins_template() {
        let profile = DownloadProfile::default();
        let path = profile.output_path(Path::new("/tmp/downloads"));
        assert_eq!(
            PathBuf::from(path),
            Path::new("/tmp/downloads").join("%(title)s.%(ext)s")
        );
    }

    #[test]
    fn test_default_download_dir_ends_with_downloads() {
        assert!(AppConfig::default_download_dir().ends_with("downloads"));
    }

    #[test]
    fn test_ensure_download_dir_creates_folder() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            download_dir: temp_dir.path().join("nested").join("downloads"),
            ..AppConfig::default()
        };
        config.ensure_download_dir().unwrap();
        assert!(config.download_dir.is_dir());
        // Second call is a no-op
        config.ensure_download_dir().unwrap();
    }
}
