//! yt-dlp process bridge

use crate::cookies::BrowserSpec;
use crate::raw::RawRecord;
use crate::{ExtractError, MetadataSource};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::{debug, info};

pub const WATCH_URL: &str = "https://www.youtube.com/watch?v=";
pub const SUBSCRIPTIONS_FEED: &str = "https://www.youtube.com/feed/channels";

/// Authentication and pacing options handed to every yt-dlp call.
#[derive(Debug, Clone, Default)]
pub struct YtDlpOptions {
    /// Netscape cookie file; wins over `browser_cookies`
    pub cookies_file: Option<PathBuf>,
    pub browser_cookies: Option<BrowserSpec>,
    /// Pass `youtubetab:skip=authcheck`
    pub skip_authcheck: bool,
    /// Seconds to sleep between requests
    pub sleep_requests: Option<f64>,
    pub verbose: bool,
}

#[derive(Debug)]
pub struct YtDlp {
    yt_dlp_path: PathBuf,
    options: YtDlpOptions,
}

impl YtDlp {
    pub fn new(yt_dlp_path: PathBuf, options: YtDlpOptions) -> Self {
        Self {
            yt_dlp_path,
            options,
        }
    }

    fn build_args(&self, url: &str, single_video: bool) -> Vec<String> {
        let mut args = vec![
            "--dump-single-json".to_string(),
            "--flat-playlist".to_string(),
            "--skip-download".to_string(),
            "--no-warnings".to_string(),
        ];

        if single_video {
            args.push("--no-playlist".to_string());
        } else {
            args.push("--lazy-playlist".to_string());
        }

        if let Some(ref path) = self.options.cookies_file {
            args.push("--cookies".to_string());
            args.push(path.display().to_string());
        } else if let Some(ref spec) = self.options.browser_cookies {
            args.push("--cookies-from-browser".to_string());
            args.push(spec.to_string());
        }

        if self.options.skip_authcheck {
            args.push("--extractor-args".to_string());
            args.push("youtubetab:skip=authcheck".to_string());
        }

        if let Some(secs) = self.options.sleep_requests {
            args.push("--sleep-requests".to_string());
            args.push(secs.to_string());
        }

        args.push(if self.options.verbose { "--verbose" } else { "--quiet" }.to_string());
        args.push(url.to_string());
        args
    }

    async fn dump_json(&self, url: &str, single_video: bool) -> Result<RawRecord, ExtractError> {
        debug!("yt-dlp lookup: {}", url);

        let output = Command::new(&self.yt_dlp_path)
            .args(self.build_args(url, single_video))
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => ExtractError::YtDlpNotFound,
                _ => ExtractError::Io(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("yt-dlp stderr: {}", stderr);

            if stderr.contains("Video unavailable") || stderr.contains("Private video") {
                return Err(ExtractError::Unavailable(url.to_string()));
            }
            if stderr.contains("Sign in to confirm") || stderr.contains("login required") {
                return Err(ExtractError::SignInRequired(url.to_string()));
            }

            return Err(ExtractError::YtDlpFailed {
                code: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let trimmed = stdout.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Err(ExtractError::NoData(url.to_string()));
        }

        let value: serde_json::Value = serde_json::from_str(trimmed)?;
        Ok(RawRecord::new(value))
    }
}

#[async_trait]
impl MetadataSource for YtDlp {
    async fn playlist(&self, url: &str) -> Result<RawRecord, ExtractError> {
        info!("Fetching playlist: {}", url);
        self.dump_json(url, false).await
    }

    async fn video(&self, video_id: &str) -> Result<RawRecord, ExtractError> {
        let url = format!("{}{}", WATCH_URL, video_id);
        self.dump_json(&url, true).await
    }

    async fn subscriptions(&self) -> Result<RawRecord, ExtractError> {
        info!("Fetching subscriptions via {}", SUBSCRIPTIONS_FEED);
        self.dump_json(SUBSCRIPTIONS_FEED, false).await
    }
}
