//! Configuration management for yt-playlist-export

use crate::error::ConfigError;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use ytexport_extract::{BrowserSpec, YtDlpOptions};

pub const APP_DIR: &str = "yt-playlist-export";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub paths: PathsConfig,
    pub auth: AuthConfig,
    pub newpipe: NewPipeConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Path to yt-dlp binary (auto-detected if not set)
    pub yt_dlp: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Netscape cookie file
    pub cookies: Option<PathBuf>,
    /// cookies-from-browser spec, e.g. "brave:Default"
    pub browser_cookies: String,
    /// Skip the youtubetab authentication check
    pub skip_authcheck: bool,
    /// Seconds to sleep between extractor requests
    pub sleep_requests: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPipeConfig {
    pub app_version: String,
    pub app_version_int: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print JSON outputs
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig { yt_dlp: None },
            auth: AuthConfig {
                cookies: None,
                browser_cookies: "firefox".to_string(),
                skip_authcheck: false,
                sleep_requests: None,
            },
            newpipe: NewPipeConfig {
                app_version: "0.19.8".to_string(),
                app_version_int: 953,
            },
            output: OutputConfig { pretty: false },
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(default_config) = Self::default_file() {
            if default_config.exists() {
                figment = figment.merge(Toml::file(&default_config));
            }
        }

        if let Some(path) = config_file {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("YTEXPORT_").split("__"));

        figment.extract().map_err(|e| ConfigError::LoadError(e.to_string()))
    }

    /// `<config_dir>/yt-playlist-export/config.toml`
    pub fn default_file() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get yt-dlp path, auto-detecting if not configured
    pub fn yt_dlp_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref path) = self.paths.yt_dlp {
            Ok(path.clone())
        } else {
            which::which("yt-dlp")
                .map_err(|_| ConfigError::InvalidValue("yt-dlp not found in PATH".to_string()))
        }
    }

    /// Extractor options for playlist and video lookups.
    ///
    /// Browser cookies are always sent unless a cookie file is configured.
    pub fn extractor_options(&self, verbose: bool) -> Result<YtDlpOptions, ConfigError> {
        let browser_cookies = if self.auth.cookies.is_none() {
            Some(self.browser_spec(&self.auth.browser_cookies)?)
        } else {
            None
        };
        Ok(YtDlpOptions {
            cookies_file: self.auth.cookies.clone(),
            browser_cookies,
            skip_authcheck: self.auth.skip_authcheck,
            sleep_requests: self.auth.sleep_requests,
            verbose,
        })
    }

    /// Extractor options for the subscriptions feed, where browser cookies
    /// are only sent when explicitly requested.
    pub fn subscription_options(
        &self,
        browser_cookies: Option<&str>,
        verbose: bool,
    ) -> Result<YtDlpOptions, ConfigError> {
        let browser_cookies = match (&self.auth.cookies, browser_cookies) {
            (None, Some(spec)) => Some(self.browser_spec(spec)?),
            _ => None,
        };
        Ok(YtDlpOptions {
            cookies_file: self.auth.cookies.clone(),
            browser_cookies,
            skip_authcheck: false,
            sleep_requests: None,
            verbose,
        })
    }

    fn browser_spec(&self, spec: &str) -> Result<BrowserSpec, ConfigError> {
        BrowserSpec::parse(spec).map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }
}
