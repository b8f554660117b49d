//! `--cookies-from-browser` spec parsing
//!
//! Grammar: `BROWSER[+KEYRING][:PROFILE][::CONTAINER]`.

use crate::ExtractError;
use std::fmt;

pub const SUPPORTED_BROWSERS: &[&str] = &[
    "brave", "chrome", "chromium", "edge", "firefox", "opera", "safari", "vivaldi", "whale",
];

pub const SUPPORTED_KEYRINGS: &[&str] =
    &["BASICTEXT", "GNOMEKEYRING", "KWALLET", "KWALLET5", "KWALLET6"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserSpec {
    pub browser: String,
    pub keyring: Option<String>,
    pub profile: Option<String>,
    pub container: Option<String>,
}

impl BrowserSpec {
    pub fn parse(spec: &str) -> Result<Self, ExtractError> {
        let invalid = || ExtractError::InvalidCookieSpec(spec.to_string());
        let spec_trimmed = spec.trim();

        // `::` always introduces the container; a single `:` the profile.
        let (head, container) = match spec_trimmed.split_once("::") {
            Some((head, container)) => (head, Some(non_empty(container).ok_or_else(invalid)?)),
            None => (spec_trimmed, None),
        };
        let (head, profile) = match head.split_once(':') {
            Some((head, profile)) => (head, Some(non_empty(profile).ok_or_else(invalid)?)),
            None => (head, None),
        };
        let (name, keyring) = match head.split_once('+') {
            Some((name, keyring)) => (name, Some(non_empty(keyring).ok_or_else(invalid)?)),
            None => (head, None),
        };

        let browser = non_empty(name).ok_or_else(invalid)?.to_lowercase();
        if !SUPPORTED_BROWSERS.contains(&browser.as_str()) {
            return Err(ExtractError::InvalidCookieSpec(format!(
                "unsupported browser \"{}\". Supported: {}",
                browser,
                SUPPORTED_BROWSERS.join(", ")
            )));
        }

        let keyring = match keyring {
            Some(k) => {
                let k = k.to_uppercase();
                if !SUPPORTED_KEYRINGS.contains(&k.as_str()) {
                    return Err(ExtractError::InvalidCookieSpec(format!(
                        "unsupported keyring \"{}\". Supported: {}",
                        k,
                        SUPPORTED_KEYRINGS.join(", ")
                    )));
                }
                Some(k)
            }
            None => None,
        };

        Ok(Self {
            browser,
            keyring,
            profile: profile.map(String::from),
            container: container.map(String::from),
        })
    }
}

/// Renders back into the argument form yt-dlp accepts.
impl fmt::Display for BrowserSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.browser)?;
        if let Some(ref keyring) = self.keyring {
            write!(f, "+{}", keyring)?;
        }
        if let Some(ref profile) = self.profile {
            write!(f, ":{}", profile)?;
        }
        if let Some(ref container) = self.container {
            write!(f, "::{}", container)?;
        }
        Ok(())
    }
}

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}
