//! NewPipe subscriptions export

use crate::error::Result;
use crate::output::write_json;
use crate::record::SubscriptionEntry;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_OUTPUT: &str = "newpipe-subscriptions.json";

/// App identification NewPipe checks on import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppVersion {
    pub name: String,
    pub code: u32,
}

#[derive(Debug, Serialize)]
struct SubscriptionsDocument<'a> {
    app_version: &'a str,
    app_version_int: u32,
    subscriptions: Vec<Subscription<'a>>,
}

#[derive(Debug, Serialize)]
struct Subscription<'a> {
    service_id: u32,
    url: &'a str,
    name: &'a str,
}

/// Entries are written in feed order without deduplication.
pub fn export_subscriptions(
    subs: &[SubscriptionEntry],
    out_path: Option<&Path>,
    version: &AppVersion,
    pretty: bool,
) -> Result<PathBuf> {
    let path = out_path.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
    let doc = SubscriptionsDocument {
        app_version: &version.name,
        app_version_int: version.code,
        subscriptions: subs
            .iter()
            .map(|s| Subscription {
                service_id: 0,
                url: &s.channel_url,
                name: &s.display_name,
            })
            .collect(),
    };
    write_json(&path, &doc, pretty)?;
    info!("Wrote NewPipe subscriptions: {} ({} channels)", path.display(), subs.len());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subs.json");
        let entry = SubscriptionEntry {
            channel_url: "https://www.youtube.com/channel/UC1".to_string(),
            display_name: "First".to_string(),
        };
        let version = AppVersion {
            name: "0.19.8".to_string(),
            code: 953,
        };

        export_subscriptions(&[entry.clone(), entry], Some(&path), &version, false).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "{\"app_version\":\"0.19.8\",\"app_version_int\":953,\"subscriptions\":[\
             {\"service_id\":0,\"url\":\"https://www.youtube.com/channel/UC1\",\"name\":\"First\"},\
             {\"service_id\":0,\"url\":\"https://www.youtube.com/channel/UC1\",\"name\":\"First\"}]}"
        );
    }
}
