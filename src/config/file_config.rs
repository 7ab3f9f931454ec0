use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// TOML configuration file. Every field is optional; values present here
/// override CLI arguments during resolution.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub username: Option<String>,
    pub ignored_tracks_file: Option<String>,
    pub lookback_days: Option<u32>,
    pub dry_run: Option<bool>,

    pub listenbrainz: Option<ListenBrainzConfig>,
    pub songwhip: Option<SongwhipConfig>,
    pub micropub: Option<MicropubConfig>,
    pub mastodon: Option<MastodonConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListenBrainzConfig {
    pub base_url: Option<String>,
    pub page_size: Option<usize>,
    pub page_delay_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SongwhipConfig {
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MicropubConfig {
    pub endpoint: String,
    pub access_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MastodonConfig {
    pub base_url: String,
    pub access_token: String,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("failed to parse config file {:?}", path))
    }
}
