mod file_config;

pub use file_config::{
    FileConfig, ListenBrainzConfig, MastodonConfig, MicropubConfig, SongwhipConfig,
};

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};

pub const DEFAULT_LISTENBRAINZ_URL: &str = "https://api.listenbrainz.org";
pub const DEFAULT_SONGWHIP_URL: &str = "https://songwhip.com/";
pub const DEFAULT_PAGE_SIZE: usize = 100;
pub const DEFAULT_PAGE_DELAY_SECS: u64 = 5;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub username: Option<String>,
    pub ignored_tracks_file: Option<PathBuf>,
    pub lookback_days: u32,
    pub dry_run: bool,
}

/// Settings for the ListenBrainz listens endpoint.
#[derive(Debug, Clone)]
pub struct ListenBrainzSettings {
    pub base_url: String,
    pub username: String,
    /// Events per page; the upstream default and maximum is 100.
    pub page_size: usize,
    /// Pause between page requests, as a courtesy to upstream rate limits.
    pub page_delay: Duration,
}

#[derive(Debug, Clone)]
pub struct MicropubSettings {
    pub endpoint: String,
    pub access_token: String,
}

#[derive(Debug, Clone)]
pub struct MastodonSettings {
    pub base_url: String,
    pub access_token: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub ignored_tracks_file: PathBuf,
    pub lookback_days: u32,
    pub dry_run: bool,
    pub listenbrainz: ListenBrainzSettings,
    pub songwhip_endpoint: String,
    pub micropub: Option<MicropubSettings>,
    pub mastodon: Option<MastodonSettings>,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let username = file
            .username
            .or_else(|| cli.username.clone())
            .filter(|username| !username.trim().is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "a ListenBrainz username must be specified via --username, \
                     LISTENBRAINZ_USERNAME, or the config file"
                )
            })?;

        let ignored_tracks_file = file
            .ignored_tracks_file
            .map(PathBuf::from)
            .or_else(|| cli.ignored_tracks_file.clone())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "an ignored tracks file must be specified via --ignored-tracks-file, \
                     IGNORED_TRACKS_FILE, or the config file"
                )
            })?;

        let lookback_days = file.lookback_days.unwrap_or(cli.lookback_days);
        if lookback_days == 0 {
            bail!("lookback_days must be at least 1");
        }

        let dry_run = file.dry_run.unwrap_or(cli.dry_run);

        let lb_file = file.listenbrainz.unwrap_or_default();
        let page_size = lb_file.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            bail!("listenbrainz.page_size must be at least 1");
        }
        let listenbrainz = ListenBrainzSettings {
            base_url: lb_file
                .base_url
                .unwrap_or_else(|| DEFAULT_LISTENBRAINZ_URL.to_string()),
            username,
            page_size,
            page_delay: Duration::from_secs(
                lb_file.page_delay_secs.unwrap_or(DEFAULT_PAGE_DELAY_SECS),
            ),
        };

        let songwhip_endpoint = file
            .songwhip
            .and_then(|songwhip| songwhip.endpoint)
            .unwrap_or_else(|| DEFAULT_SONGWHIP_URL.to_string());

        let micropub = file.micropub.map(|micropub| MicropubSettings {
            endpoint: micropub.endpoint,
            access_token: micropub.access_token,
        });

        let mastodon = file.mastodon.map(|mastodon| MastodonSettings {
            base_url: mastodon.base_url,
            access_token: mastodon.access_token,
        });

        if micropub.is_none() && mastodon.is_none() && !dry_run {
            bail!("cannot run without any targets to post to; configure one or use dry-run");
        }

        Ok(Self {
            ignored_tracks_file,
            lookback_days,
            dry_run,
            listenbrainz,
            songwhip_endpoint,
            micropub,
            mastodon,
        })
    }
}
