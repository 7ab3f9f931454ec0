//! One run of the suggestion pipeline: fetch listens, pick a track,
//! canonicalize its link, announce it, remember it.

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use rand::Rng;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::listenbrainz::ListenBrainzClient;
use crate::targets::{MastodonTarget, MicropubTarget, Target};
use crate::tracks::{
    format_announcement, IgnoredTracks, SongwhipConverter, SuggestedTrack, TrackSuggester,
};

pub struct App {
    config: AppConfig,
    listenbrainz: ListenBrainzClient,
    songwhip: SongwhipConverter,
    targets: Vec<Box<dyn Target>>,
    ignored_tracks: IgnoredTracks,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let listenbrainz = ListenBrainzClient::new(config.listenbrainz.clone());
        let songwhip = SongwhipConverter::new(config.songwhip_endpoint.clone());
        let ignored_tracks = IgnoredTracks::new(config.ignored_tracks_file.clone());

        let mut targets: Vec<Box<dyn Target>> = Vec::new();
        if let Some(ref micropub) = config.micropub {
            targets.push(Box::new(MicropubTarget::new(
                micropub.endpoint.clone(),
                micropub.access_token.clone(),
            )));
        }
        if let Some(ref mastodon) = config.mastodon {
            targets.push(Box::new(MastodonTarget::new(
                mastodon.base_url.clone(),
                mastodon.access_token.clone(),
            )));
        }

        Self {
            config,
            listenbrainz,
            songwhip,
            targets,
            ignored_tracks,
        }
    }

    /// Run the pipeline once. Fatal errors abort before any side effect: no
    /// post is sent and the ignored list is untouched. A week with nothing to
    /// suggest is a quiet success, not an error.
    pub async fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<()> {
        if self.config.dry_run {
            warn!("Dry run is set; the suggested track won't be posted");
        } else {
            warn!("Dry run is not set; the suggested track will be posted to all configured targets");
        }
        let target_names: Vec<&str> = self.targets.iter().map(|target| target.name()).collect();
        info!("Loaded targets: {target_names:?}");

        let now = Utc::now();
        let start = now - Duration::days(i64::from(self.config.lookback_days));

        let ignored = self.ignored_tracks.load().with_context(|| {
            format!(
                "failed to read ignored tracks from {}",
                self.ignored_tracks.path().display()
            )
        })?;
        info!("{} previously suggested tracks", ignored.len());

        let listens = self
            .listenbrainz
            .fetch_listens(start, now)
            .await
            .context("failed to fetch listens")?;
        info!("Found {} total listens", listens.len());

        let suggester = TrackSuggester::new(ignored);
        let Some(track) = suggester.suggest(&listens, rng)? else {
            info!("No track qualified for a suggestion this run; nothing to post");
            return Ok(());
        };
        info!(
            "Selected track: {} by {} ({} listens)",
            track.name, track.artist, track.listen_count
        );

        let track = SuggestedTrack {
            url: self.songwhip.convert(&track.url).await,
            ..track
        };

        for target in &self.targets {
            let message = format_announcement(&track, target.max_length())
                .with_context(|| format!("no template fits the {} budget", target.name()))?;
            info!("Message for {}:\n{message}", target.name());

            if !self.config.dry_run {
                target
                    .post(&message)
                    .await
                    .with_context(|| format!("failed to post to {}", target.name()))?;
            }
        }

        if !self.config.dry_run {
            self.ignored_tracks
                .record(&track.id)
                .context("failed to update the ignored tracks file")?;
        }

        Ok(())
    }
}
