use std::collections::HashSet;

use chrono::{DateTime, Utc};
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info};

use super::models::{Listen, ListensResponse};
use crate::config::ListenBrainzSettings;

/// Errors that can occur while assembling a listen history.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid fetch window: start {start} is not before end {end}")]
    InvalidWindow { start: i64, end: i64 },

    #[error("listens request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("listens endpoint returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("two listens share timestamp {timestamp}; refusing a possibly corrupted history")]
    DuplicateTimestamp { timestamp: i64 },
}

/// Client for a ListenBrainz-compatible listens endpoint.
///
/// The upstream API only answers "at most `count` listens at or before
/// `max_ts`", newest first, so a window is assembled by walking a shrinking
/// `max_ts` cursor until a page comes back short.
pub struct ListenBrainzClient {
    client: Client,
    settings: ListenBrainzSettings,
}

impl ListenBrainzClient {
    pub fn new(settings: ListenBrainzSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    fn listens_endpoint(&self) -> String {
        format!(
            "{}/1/user/{}/listens",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.username
        )
    }

    /// Fetch every listen with a timestamp in `[start, end]`.
    ///
    /// Pages are requested strictly sequentially; each cursor depends on the
    /// previous page, and a fixed delay between requests keeps us polite
    /// towards the upstream rate limits. Transient upstream failures are not
    /// retried and surface to the caller.
    pub async fn fetch_listens(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Listen>, FetchError> {
        if end <= start {
            return Err(FetchError::InvalidWindow {
                start: start.timestamp(),
                end: end.timestamp(),
            });
        }

        info!("Fetching listens from {} to {}", start, end);

        let start_ts = start.timestamp();
        let page_size = self.settings.page_size;
        let mut cursor = end.timestamp();
        let mut listens: Vec<Listen> = Vec::new();

        loop {
            debug!(
                max_ts = cursor,
                count = page_size,
                "Requesting a page of listens"
            );

            let response = self
                .client
                .get(self.listens_endpoint())
                // The endpoint also accepts a "min_ts", but not both at once,
                // so events before the window start are filtered locally.
                .query(&[("max_ts", cursor.to_string()), ("count", page_size.to_string())])
                .header("Accept", "application/json")
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(FetchError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let page: ListensResponse = response.json().await?;
            let mut kept: Vec<Listen> = page
                .payload
                .listens
                .into_iter()
                .filter(|listen| listen.listened_at >= start_ts)
                .collect();

            let kept_count = kept.len();
            let next_cursor = kept.last().map(|listen| listen.listened_at - 1);
            debug!("Kept {kept_count} listens from this page");
            listens.append(&mut kept);

            if kept_count < page_size {
                info!("Loaded all {} listens in the window", listens.len());
                break;
            }

            match next_cursor {
                // Subtract one so the oldest listen of this page is never
                // requested again; the cursor shrinks on every iteration.
                Some(next) => {
                    cursor = next;
                    debug!("Waiting before requesting the next page");
                    tokio::time::sleep(self.settings.page_delay).await;
                }
                None => break,
            }
        }

        check_distinct_timestamps(&listens)?;
        Ok(listens)
    }
}

/// Identical timestamps make pagination cursors ambiguous and can silently
/// drop listens on subsequent pages, so they are a hard failure rather than
/// something to deduplicate away.
fn check_distinct_timestamps(listens: &[Listen]) -> Result<(), FetchError> {
    let mut seen = HashSet::with_capacity(listens.len());
    for listen in listens {
        if !seen.insert(listen.listened_at) {
            return Err(FetchError::DuplicateTimestamp {
                timestamp: listen.listened_at,
            });
        }
    }
    Ok(())
}
