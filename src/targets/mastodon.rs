use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, warn};

use super::{Target, TargetError};

/// Posts announcements as Mastodon statuses.
///
/// The status API is treated as an unreliable downstream: a failed post is
/// logged and swallowed so the rest of the run, including the other targets,
/// is unaffected.
pub struct MastodonTarget {
    client: Client,
    base_url: String,
    access_token: String,
}

impl MastodonTarget {
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            access_token: access_token.into(),
        }
    }

    async fn request(&self, message: &str) -> Result<(), reqwest::Error> {
        self.client
            .post(format!(
                "{}/api/v1/statuses",
                self.base_url.trim_end_matches('/')
            ))
            .bearer_auth(&self.access_token)
            .form(&[("status", message)])
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[async_trait]
impl Target for MastodonTarget {
    fn name(&self) -> &'static str {
        "Mastodon"
    }

    fn max_length(&self) -> usize {
        500
    }

    async fn post(&self, message: &str) -> Result<(), TargetError> {
        match self.request(message).await {
            Ok(()) => info!("Successfully posted to Mastodon"),
            Err(e) => warn!("Failed to post to Mastodon: {e}"),
        }
        Ok(())
    }
}
