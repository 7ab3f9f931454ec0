use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Serialize)]
struct SongwhipRequest<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct SongwhipResponse {
    url: String,
}

/// Rewrites a track identifier into a publicly shareable link via a
/// Songwhip-style lookup service.
pub struct SongwhipConverter {
    client: Client,
    endpoint: String,
}

impl SongwhipConverter {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Convert `url` into a canonical link. Conversion is best-effort: any
    /// failure logs a warning and falls back to the original URL.
    pub async fn convert(&self, url: &str) -> String {
        info!("Converting {url:?} into a shareable link");
        match self.request(url).await {
            Ok(converted) => {
                info!("Received shareable link: {converted}");
                converted
            }
            Err(e) => {
                warn!("Failed to convert {url:?}; falling back to the original: {e}");
                url.to_string()
            }
        }
    }

    async fn request(&self, url: &str) -> Result<String, reqwest::Error> {
        let response: SongwhipResponse = self
            .client
            .post(&self.endpoint)
            .json(&SongwhipRequest { url })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.url)
    }
}
