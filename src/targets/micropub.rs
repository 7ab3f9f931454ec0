use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

use super::{Target, TargetError};

/// Posts announcements to a Micropub endpoint as a plain `h=entry` note.
///
/// Micropub sites are assumed reliable, so failures here propagate and fail
/// the run.
pub struct MicropubTarget {
    client: Client,
    endpoint: String,
    access_token: String,
}

impl MicropubTarget {
    pub fn new(endpoint: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            access_token: access_token.into(),
        }
    }
}

#[async_trait]
impl Target for MicropubTarget {
    fn name(&self) -> &'static str {
        "Micropub"
    }

    fn max_length(&self) -> usize {
        500
    }

    async fn post(&self, message: &str) -> Result<(), TargetError> {
        let params = [
            ("h", "entry"),
            ("content", message),
            ("access_token", self.access_token.as_str()),
        ];

        let response = self
            .client
            .post(&self.endpoint)
            .form(&params)
            .send()
            .await
            .map_err(|e| TargetError::Http {
                target: self.name(),
                source: e,
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(TargetError::Rejected {
                target: self.name(),
                status: status.as_u16(),
                message: body,
            });
        }

        // Some Micropub servers report failures in a 2xx JSON body.
        if let Ok(fields) = serde_json::from_str::<HashMap<String, String>>(&body) {
            if let Some(error) = fields.get("error").filter(|error| !error.is_empty()) {
                let description = fields
                    .get("error_description")
                    .map(String::as_str)
                    .unwrap_or_default();
                return Err(TargetError::Rejected {
                    target: self.name(),
                    status: status.as_u16(),
                    message: format!("{error} {description}").trim().to_string(),
                });
            }
        }

        info!("Successfully posted to Micropub");
        Ok(())
    }
}
