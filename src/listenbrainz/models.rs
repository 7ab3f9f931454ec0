use serde::{Deserialize, Serialize};

/// Top-level response of the ListenBrainz `GET /1/user/{name}/listens` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListensResponse {
    pub payload: ListensPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListensPayload {
    pub listens: Vec<Listen>,
}

/// One recorded play. `listened_at` is epoch seconds and is expected to be
/// unique per event; everything else is display metadata the upstream service
/// may omit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listen {
    pub listened_at: i64,
    #[serde(default)]
    pub track_metadata: Option<TrackMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMetadata {
    #[serde(default)]
    pub artist_name: Option<String>,
    #[serde(default)]
    pub release_name: Option<String>,
    #[serde(default)]
    pub track_name: Option<String>,
    #[serde(default)]
    pub additional_info: Option<AdditionalInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalInfo {
    #[serde(default)]
    pub spotify_id: Option<String>,
}

impl Listen {
    /// Stable external identifier of the track, if present and non-blank.
    pub fn track_id(&self) -> Option<&str> {
        non_blank(
            self.track_metadata
                .as_ref()?
                .additional_info
                .as_ref()?
                .spotify_id
                .as_deref()?,
        )
    }

    pub fn artist_name(&self) -> Option<&str> {
        non_blank(self.track_metadata.as_ref()?.artist_name.as_deref()?)
    }

    pub fn track_name(&self) -> Option<&str> {
        non_blank(self.track_metadata.as_ref()?.track_name.as_deref()?)
    }
}

fn non_blank(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
