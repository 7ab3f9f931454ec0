//! ListenBrainz integration: wire types for the listens endpoint and the
//! paginating client that assembles a complete listen history for a window.

mod client;
mod models;

pub use client::{FetchError, ListenBrainzClient};
pub use models::{AdditionalInfo, Listen, ListensPayload, ListensResponse, TrackMetadata};
