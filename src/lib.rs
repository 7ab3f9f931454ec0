//! Weekly track suggestions from ListenBrainz listening history.
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod app;
pub mod config;
pub mod listenbrainz;
pub mod targets;
pub mod tracks;

// Re-export commonly used types for convenience
pub use app::App;
pub use config::AppConfig;
pub use tracks::SuggestedTrack;
