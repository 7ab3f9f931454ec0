//! Publishing targets an announcement can be posted to.

mod mastodon;
mod micropub;

pub use mastodon::MastodonTarget;
pub use micropub::MicropubTarget;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TargetError {
    #[error("request to {target} failed: {source}")]
    Http {
        target: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{target} rejected the post (status {status}): {message}")]
    Rejected {
        target: &'static str,
        status: u16,
        message: String,
    },
}

/// A destination that announcement messages can be published to.
///
/// Each target advertises the longest message it accepts; the formatter uses
/// that budget to pick a template before `post` is called.
#[async_trait]
pub trait Target: Send + Sync {
    fn name(&self) -> &'static str;

    fn max_length(&self) -> usize;

    async fn post(&self, message: &str) -> Result<(), TargetError>;
}
