//! Track selection and everything that happens to a track once selected:
//! exclusion-list persistence, link canonicalization, and message formatting.

mod formatter;
mod ignored;
mod songwhip;
mod suggester;

pub use formatter::{format_announcement, FormatError};
pub use ignored::IgnoredTracks;
pub use songwhip::SongwhipConverter;
pub use suggester::{SuggestError, SuggestedTrack, TrackSuggester};
