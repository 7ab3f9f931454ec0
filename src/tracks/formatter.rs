use thiserror::Error;

use super::suggester::SuggestedTrack;

const POST_HEADER: &str = "This week's song is:";

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("no announcement template fits in {max_length} characters")]
    BudgetTooSmall { max_length: usize },
}

/// Turn `track` into a postable announcement no longer than `max_length`.
///
/// Templates are tried longest first, so a track with a short title gets the
/// full "name by artist" treatment while one with an unwieldy title degrades
/// down to, at worst, a bare link.
pub fn format_announcement(
    track: &SuggestedTrack,
    max_length: usize,
) -> Result<String, FormatError> {
    let SuggestedTrack { name, artist, url, .. } = track;

    let candidates = [
        format!("{POST_HEADER}\n\n{name} by {artist}\n\n{url}\n\n#MusicMonday"),
        format!("{POST_HEADER}\n\n{name}\n\n{url}\n\n#MusicMonday"),
        format!("{POST_HEADER}\n\n{url}\n\n#MusicMonday"),
        url.clone(),
    ];

    candidates
        .into_iter()
        .find(|message| message.chars().count() <= max_length)
        .ok_or(FormatError::BudgetTooSmall { max_length })
}
