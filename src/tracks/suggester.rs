use std::collections::{HashMap, HashSet};

use rand::prelude::IndexedRandom;
use rand::Rng;
use thiserror::Error;
use tracing::debug;

use crate::listenbrainz::Listen;

/// The track chosen for this run, carrying everything a downstream formatter
/// needs: display name, artist, a shareable URL, and the play count that got
/// it selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestedTrack {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub url: String,
    pub listen_count: usize,
}

#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("two listens share timestamp {timestamp}; refusing to pick from a corrupted history")]
    DuplicateTimestamp { timestamp: i64 },
}

/// Picks one track out of a listen history.
///
/// Aggregates listens per track, keeps only the top decile by play count, and
/// chooses uniformly at random among those. Always picking the single
/// most-played track would make the suggestion predictable; picking fully at
/// random would ignore what the listener actually favors. The top-decile
/// cutoff sits between the two.
pub struct TrackSuggester {
    ignored: HashSet<String>,
}

struct Eligible<'a> {
    id: &'a str,
    name: &'a str,
    artist: &'a str,
    listened_at: i64,
}

struct Aggregate<'a> {
    id: &'a str,
    name: &'a str,
    artist: &'a str,
    count: usize,
}

impl TrackSuggester {
    pub fn new(ignored: impl IntoIterator<Item = String>) -> Self {
        Self {
            ignored: ignored.into_iter().collect(),
        }
    }

    /// Produce at most one suggestion from `listens`.
    ///
    /// `Ok(None)` is a valid outcome: it means no track qualified, either
    /// because too few distinct tracks were eligible or because everything
    /// was filtered out. The caller decides what to do with an empty week.
    pub fn suggest<R: Rng + ?Sized>(
        &self,
        listens: &[Listen],
        rng: &mut R,
    ) -> Result<Option<SuggestedTrack>, SuggestError> {
        let eligible: Vec<Eligible<'_>> = listens
            .iter()
            .filter_map(|listen| self.eligibility(listen))
            .collect();

        let mut seen = HashSet::with_capacity(eligible.len());
        for listen in &eligible {
            if !seen.insert(listen.listened_at) {
                return Err(SuggestError::DuplicateTimestamp {
                    timestamp: listen.listened_at,
                });
            }
        }

        // Group by track id; the first listen encountered represents the
        // whole group.
        let mut aggregates: Vec<Aggregate<'_>> = Vec::new();
        let mut index_by_id: HashMap<&str, usize> = HashMap::new();
        for listen in &eligible {
            match index_by_id.get(listen.id) {
                Some(&index) => aggregates[index].count += 1,
                None => {
                    index_by_id.insert(listen.id, aggregates.len());
                    aggregates.push(Aggregate {
                        id: listen.id,
                        name: listen.name,
                        artist: listen.artist,
                        count: 1,
                    });
                }
            }
        }

        debug!(
            "{} distinct eligible tracks from {} listens",
            aggregates.len(),
            listens.len()
        );

        // Stable sort: tracks with equal counts keep encounter order.
        aggregates.sort_by(|a, b| b.count.cmp(&a.count));
        let candidates = &aggregates[..aggregates.len() / 10];

        if candidates.is_empty() {
            debug!("Fewer than ten distinct eligible tracks; nothing to suggest");
            return Ok(None);
        }

        for candidate in candidates {
            debug!("Possible choice: {} - {}", candidate.count, candidate.name);
        }

        Ok(candidates.choose(rng).map(|chosen| SuggestedTrack {
            id: chosen.id.to_string(),
            name: chosen.name.to_string(),
            artist: chosen.artist.to_string(),
            url: chosen.id.to_string(),
            listen_count: chosen.count,
        }))
    }

    fn eligibility<'a>(&self, listen: &'a Listen) -> Option<Eligible<'a>> {
        let id = listen.track_id();
        let artist = listen.artist_name();
        let name = listen.track_name();

        let (Some(id), Some(artist), Some(name)) = (id, artist, name) else {
            let reason = if id.is_none() {
                "it has no track identifier"
            } else if artist.is_none() {
                "it has no artist name"
            } else {
                "it has no track name"
            };
            debug!(
                "Skipping a listen of {:?} because {}",
                listen.track_name().unwrap_or("an unknown track"),
                reason
            );
            return None;
        };

        if self.ignored.contains(id) {
            debug!("Skipping a listen of {name:?} because it was suggested before");
            return None;
        }

        Some(Eligible {
            id,
            name,
            artist,
            listened_at: listen.listened_at,
        })
    }
}
