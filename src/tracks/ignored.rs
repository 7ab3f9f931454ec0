use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

/// Line-delimited file of track ids that were suggested before and must never
/// be suggested again. A missing file reads as an empty list.
#[derive(Debug, Clone)]
pub struct IgnoredTracks {
    path: PathBuf,
}

impl IgnoredTracks {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> io::Result<Vec<String>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }

    /// Append `id` and rewrite the file, deduplicated, preserving order.
    pub fn record(&self, id: &str) -> io::Result<()> {
        info!("Adding {id} to the ignored tracks in {}", self.path.display());

        let mut ids = self.load()?;
        ids.push(id.to_string());

        let mut seen = HashSet::new();
        ids.retain(|id| seen.insert(id.clone()));

        std::fs::write(&self.path, ids.join("\n"))
    }
}
