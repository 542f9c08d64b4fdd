use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::models::{PlaylistItemRecord, PlaylistRecord};
use crate::toplist::Playlist;

impl From<&Playlist> for PlaylistRecord {
    fn from(playlist: &Playlist) -> Self {
        PlaylistRecord {
            group_id: playlist.group_id.clone(),
            name: playlist.name.clone(),
            score: playlist.score,
            is_current_top_list: true,
            items: playlist
                .tracks
                .iter()
                .map(|track| PlaylistItemRecord {
                    track_id: track.id.clone(),
                    number_of_plays: track.total_plays(),
                    number_of_unique_listeners: track.unique_listeners(),
                    score: track.score,
                })
                .collect(),
        }
    }
}

/// Destination for generated top lists.
///
/// Retiring and inserting are staged; nothing is visible to readers of the
/// store until `commit` succeeds.
#[cfg_attr(test, mockall::automock)]
pub trait PlaylistWriter {
    /// Mark every stored top list as no longer current
    fn retire_current(&mut self) -> Result<()>;

    fn insert(&mut self, record: &PlaylistRecord) -> Result<()>;

    /// Make the staged changes durable in one step
    fn commit(&mut self) -> Result<()>;
}

/// Replace the current top lists with `playlists`, keeping their order.
/// Returns how many playlists were written. If any step fails the store keeps
/// its previous current set.
pub fn publish(writer: &mut dyn PlaylistWriter, playlists: &[Playlist]) -> Result<usize> {
    writer
        .retire_current()
        .context("Failed to retire current top lists")?;

    for playlist in playlists {
        let record = PlaylistRecord::from(playlist);
        writer
            .insert(&record)
            .with_context(|| format!("Failed to store playlist '{}'", record.name))?;
    }
    writer.commit().context("Failed to commit top lists")?;

    info!("Published {} playlists", playlists.len());
    Ok(playlists.len())
}

/// Keeps every top list ever written in a single JSON document.
/// Changes are staged in memory and written by `commit` through a temporary
/// file that replaces the document.
pub struct JsonFileWriter {
    path: PathBuf,
    records: Vec<PlaylistRecord>,
}

impl JsonFileWriter {
    /// Open the store at `path`, starting empty when the file doesn't exist yet
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let records = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read '{}'", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse '{}'", path.display()))?
        } else {
            Vec::new()
        };
        debug!("Opened {} with {} stored playlists", path.display(), records.len());
        Ok(Self { path, records })
    }

    pub fn records(&self) -> &[PlaylistRecord] {
        &self.records
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl PlaylistWriter for JsonFileWriter {
    fn retire_current(&mut self) -> Result<()> {
        for record in &mut self.records {
            record.is_current_top_list = false;
        }
        Ok(())
    }

    fn insert(&mut self, record: &PlaylistRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.records)?;
        let staging = self.staging_path();
        std::fs::write(&staging, content)
            .with_context(|| format!("Failed to write '{}'", staging.display()))?;
        std::fs::rename(&staging, &self.path)
            .with_context(|| format!("Failed to replace '{}'", self.path.display()))?;
        debug!("Committed {} playlists to {}", self.records.len(), self.path.display());
        Ok(())
    }
}
