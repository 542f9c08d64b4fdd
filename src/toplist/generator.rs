use anyhow::{Context, Result};
use tracing::info;

use super::aggregate::{aggregate, validate_events};
use super::builder::build;
use super::scoring::score;
use super::{Playlist, ToplistConfig};
use crate::loader::{ListeningWindow, PlayEventSource};
use crate::models::PlayEvent;
use crate::writer::{PlaylistWriter, publish};

/// Main top list generator
pub struct ToplistGenerator {
    config: ToplistConfig,
}

impl ToplistGenerator {
    pub fn new(config: ToplistConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ToplistConfig {
        &self.config
    }

    /// Generate every group's top lists from a window of play events
    pub fn generate(&self, events: &[PlayEvent]) -> crate::error::Result<Vec<Playlist>> {
        validate_events(events)?;

        let groups = aggregate(events);
        let ranked = score(&groups);
        let playlists = build(
            &ranked,
            self.config.top_overall_size,
            self.config.top_genre_size,
        );

        info!(
            "Generated {} playlists for {} groups from {} play events",
            playlists.len(),
            ranked.len(),
            events.len()
        );
        Ok(playlists)
    }

    /// Load the window's events, generate top lists and replace the current set in `writer`
    pub fn run(
        &self,
        source: &dyn PlayEventSource,
        writer: &mut dyn PlaylistWriter,
        window: &ListeningWindow,
    ) -> Result<Vec<Playlist>> {
        let events = source
            .fetch_play_events(window)
            .context("Failed to load play events")?;
        let playlists = self.generate(&events)?;
        publish(writer, &playlists)?;
        Ok(playlists)
    }
}
