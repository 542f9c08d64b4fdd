//! Backfilling of track genres and album colors from external lookups.
//!
//! Lookups fail per item: a failed or empty lookup leaves the value absent and
//! the pass moves on to the next item.

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::models::{AlbumArt, TrackInfo};

/// Looks up a genre tag for a track
#[cfg_attr(test, mockall::automock)]
pub trait MetadataEnricher {
    fn lookup_genre(&self, title: &str, artist: &str) -> Result<Option<String>>;
}

/// Extracts a dominant color tag from artwork
#[cfg_attr(test, mockall::automock)]
pub trait VisualFeatureExtractor {
    fn dominant_color(&self, image_url: &str) -> Result<Option<String>>;
}

/// Fill in missing genres. Returns the number of tracks that received one.
pub fn enrich_genres(enricher: &dyn MetadataEnricher, tracks: &mut [TrackInfo]) -> usize {
    let mut enriched = 0;

    for track in tracks.iter_mut().filter(|t| t.genre.is_none()) {
        match enricher.lookup_genre(&track.title, &track.artist) {
            Ok(Some(genre)) => {
                debug!("Track {} tagged as {}", track.id, genre);
                track.genre = Some(genre);
                enriched += 1;
            }
            Ok(None) => debug!("No genre found for track {}", track.id),
            Err(e) => warn!("Genre lookup failed for track {}: {e:#}", track.id),
        }
    }

    info!("Found missing genre for {enriched} tracks");
    enriched
}

/// Fill in missing album colors. Returns the number of albums that received one.
pub fn enrich_colors(extractor: &dyn VisualFeatureExtractor, albums: &mut [AlbumArt]) -> usize {
    let mut enriched = 0;

    for album in albums.iter_mut().filter(|a| a.vibrant_color.is_none()) {
        match extractor.dominant_color(&album.image_url) {
            Ok(Some(color)) => {
                album.vibrant_color = Some(color);
                enriched += 1;
            }
            Ok(None) => debug!("No dominant color for album {}", album.id),
            Err(e) => warn!("Color extraction failed for album {}: {e:#}", album.id),
        }
    }

    info!("Found vibrant color for {enriched} albums");
    enriched
}
