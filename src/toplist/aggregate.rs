use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::types::{Genre, Group, Groups, PlayContribution, Track};
use crate::error::{Result, ToplistError};
use crate::models::PlayEvent;

/// Check the loader contract before aggregating.
///
/// Rejects a second row for the same (group, user, track) and a track tagged
/// with two different genres inside one group. Membership rows only take part
/// in the duplicate check.
pub fn validate_events(events: &[PlayEvent]) -> Result<()> {
    let mut seen: HashSet<(&str, &str, &str)> = HashSet::new();
    let mut track_genres: HashMap<(&str, &str), &str> = HashMap::new();

    for event in events {
        let key = (
            event.group_id.as_str(),
            event.user_id.as_str(),
            event.track_id.as_str(),
        );
        if !seen.insert(key) {
            return Err(ToplistError::DuplicatePlayEvent {
                group_id: event.group_id.clone(),
                user_id: event.user_id.clone(),
                track_id: event.track_id.clone(),
            });
        }

        let Some(genre) = event.genre.as_deref() else {
            continue;
        };
        let first = *track_genres
            .entry((event.group_id.as_str(), event.track_id.as_str()))
            .or_insert(genre);
        if first != genre {
            return Err(ToplistError::TrackInMultipleGenres {
                group_id: event.group_id.clone(),
                track_id: event.track_id.clone(),
                first: first.to_string(),
                second: genre.to_string(),
            });
        }
    }

    Ok(())
}

/// Fold play events into per-group, per-genre, per-track totals.
///
/// Plays always count towards the member's group total. Only events with a
/// genre create genre and track entries, so a member's total can exceed the
/// sum of their genre plays.
pub fn aggregate(events: &[PlayEvent]) -> Groups {
    let mut groups = Groups::default();

    for event in events {
        let group = groups.get_or_insert_with(&event.group_id, Group::default);
        *group.members.get_or_insert_with(&event.user_id, || 0) += event.plays;

        let Some(genre_name) = event.genre.as_deref() else {
            continue;
        };

        let genre = group.genres.get_or_insert_with(genre_name, Genre::default);
        genre.plays += event.plays;
        *genre
            .plays_per_member
            .get_or_insert_with(&event.user_id, || 0) += event.plays;
        genre
            .tracks
            .get_or_insert_with(&event.track_id, Track::default)
            .plays
            .push(PlayContribution {
                user: event.user_id.clone(),
                plays: event.plays,
            });
    }

    debug!(
        "Aggregated {} play events into {} groups",
        events.len(),
        groups.len()
    );
    groups
}
