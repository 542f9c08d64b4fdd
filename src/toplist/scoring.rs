use std::cmp::Ordering;
use std::rc::Rc;

use tracing::debug;

use super::types::{Group, GroupListItem, Groups, ScoredGenre, ScoredTrack, Track};

/// Score a track as the sum of each listener's share of their own listening.
///
/// A listener who spent 5 of 10 plays on the track adds 0.5. Listeners with a
/// group total of zero add nothing.
pub fn track_score(group: &Group, track: &Track) -> f64 {
    track
        .plays
        .iter()
        .map(|contribution| {
            debug_assert!(
                group.members.contains_key(&contribution.user),
                "contributor {} is not a member of the group",
                contribution.user
            );
            let total_plays = group.members.get(&contribution.user).copied().unwrap_or(0);
            if total_plays == 0 {
                0.0
            } else {
                contribution.plays as f64 / total_plays as f64
            }
        })
        .sum()
}

/// Per-capita genre score: summed track scores over the full group membership
pub fn genre_score(member_count: usize, tracks: &[Rc<ScoredTrack>]) -> f64 {
    if member_count == 0 {
        return 0.0;
    }
    let sum: f64 = tracks.iter().map(|track| track.score).sum();
    sum / member_count as f64
}

/// Stable sort by score, highest first. Equal scores keep their current order.
pub fn sort_by_score(tracks: &mut [Rc<ScoredTrack>]) {
    tracks.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
}

/// Turn aggregated groups into ranked per-genre and overall track lists
pub fn score(groups: &Groups) -> Vec<GroupListItem> {
    let mut result = Vec::with_capacity(groups.len());

    for (group_id, group) in groups.iter() {
        let members: Vec<String> = group.members.keys().map(str::to_string).collect();
        let mut genres = Vec::with_capacity(group.genres.len());
        let mut all_tracks = Vec::new();

        for (genre_name, genre) in group.genres.iter() {
            let mut tracks: Vec<Rc<ScoredTrack>> = genre
                .tracks
                .iter()
                .map(|(track_id, track)| {
                    Rc::new(ScoredTrack {
                        id: track_id.to_string(),
                        plays: track.plays.clone(),
                        score: track_score(group, track),
                    })
                })
                .collect();
            all_tracks.extend(tracks.iter().cloned());

            sort_by_score(&mut tracks);
            let score = genre_score(members.len(), &tracks);
            genres.push(ScoredGenre {
                name: genre_name.to_string(),
                tracks,
                score,
            });
        }

        sort_by_score(&mut all_tracks);
        debug!(
            "Scored group {}: {} members, {} genres, {} tracks",
            group_id,
            members.len(),
            genres.len(),
            all_tracks.len()
        );

        result.push(GroupListItem {
            id: group_id.to_string(),
            members,
            genres,
            all_tracks,
        });
    }

    result
}
