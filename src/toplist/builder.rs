use super::types::{GroupListItem, Playlist};

/// Score stored on the overall list. It is a marker, not an aggregate.
pub const OVERALL_PLAYLIST_SCORE: f64 = 1.0;

pub fn overall_playlist_name(top_overall_size: usize) -> String {
    format!("Top {top_overall_size}")
}

/// Package ranked groups as top lists.
///
/// Each group yields its overall "Top N" list first, then one list per genre
/// in discovery order. Lists shorter than their capacity are emitted as-is.
pub fn build(
    groups: &[GroupListItem],
    top_overall_size: usize,
    top_genre_size: usize,
) -> Vec<Playlist> {
    let mut playlists = Vec::new();

    for group in groups {
        playlists.push(Playlist {
            group_id: group.id.clone(),
            name: overall_playlist_name(top_overall_size),
            score: OVERALL_PLAYLIST_SCORE,
            tracks: group.all_tracks.iter().take(top_overall_size).cloned().collect(),
        });

        for genre in &group.genres {
            playlists.push(Playlist {
                group_id: group.id.clone(),
                name: genre.name.clone(),
                score: genre.score,
                tracks: genre.tracks.iter().take(top_genre_size).cloned().collect(),
            });
        }
    }

    playlists
}
