use serde::{Deserialize, Serialize};

/// One pre-joined row of listening history: how often a group member played a
/// track inside the listening window.
///
/// Membership rows carry an empty `track_id`, no genre and zero plays. They
/// exist so that every member of a group shows up in the aggregation even
/// without any qualifying plays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayEvent {
    pub group_id: String,
    pub user_id: String,
    #[serde(default)]
    pub track_id: String,
    pub genre: Option<String>,
    #[serde(default)]
    pub plays: u64,
}

impl PlayEvent {
    pub fn new(
        group_id: impl Into<String>,
        user_id: impl Into<String>,
        track_id: impl Into<String>,
        genre: Option<&str>,
        plays: u64,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            user_id: user_id.into(),
            track_id: track_id.into(),
            genre: genre.map(str::to_string),
            plays,
        }
    }

    /// Placeholder row registering `user_id` as a member of `group_id`
    pub fn membership(group_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            user_id: user_id.into(),
            track_id: String::new(),
            genre: None,
            plays: 0,
        }
    }

    pub fn is_membership(&self) -> bool {
        self.track_id.is_empty()
    }
}

/// Catalog entry for a track, as used by the loader and the genre enrichment job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackInfo {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    pub genre: Option<String>,
}

/// Album artwork awaiting (or carrying) its dominant color
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumArt {
    pub id: String,
    pub image_url: String,
    pub vibrant_color: Option<String>,
}

/// Persisted shape of a single top list entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistItemRecord {
    pub track_id: String,
    pub number_of_plays: u64,
    pub number_of_unique_listeners: usize,
    pub score: f64,
}

/// Persisted shape of a top list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistRecord {
    pub group_id: String,
    pub name: String,
    pub score: f64,
    pub is_current_top_list: bool,
    pub items: Vec<PlaylistItemRecord>,
}
