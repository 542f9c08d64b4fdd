use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToplistError {
    #[error("Duplicate play event for group '{group_id}', user '{user_id}', track '{track_id}'")]
    DuplicatePlayEvent {
        group_id: String,
        user_id: String,
        track_id: String,
    },

    #[error("Track '{track_id}' in group '{group_id}' is tagged both '{first}' and '{second}'")]
    TrackInMultipleGenres {
        group_id: String,
        track_id: String,
        first: String,
        second: String,
    },

    #[error("Configuration error: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ToplistError>;
