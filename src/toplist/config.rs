use serde::{Deserialize, Serialize};

use crate::error::{Result, ToplistError};

/// Longest listening window accepted, in days
pub const MAX_WINDOW_DAYS: u32 = 3650;

/// Sizing and windowing for top list generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToplistConfig {
    #[serde(default = "default_top_overall_size")]
    pub top_overall_size: usize, // Tracks in the overall "Top N" list
    #[serde(default = "default_top_genre_size")]
    pub top_genre_size: usize, // Tracks in each genre list
    #[serde(default = "default_window_days")]
    pub window_days: u32, // Trailing days of listening history considered
}

fn default_top_overall_size() -> usize {
    10
}

fn default_top_genre_size() -> usize {
    30
}

fn default_window_days() -> u32 {
    7
}

impl Default for ToplistConfig {
    fn default() -> Self {
        Self {
            top_overall_size: default_top_overall_size(),
            top_genre_size: default_top_genre_size(),
            window_days: default_window_days(),
        }
    }
}

impl ToplistConfig {
    /// Load a configuration from a JSON object file. Missing fields take their defaults.
    pub fn load_from_file(path: &str) -> Result<ToplistConfig> {
        let content = std::fs::read_to_string(path)?;
        let config: ToplistConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.top_overall_size == 0 {
            return Err(ToplistError::InvalidConfig(
                "top_overall_size must be at least 1".to_string(),
            ));
        }
        if self.top_genre_size == 0 {
            return Err(ToplistError::InvalidConfig(
                "top_genre_size must be at least 1".to_string(),
            ));
        }
        if self.window_days == 0 || self.window_days > MAX_WINDOW_DAYS {
            return Err(ToplistError::InvalidConfig(format!(
                "window_days must be between 1 and {MAX_WINDOW_DAYS}, got {}",
                self.window_days
            )));
        }
        Ok(())
    }
}
