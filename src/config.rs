use crate::error::{Result, ToplistError};
use crate::toplist::ToplistConfig;

pub const TOP_OVERALL_SIZE_VAR: &str = "TOPLIST_TOP_OVERALL_SIZE";
pub const TOP_GENRE_SIZE_VAR: &str = "TOPLIST_TOP_GENRE_SIZE";
pub const WINDOW_DAYS_VAR: &str = "TOPLIST_WINDOW_DAYS";

/// Load configuration from an optional JSON file, then `.env` and the environment
pub fn load_config(config_file: Option<&str>) -> Result<ToplistConfig> {
    // Load `.env` file if present
    dotenv::dotenv().ok();

    let config = match config_file {
        Some(path) => ToplistConfig::load_from_file(path)?,
        None => ToplistConfig::default(),
    };
    apply_overrides(config, |name| std::env::var(name).ok())
}

/// Override config fields with any variables `lookup` knows about
pub fn apply_overrides(
    mut config: ToplistConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ToplistConfig> {
    if let Some(value) = lookup(TOP_OVERALL_SIZE_VAR) {
        config.top_overall_size = parse_var(TOP_OVERALL_SIZE_VAR, &value)?;
    }
    if let Some(value) = lookup(TOP_GENRE_SIZE_VAR) {
        config.top_genre_size = parse_var(TOP_GENRE_SIZE_VAR, &value)?;
    }
    if let Some(value) = lookup(WINDOW_DAYS_VAR) {
        config.window_days = parse_var(WINDOW_DAYS_VAR, &value)?;
    }
    Ok(config)
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ToplistError::InvalidConfig(format!("{name} is not a valid number: '{value}'")))
}
