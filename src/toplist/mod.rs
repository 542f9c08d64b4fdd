pub mod aggregate;
pub mod builder;
pub mod config;
pub mod generator;
pub mod scoring;
pub mod types;

pub use aggregate::{aggregate, validate_events};
pub use builder::{OVERALL_PLAYLIST_SCORE, build};
pub use config::*;
pub use generator::*;
pub use scoring::score;
pub use types::*;
