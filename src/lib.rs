pub mod config;
pub mod enrich;
pub mod error;
pub mod loader;
pub mod models;
pub mod toplist;
pub mod writer;

#[cfg(test)]
mod toplist_tests;

pub use config::load_config;
pub use error::{Result, ToplistError};
pub use loader::{JsonEventSource, ListeningLog, ListeningWindow, PlayEventSource};
pub use models::PlayEvent;
pub use toplist::{Playlist, ToplistConfig, ToplistGenerator};
pub use writer::{JsonFileWriter, PlaylistWriter, publish};
