use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{PlayEvent, TrackInfo};

/// Trailing window of listening history, ending at `end`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListeningWindow {
    pub end: DateTime<Utc>,
    pub days: u32,
}

impl ListeningWindow {
    pub fn trailing_days(end: DateTime<Utc>, days: u32) -> Self {
        Self { end, days }
    }

    /// First instant of the window, clamped to the earliest representable time
    pub fn start(&self) -> DateTime<Utc> {
        self.end
            .checked_sub_signed(Duration::days(i64::from(self.days)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start() && at <= self.end
    }
}

/// Source of pre-joined play events for a window
#[cfg_attr(test, mockall::automock)]
pub trait PlayEventSource {
    fn fetch_play_events(&self, window: &ListeningWindow) -> Result<Vec<PlayEvent>>;
}

/// A user joining a group. Plays before `entered_at` don't count for that group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub group_id: String,
    pub user_id: String,
    pub entered_at: DateTime<Utc>,
}

/// A single listen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayedTrack {
    pub user_id: String,
    pub track_id: String,
    pub played_at: DateTime<Utc>,
}

/// Raw listening history: memberships, individual listens and the track catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListeningLog {
    #[serde(default)]
    pub memberships: Vec<Membership>,
    #[serde(default)]
    pub plays: Vec<PlayedTrack>,
    #[serde(default)]
    pub tracks: Vec<TrackInfo>,
}

impl ListeningLog {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read listening log '{path}'"))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse listening log '{path}'"))
    }

    /// Join memberships with listens inside `window`.
    ///
    /// Per membership, listens are counted per track when they fall inside the
    /// window, are not older than the membership and the track has a genre.
    /// Members without any such listen get a single membership row.
    pub fn play_events(&self, window: &ListeningWindow) -> Vec<PlayEvent> {
        let genres: HashMap<&str, &str> = self
            .tracks
            .iter()
            .filter_map(|t| t.genre.as_deref().map(|g| (t.id.as_str(), g)))
            .collect();

        let mut plays_by_user: HashMap<&str, Vec<&PlayedTrack>> = HashMap::new();
        for play in &self.plays {
            plays_by_user.entry(play.user_id.as_str()).or_default().push(play);
        }

        let mut events = Vec::new();
        for membership in &self.memberships {
            let mut counts: Vec<(&str, &str, u64)> = Vec::new();
            let mut positions: HashMap<&str, usize> = HashMap::new();

            let plays = plays_by_user
                .get(membership.user_id.as_str())
                .map(Vec::as_slice)
                .unwrap_or_default();
            for play in plays {
                if !window.contains(play.played_at) || play.played_at < membership.entered_at {
                    continue;
                }
                let Some(&genre) = genres.get(play.track_id.as_str()) else {
                    continue;
                };
                let i = *positions.entry(play.track_id.as_str()).or_insert_with(|| {
                    counts.push((play.track_id.as_str(), genre, 0));
                    counts.len() - 1
                });
                counts[i].2 += 1;
            }

            if counts.is_empty() {
                events.push(PlayEvent::membership(
                    membership.group_id.as_str(),
                    membership.user_id.as_str(),
                ));
                continue;
            }
            events.extend(counts.into_iter().map(|(track_id, genre, plays)| {
                PlayEvent::new(
                    membership.group_id.as_str(),
                    membership.user_id.as_str(),
                    track_id,
                    Some(genre),
                    plays,
                )
            }));
        }

        debug!(
            "Joined {} memberships and {} listens into {} play events",
            self.memberships.len(),
            self.plays.len(),
            events.len()
        );
        events
    }
}

impl PlayEventSource for ListeningLog {
    fn fetch_play_events(&self, window: &ListeningWindow) -> Result<Vec<PlayEvent>> {
        Ok(self.play_events(window))
    }
}

/// Reads already-joined play events from a JSON array file
pub struct JsonEventSource {
    path: String,
}

impl JsonEventSource {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl PlayEventSource for JsonEventSource {
    fn fetch_play_events(&self, _window: &ListeningWindow) -> Result<Vec<PlayEvent>> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read play events '{}'", self.path))?;
        let events: Vec<PlayEvent> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse play events '{}'", self.path))?;
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
    }

    fn track(id: &str, genre: Option<&str>) -> TrackInfo {
        TrackInfo {
            id: id.to_string(),
            title: format!("Title {id}"),
            artist: "Artist".to_string(),
            genre: genre.map(str::to_string),
        }
    }

    fn play(user: &str, track: &str, played_at: DateTime<Utc>) -> PlayedTrack {
        PlayedTrack {
            user_id: user.to_string(),
            track_id: track.to_string(),
            played_at,
        }
    }

    fn member(group: &str, user: &str, entered_at: DateTime<Utc>) -> Membership {
        Membership {
            group_id: group.to_string(),
            user_id: user.to_string(),
            entered_at,
        }
    }

    #[test]
    fn test_window_bounds() {
        let window = ListeningWindow::trailing_days(at(15, 12), 7);

        assert_eq!(window.start(), at(8, 12));
        assert!(window.contains(at(8, 12)));
        assert!(window.contains(at(15, 12)));
        assert!(!window.contains(at(8, 11)));
        assert!(!window.contains(at(15, 13)));
    }

    #[test]
    fn test_huge_window_starts_at_earliest_time() {
        let window = ListeningWindow::trailing_days(at(15, 12), 200_000_000);

        assert_eq!(window.start(), DateTime::<Utc>::MIN_UTC);
        assert!(window.contains(at(1, 0)));
    }

    #[test]
    fn test_counts_listens_per_track() {
        let log = ListeningLog {
            memberships: vec![member("g", "a", at(1, 0))],
            plays: vec![
                play("a", "t1", at(10, 0)),
                play("a", "t2", at(11, 0)),
                play("a", "t1", at(12, 0)),
            ],
            tracks: vec![track("t1", Some("rock")), track("t2", Some("jazz"))],
        };
        let events = log.play_events(&ListeningWindow::trailing_days(at(15, 0), 7));

        assert_eq!(
            events,
            vec![
                PlayEvent::new("g", "a", "t1", Some("rock"), 2),
                PlayEvent::new("g", "a", "t2", Some("jazz"), 1),
            ]
        );
    }

    #[test]
    fn test_skips_old_untagged_and_pre_membership_listens() {
        let log = ListeningLog {
            memberships: vec![member("g", "a", at(10, 0)), member("h", "a", at(1, 0))],
            plays: vec![
                play("a", "t1", at(2, 0)),  // outside window
                play("a", "t1", at(9, 0)),  // before joining g
                play("a", "t2", at(12, 0)), // no genre
                play("a", "t3", at(12, 0)), // unknown track
            ],
            tracks: vec![track("t1", Some("rock")), track("t2", None)],
        };
        let events = log.play_events(&ListeningWindow::trailing_days(at(15, 0), 7));

        assert_eq!(
            events,
            vec![
                PlayEvent::membership("g", "a"),
                PlayEvent::new("h", "a", "t1", Some("rock"), 1),
            ]
        );
    }

    #[test]
    fn test_members_without_listens_get_membership_row() {
        let log = ListeningLog {
            memberships: vec![member("g", "a", at(1, 0)), member("g", "b", at(1, 0))],
            plays: vec![play("a", "t1", at(14, 0))],
            tracks: vec![track("t1", Some("rock"))],
        };
        let events = log
            .fetch_play_events(&ListeningWindow::trailing_days(at(15, 0), 7))
            .unwrap();

        assert_eq!(events.len(), 2);
        assert!(events[1].is_membership());
        assert_eq!(events[1].user_id, "b");
    }

    #[test]
    fn test_json_event_source_reads_file() {
        let path = std::env::temp_dir().join(format!("toplist-events-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"[
                {"group_id": "g", "user_id": "a", "track_id": "t1", "genre": "rock", "plays": 3},
                {"group_id": "g", "user_id": "b", "genre": null}
            ]"#,
        )
        .unwrap();

        let source = JsonEventSource::new(path.to_str().unwrap());
        let events = source
            .fetch_play_events(&ListeningWindow::trailing_days(at(15, 0), 7))
            .unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(events[0], PlayEvent::new("g", "a", "t1", Some("rock"), 3));
        assert_eq!(events[1], PlayEvent::membership("g", "b"));
    }
}
