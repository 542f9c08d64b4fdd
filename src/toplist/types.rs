use std::collections::HashMap;
use std::rc::Rc;

/// Map keyed by opaque string ids that remembers the order keys were first seen.
///
/// Ranking ties are broken by discovery order, so every level of the
/// aggregation keeps its entries in the order they were inserted.
#[derive(Debug, Clone)]
pub struct KeyedList<V> {
    index: HashMap<String, usize>,
    entries: Vec<(String, V)>,
}

impl<V> Default for KeyedList<V> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<V> KeyedList<V> {
    pub fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Return the value for `key`, inserting `make()` at the end if absent
    pub fn get_or_insert_with(&mut self, key: &str, make: impl FnOnce() -> V) -> &mut V {
        let i = match self.index.get(key) {
            Some(&i) => i,
            None => {
                self.entries.push((key.to_string(), make()));
                let i = self.entries.len() - 1;
                self.index.insert(key.to_string(), i);
                i
            }
        };
        &mut self.entries[i].1
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A single user's plays of one track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayContribution {
    pub user: String,
    pub plays: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Track {
    pub plays: Vec<PlayContribution>,
}

#[derive(Debug, Clone, Default)]
pub struct Genre {
    pub plays: u64,
    pub plays_per_member: KeyedList<u64>,
    pub tracks: KeyedList<Track>,
}

/// Aggregated listening of one group
#[derive(Debug, Clone, Default)]
pub struct Group {
    /// Cumulative plays per member across every genre, genre-less plays included
    pub members: KeyedList<u64>,
    pub genres: KeyedList<Genre>,
}

pub type Groups = KeyedList<Group>;

/// A track annotated with its normalized popularity score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTrack {
    pub id: String,
    pub plays: Vec<PlayContribution>,
    pub score: f64,
}

impl ScoredTrack {
    pub fn total_plays(&self) -> u64 {
        self.plays.iter().map(|p| p.plays).sum()
    }

    pub fn unique_listeners(&self) -> usize {
        self.plays.len()
    }
}

#[derive(Debug, Clone)]
pub struct ScoredGenre {
    pub name: String,
    pub tracks: Vec<Rc<ScoredTrack>>,
    pub score: f64,
}

/// Ranked view of one group. Every track is shared between its genre list and
/// `all_tracks`.
#[derive(Debug, Clone)]
pub struct GroupListItem {
    pub id: String,
    pub members: Vec<String>,
    pub genres: Vec<ScoredGenre>,
    pub all_tracks: Vec<Rc<ScoredTrack>>,
}

/// A generated top list
#[derive(Debug, Clone)]
pub struct Playlist {
    pub group_id: String,
    pub name: String,
    pub score: f64,
    pub tracks: Vec<Rc<ScoredTrack>>,
}
