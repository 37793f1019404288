use std::time::SystemTime;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Playlist copied from the external catalog, keyed by the catalog's own id.
///
/// The id is never re-keyed locally so re-ingesting the same share link maps
/// onto the same document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlaylistEntity {
    /// Catalog-assigned playlist identifier (stable primary key).
    pub id: String,
    /// Human readable playlist title.
    pub title: String,
    /// Free-form description supplied by the catalog.
    pub description: String,
    /// Cover image reference.
    pub cover: String,
    /// Fan count reported by the catalog.
    pub fans: u64,
    /// Total playlist duration in seconds.
    pub duration: u64,
    /// Ordered set of song ids referenced by this playlist.
    pub songs: IndexSet<String>,
    /// Access list: ids of users allowed to read and quiz this playlist.
    pub users: IndexSet<String>,
    /// Timestamp of the first successful ingest.
    pub added_date: SystemTime,
}

impl PlaylistEntity {
    /// Whether the given user is on the access list.
    pub fn has_member(&self, user_id: &str) -> bool {
        self.users.contains(user_id)
    }
}

/// Song copied from the external catalog, shared across playlists.
///
/// At most one record exists per catalog track id; the record is created the
/// first time the track is seen and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SongEntity {
    /// Catalog track identifier (stable primary key).
    pub id: String,
    /// Track title.
    pub title: String,
    /// Display name of the main artist.
    pub artist: String,
    /// Album cover image reference.
    pub cover: String,
    /// Audio clip reference used for the guessing preview.
    pub preview: String,
    /// Back-references to the playlists that contain this song.
    pub playlists: IndexSet<String>,
}

/// One completed quiz round, persisted append-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameEntity {
    /// Primary key of the round.
    pub id: Uuid,
    /// Playlist the quiz was generated from.
    pub playlist_id: String,
    /// User who played the round.
    pub player_id: String,
    /// Number of correctly answered questions.
    pub correct_answers: u32,
    /// Total number of questions in the round.
    pub questions_number: u32,
    /// When the round was recorded.
    pub finished_date: SystemTime,
}
