use std::time::SystemTime;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::dao::{
    document_store::couchdb::error::CouchDaoError,
    models::{GameEntity, PlaylistEntity, SongEntity},
};

/// `_id` prefix for playlist documents.
pub const PLAYLIST_PREFIX: &str = "playlist::";
/// `_id` prefix for song documents.
pub const SONG_PREFIX: &str = "song::";
/// `_id` prefix for game documents.
pub const GAME_PREFIX: &str = "game::";
/// High sentinel appended to a prefix to form an `endkey` range bound.
pub const END_SUFFIX: &str = "\u{ffff}";

/// Response shape of the `_all_docs` view.
#[derive(Debug, Deserialize)]
pub struct AllDocsResponse {
    /// Matching rows, one per document.
    pub rows: Vec<AllDocsRow>,
}

/// Single `_all_docs` row; `doc` is present when `include_docs` is set.
#[derive(Debug, Deserialize)]
pub struct AllDocsRow {
    /// Document `_id`.
    pub id: String,
    /// Full document body when requested.
    #[serde(default)]
    pub doc: Option<Value>,
}

/// Playlist document as stored in CouchDB.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouchPlaylistDocument {
    /// Prefixed document id.
    #[serde(rename = "_id")]
    pub id: String,
    /// CouchDB revision, absent on first create.
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    /// Entity fields.
    #[serde(flatten)]
    pub playlist: PlaylistBody,
}

/// Playlist fields persisted alongside the `_id`/`_rev` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistBody {
    /// Playlist title.
    pub title: String,
    /// Playlist description.
    pub description: String,
    /// Cover image reference.
    pub cover: String,
    /// Fan count.
    pub fans: u64,
    /// Duration in seconds.
    pub duration: u64,
    /// Ordered set of song ids.
    pub songs: IndexSet<String>,
    /// Access list.
    pub users: IndexSet<String>,
    /// First-ingest timestamp.
    pub added_date: SystemTime,
}

impl CouchPlaylistDocument {
    /// Wrap an entity into a document without a revision.
    pub fn from_entity(entity: PlaylistEntity) -> Self {
        Self {
            id: playlist_doc_id(&entity.id),
            rev: None,
            playlist: PlaylistBody {
                title: entity.title,
                description: entity.description,
                cover: entity.cover,
                fans: entity.fans,
                duration: entity.duration,
                songs: entity.songs,
                users: entity.users,
                added_date: entity.added_date,
            },
        }
    }

    /// Recover the entity, parsing the catalog id back out of the `_id`.
    pub fn try_into_entity(self) -> Result<PlaylistEntity, CouchDaoError> {
        let id = extract_id(&self.id)?.to_owned();
        Ok(PlaylistEntity {
            id,
            title: self.playlist.title,
            description: self.playlist.description,
            cover: self.playlist.cover,
            fans: self.playlist.fans,
            duration: self.playlist.duration,
            songs: self.playlist.songs,
            users: self.playlist.users,
            added_date: self.playlist.added_date,
        })
    }
}

/// Song document as stored in CouchDB.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouchSongDocument {
    /// Prefixed document id.
    #[serde(rename = "_id")]
    pub id: String,
    /// CouchDB revision, absent on first create.
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    /// Entity fields.
    #[serde(flatten)]
    pub song: SongBody,
}

/// Song fields persisted alongside the `_id`/`_rev` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongBody {
    /// Track title.
    pub title: String,
    /// Main artist name.
    pub artist: String,
    /// Album cover reference.
    pub cover: String,
    /// Preview clip reference.
    pub preview: String,
    /// Playlists referencing this song.
    pub playlists: IndexSet<String>,
}

impl CouchSongDocument {
    /// Wrap an entity into a document without a revision.
    pub fn from_entity(entity: SongEntity) -> Self {
        Self {
            id: song_doc_id(&entity.id),
            rev: None,
            song: SongBody {
                title: entity.title,
                artist: entity.artist,
                cover: entity.cover,
                preview: entity.preview,
                playlists: entity.playlists,
            },
        }
    }

    /// Recover the entity, parsing the track id back out of the `_id`.
    pub fn try_into_entity(self) -> Result<SongEntity, CouchDaoError> {
        let id = extract_id(&self.id)?.to_owned();
        Ok(SongEntity {
            id,
            title: self.song.title,
            artist: self.song.artist,
            cover: self.song.cover,
            preview: self.song.preview,
            playlists: self.song.playlists,
        })
    }
}

/// Game document as stored in CouchDB.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouchGameDocument {
    /// Prefixed document id.
    #[serde(rename = "_id")]
    pub id: String,
    /// CouchDB revision, absent on first create.
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    /// Entity fields.
    #[serde(flatten)]
    pub game: GameBody,
}

/// Game fields persisted alongside the `_id`/`_rev` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameBody {
    /// Playlist the round was played against.
    pub playlist_id: String,
    /// User who played the round.
    pub player_id: String,
    /// Correct answer count.
    pub correct_answers: u32,
    /// Total question count.
    pub questions_number: u32,
    /// Round completion timestamp.
    pub finished_date: SystemTime,
}

impl CouchGameDocument {
    /// Wrap an entity into a document without a revision.
    pub fn from_entity(entity: GameEntity) -> Self {
        Self {
            id: game_doc_id(entity.id),
            rev: None,
            game: GameBody {
                playlist_id: entity.playlist_id,
                player_id: entity.player_id,
                correct_answers: entity.correct_answers,
                questions_number: entity.questions_number,
                finished_date: entity.finished_date,
            },
        }
    }

    /// Recover the entity, parsing the UUID back out of the `_id`.
    pub fn try_into_entity(self) -> Result<GameEntity, CouchDaoError> {
        let raw = extract_id(&self.id)?;
        let id = Uuid::parse_str(raw).map_err(|_| CouchDaoError::InvalidDocId {
            doc_id: self.id.clone(),
            kind: "invalid UUID",
        })?;
        Ok(GameEntity {
            id,
            playlist_id: self.game.playlist_id,
            player_id: self.game.player_id,
            correct_answers: self.game.correct_answers,
            questions_number: self.game.questions_number,
            finished_date: self.game.finished_date,
        })
    }
}

/// Build the `_id` of a playlist document.
pub fn playlist_doc_id(id: &str) -> String {
    format!("{PLAYLIST_PREFIX}{id}")
}

/// Build the `_id` of a song document.
pub fn song_doc_id(id: &str) -> String {
    format!("{SONG_PREFIX}{id}")
}

/// Build the `_id` of a game document.
pub fn game_doc_id(id: Uuid) -> String {
    format!("{GAME_PREFIX}{id}")
}

/// Strip the `<kind>::` prefix from a document `_id`.
pub fn extract_id(doc_id: &str) -> Result<&str, CouchDaoError> {
    let (_, id) = doc_id
        .split_once("::")
        .ok_or_else(|| CouchDaoError::InvalidDocId {
            doc_id: doc_id.to_string(),
            kind: "missing separator",
        })?;

    if id.is_empty() {
        return Err(CouchDaoError::InvalidDocId {
            doc_id: doc_id.to_string(),
            kind: "empty id",
        });
    }

    Ok(id)
}
