use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dao::models::{PlaylistEntity, SongEntity};
use crate::dto::format_system_time;

/// Query string of the link verification endpoint.
#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    /// Shareable playlist link to resolve.
    pub url: Option<String>,
}

/// Query string carrying the acting user.
#[derive(Debug, Deserialize)]
pub struct UserQuery {
    /// Identifier of the acting user.
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// Successful link resolution.
#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyResponse {
    /// Canonical playlist id extracted from the link target.
    #[serde(rename = "playlistId")]
    pub playlist_id: String,
}

/// Acknowledgement returned by the ingestion endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct IngestResponse {
    /// Human-readable outcome.
    pub message: String,
}

/// Song as embedded in playlist and quiz responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SongDto {
    /// Catalog track id.
    pub id: String,
    /// Track title.
    pub title: String,
    /// Main artist name.
    pub artist: String,
    /// Album cover reference.
    pub cover: String,
    /// Preview clip reference.
    pub preview: String,
}

impl From<SongEntity> for SongDto {
    fn from(entity: SongEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            artist: entity.artist,
            cover: entity.cover,
            preview: entity.preview,
        }
    }
}

/// Full playlist view with its songs resolved; the access list is never
/// exposed.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlaylistDetail {
    /// Catalog playlist id.
    pub id: String,
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
    /// First-ingest timestamp (RFC 3339).
    pub added_date: String,
    /// Songs in playlist order.
    pub songs: Vec<SongDto>,
}

impl From<(PlaylistEntity, Vec<SongEntity>)> for PlaylistDetail {
    fn from((playlist, songs): (PlaylistEntity, Vec<SongEntity>)) -> Self {
        Self {
            id: playlist.id,
            title: playlist.title,
            description: playlist.description,
            cover: playlist.cover,
            fans: playlist.fans,
            duration: playlist.duration,
            added_date: format_system_time(playlist.added_date),
            songs: songs.into_iter().map(Into::into).collect(),
        }
    }
}

/// Trimmed playlist view for list screens: no songs, no access list.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlaylistOverview {
    /// Catalog playlist id.
    pub id: String,
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
    /// First-ingest timestamp (RFC 3339).
    pub added_date: String,
    /// When the acting user's playlist was last played (RFC 3339), if ever.
    pub last_played: Option<String>,
}

impl PlaylistOverview {
    /// Build an overview from the entity plus the latest game timestamp.
    pub fn new(playlist: PlaylistEntity, last_played: Option<std::time::SystemTime>) -> Self {
        Self {
            id: playlist.id,
            title: playlist.title,
            description: playlist.description,
            cover: playlist.cover,
            fans: playlist.fans,
            duration: playlist.duration,
            added_date: format_system_time(playlist.added_date),
            last_played: last_played.map(format_system_time),
        }
    }
}
