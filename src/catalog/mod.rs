//! Client for the external music catalog: shareable-link resolution and
//! playlist/track metadata lookup.

use std::sync::Arc;

use reqwest::{Client, StatusCode, header::LOCATION, redirect::Policy};
use serde::Deserialize;
use thiserror::Error;

/// Result alias for catalog lookups.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Failures surfaced by the catalog client.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The shareable link did not resolve to a playlist.
    #[error("invalid playlist link: {0}")]
    InvalidLink(String),
    /// The catalog has no resource behind the link or id.
    #[error("not found in catalog: {0}")]
    NotFound(String),
    /// The catalog answered with an unexpected status.
    #[error("catalog returned status {status} for `{path}`")]
    Upstream {
        /// Path that was requested.
        path: String,
        /// Status code returned.
        status: StatusCode,
    },
    /// Building the HTTP client failed.
    #[error("failed to build catalog client")]
    ClientBuilder {
        /// Underlying reqwest failure.
        #[source]
        source: reqwest::Error,
    },
    /// The request could not be sent at all.
    #[error("failed to reach catalog at `{path}`")]
    RequestSend {
        /// Path that was requested.
        path: String,
        /// Underlying reqwest failure.
        #[source]
        source: reqwest::Error,
    },
    /// The response body could not be decoded.
    #[error("failed to decode catalog response for `{path}`")]
    DecodeResponse {
        /// Path that was requested.
        path: String,
        /// Underlying reqwest failure.
        #[source]
        source: reqwest::Error,
    },
}

/// Playlist metadata as returned by the catalog, already mapped into the
/// local shape.
#[derive(Debug, Clone)]
pub struct PlaylistPayload {
    /// Catalog playlist id, coerced to a string.
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
    /// Tracks in playlist order.
    pub songs: Vec<SongPayload>,
}

/// Track metadata as returned by the catalog.
#[derive(Debug, Clone)]
pub struct SongPayload {
    /// Catalog track id, coerced to a string.
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

/// HTTP client against the external catalog. Redirects are handled manually
/// so shortened share links can be resolved one hop at a time.
#[derive(Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: Arc<str>,
}

impl CatalogClient {
    /// Build a client for the given catalog base URL.
    pub fn new(base_url: &str) -> CatalogResult<Self> {
        let client = Client::builder()
            .redirect(Policy::none())
            .build()
            .map_err(|source| CatalogError::ClientBuilder { source })?;

        Ok(Self {
            client,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        })
    }

    /// Follow one redirect hop of a shareable link and extract the playlist
    /// id from the final path segment.
    pub async fn resolve_link(&self, raw_link: &str) -> CatalogResult<String> {
        let response = self
            .client
            .get(raw_link)
            .send()
            .await
            .map_err(|source| CatalogError::RequestSend {
                path: raw_link.to_string(),
                source,
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(format!(
                "playlist link `{raw_link}` is invalid or expired"
            )));
        }

        if status.is_redirection() {
            let target = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .ok_or_else(|| {
                    CatalogError::InvalidLink("redirect carries no usable location".into())
                })?;

            return extract_playlist_id(target).ok_or_else(|| {
                CatalogError::InvalidLink(format!(
                    "could not extract a playlist id from `{target}`"
                ))
            });
        }

        if status.is_success() {
            return Err(CatalogError::InvalidLink(format!(
                "`{raw_link}` did not redirect to a playlist"
            )));
        }

        Err(CatalogError::Upstream {
            path: raw_link.to_string(),
            status,
        })
    }

    /// Fetch a playlist with its track list from the catalog.
    ///
    /// Catalog-supplied fields are passed through with type coercion only.
    pub async fn fetch_playlist(&self, playlist_id: &str) -> CatalogResult<PlaylistPayload> {
        let path = format!("{}/playlist/{}", self.base_url, playlist_id);
        let response = self
            .client
            .get(&path)
            .send()
            .await
            .map_err(|source| CatalogError::RequestSend {
                path: path.clone(),
                source,
            })?;

        if response.status() != StatusCode::OK {
            return Err(CatalogError::NotFound(format!(
                "catalog returned status {} for playlist `{playlist_id}`",
                response.status()
            )));
        }

        let raw = response
            .json::<RawPlaylist>()
            .await
            .map_err(|source| CatalogError::DecodeResponse { path, source })?;

        Ok(raw.into())
    }
}

/// Last path segment of a redirect target, stripped of query and fragment.
fn extract_playlist_id(location: &str) -> Option<String> {
    let trimmed = location.split(['?', '#']).next().unwrap_or(location);
    let after_scheme = trimmed.split_once("://").map_or(trimmed, |(_, rest)| rest);
    let (_, path) = after_scheme.split_once('/')?;

    let segment = path.trim_end_matches('/').rsplit('/').next()?;
    if segment.is_empty() {
        return None;
    }

    Some(segment.to_string())
}

#[derive(Debug, Deserialize)]
struct RawPlaylist {
    id: u64,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    picture_medium: String,
    #[serde(default)]
    fans: u64,
    #[serde(default)]
    duration: u64,
    tracks: RawTracks,
}

#[derive(Debug, Deserialize)]
struct RawTracks {
    data: Vec<RawTrack>,
}

#[derive(Debug, Deserialize)]
struct RawTrack {
    id: u64,
    title: String,
    artist: RawArtist,
    album: RawAlbum,
    #[serde(default)]
    preview: String,
}

#[derive(Debug, Deserialize)]
struct RawArtist {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawAlbum {
    #[serde(default)]
    cover_medium: String,
}

impl From<RawPlaylist> for PlaylistPayload {
    fn from(raw: RawPlaylist) -> Self {
        Self {
            id: raw.id.to_string(),
            title: raw.title,
            description: raw.description,
            cover: raw.picture_medium,
            fans: raw.fans,
            duration: raw.duration,
            songs: raw.tracks.data.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<RawTrack> for SongPayload {
    fn from(raw: RawTrack) -> Self {
        Self {
            id: raw.id.to_string(),
            title: raw.title,
            artist: raw.artist.name,
            cover: raw.album.cover_medium,
            preview: raw.preview,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playlist_id_from_plain_path() {
        assert_eq!(
            extract_playlist_id("https://www.deezer.com/en/playlist/908622995").as_deref(),
            Some("908622995")
        );
    }

    #[test]
    fn playlist_id_ignores_query_and_trailing_slash() {
        assert_eq!(
            extract_playlist_id("https://www.deezer.com/playlist/908622995/?utm=share").as_deref(),
            Some("908622995")
        );
        assert_eq!(
            extract_playlist_id("https://www.deezer.com/playlist/42#top").as_deref(),
            Some("42")
        );
    }

    #[test]
    fn unusable_locations_are_rejected() {
        assert_eq!(extract_playlist_id("https://www.deezer.com/"), None);
        assert_eq!(extract_playlist_id(""), None);
    }

    #[test]
    fn payload_mapping_coerces_ids_to_strings() {
        let raw = RawPlaylist {
            id: 908622995,
            title: "Rock Classics".into(),
            description: String::new(),
            picture_medium: "https://cdn.example/cover.jpg".into(),
            fans: 1200,
            duration: 5400,
            tracks: RawTracks {
                data: vec![RawTrack {
                    id: 3135556,
                    title: "Harder Better Faster Stronger".into(),
                    artist: RawArtist {
                        name: "Daft Punk".into(),
                    },
                    album: RawAlbum {
                        cover_medium: "https://cdn.example/album.jpg".into(),
                    },
                    preview: "https://cdn.example/preview.mp3".into(),
                }],
            },
        };

        let payload = PlaylistPayload::from(raw);
        assert_eq!(payload.id, "908622995");
        assert_eq!(payload.songs.len(), 1);
        assert_eq!(payload.songs[0].id, "3135556");
        assert_eq!(payload.songs[0].artist, "Daft Punk");
    }
}
