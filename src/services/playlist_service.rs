//! Playlist ingestion, access control, and list views.

use std::sync::Arc;
use std::time::SystemTime;

use indexmap::IndexSet;
use tracing::{debug, info, warn};

use crate::{
    catalog::PlaylistPayload,
    dao::{
        document_store::DocumentStore,
        models::{PlaylistEntity, SongEntity},
        storage::StorageError,
    },
    dto::playlist::{PlaylistDetail, PlaylistOverview},
    error::ServiceError,
    state::SharedState,
};

/// Resolve a shareable playlist link to its canonical catalog id.
pub async fn verify_link(state: &SharedState, url: &str) -> Result<String, ServiceError> {
    let playlist_id = state.catalog().resolve_link(url).await?;
    Ok(playlist_id)
}

/// Idempotently ingest a playlist for a user.
///
/// A known playlist only gets the user appended to its access list; song data
/// already on record is trusted as current. An unknown playlist is fetched
/// from the catalog and created together with its songs. The whole operation
/// is serialized per playlist id, and playlist creation itself is an atomic
/// conditional create, so two racing first-time ingests cannot produce
/// duplicate rows: the loser falls through to the grant-access path.
pub async fn ingest(
    state: &SharedState,
    playlist_id: &str,
    user_id: &str,
) -> Result<(), ServiceError> {
    let guard = state.ingest_guard(playlist_id);
    let _serialized = guard.lock().await;

    let store = state.require_store().await?;

    if let Some(playlist) = store.find_playlist(playlist_id).await? {
        debug!(playlist_id, "playlist already ingested; granting access");
        return grant_access(&store, playlist, user_id).await;
    }

    let payload = state.catalog().fetch_playlist(playlist_id).await?;
    create_from_payload(&store, payload, user_id).await
}

/// Create playlist and song records from a catalog payload.
///
/// Song creation is best-effort: a song that already exists counts as a
/// success (songs are shared across playlists), while one that fails to
/// persist is dropped from the playlist's song set and reported as a count.
pub(crate) async fn create_from_payload(
    store: &Arc<dyn DocumentStore>,
    payload: PlaylistPayload,
    user_id: &str,
) -> Result<(), ServiceError> {
    let mut song_ids = IndexSet::new();
    let mut dropped = 0usize;

    for song in payload.songs {
        let song_id = song.id.clone();
        let entity = SongEntity {
            id: song.id,
            title: song.title,
            artist: song.artist,
            cover: song.cover,
            preview: song.preview,
            playlists: IndexSet::from([payload.id.clone()]),
        };

        match store.create_song(entity).await {
            Ok(()) => {
                song_ids.insert(song_id);
            }
            Err(StorageError::Conflict { .. }) => {
                // Already known from another playlist; reuse the record.
                song_ids.insert(song_id);
            }
            Err(err) => {
                dropped += 1;
                debug!(song_id = %song_id, error = %err, "failed to persist song");
            }
        }
    }

    if dropped > 0 {
        warn!(
            playlist_id = %payload.id,
            dropped,
            "dropped songs that could not be persisted"
        );
    }

    let playlist = PlaylistEntity {
        id: payload.id.clone(),
        title: payload.title,
        description: payload.description,
        cover: payload.cover,
        fans: payload.fans,
        duration: payload.duration,
        songs: song_ids,
        users: IndexSet::from([user_id.to_string()]),
        added_date: SystemTime::now(),
    };

    match store.create_playlist(playlist).await {
        Ok(()) => {
            info!(playlist_id = %payload.id, "created playlist");
            Ok(())
        }
        Err(StorageError::Conflict { .. }) => {
            // Another writer created it first; treat it as existing.
            let Some(existing) = store.find_playlist(&payload.id).await? else {
                return Err(ServiceError::NotFound(format!(
                    "playlist `{}` vanished during ingestion",
                    payload.id
                )));
            };
            grant_access(store, existing, user_id).await
        }
        Err(err) => Err(err.into()),
    }
}

async fn grant_access(
    store: &Arc<dyn DocumentStore>,
    mut playlist: PlaylistEntity,
    user_id: &str,
) -> Result<(), ServiceError> {
    if playlist.users.insert(user_id.to_string()) {
        info!(playlist_id = %playlist.id, user_id, "granted playlist access");
        store.update_playlist(playlist).await?;
    }
    Ok(())
}

/// Load a playlist with its songs, enforcing access-list membership.
pub(crate) async fn authorized_playlist(
    state: &SharedState,
    playlist_id: &str,
    user_id: &str,
) -> Result<(PlaylistEntity, Vec<SongEntity>), ServiceError> {
    let store = state.require_store().await?;

    let Some(playlist) = store.find_playlist(playlist_id).await? else {
        return Err(ServiceError::NotFound(format!(
            "playlist `{playlist_id}` not found"
        )));
    };

    if !playlist.has_member(user_id) {
        return Err(ServiceError::AccessDenied(
            "you do not have access to this playlist".into(),
        ));
    }

    let song_ids = playlist.songs.iter().cloned().collect();
    let songs = store.find_songs(song_ids).await?;

    Ok((playlist, songs))
}

/// Full playlist view for a member, songs included.
pub async fn get_for_user(
    state: &SharedState,
    playlist_id: &str,
    user_id: &str,
) -> Result<PlaylistDetail, ServiceError> {
    let (playlist, songs) = authorized_playlist(state, playlist_id, user_id).await?;
    Ok((playlist, songs).into())
}

/// All playlists the user may play, each enriched with the timestamp of its
/// most recent game.
pub async fn list_for_user(
    state: &SharedState,
    user_id: &str,
) -> Result<Vec<PlaylistOverview>, ServiceError> {
    let store = state.require_store().await?;

    let playlists = store.list_playlists().await?;

    let mut overviews = Vec::new();
    for playlist in playlists {
        if !playlist.has_member(user_id) {
            continue;
        }

        let games = store.list_games_for_playlist(&playlist.id).await?;
        let last_played = games.iter().map(|game| game.finished_date).max();
        overviews.push(PlaylistOverview::new(playlist, last_played));
    }

    Ok(overviews)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::{CatalogClient, SongPayload},
        dao::document_store::memory::MemoryStore,
        state::AppState,
    };

    fn test_state_with_store() -> (crate::state::SharedState, Arc<dyn DocumentStore>) {
        let catalog = CatalogClient::new("http://localhost:0").expect("client");
        let state = AppState::new(catalog);
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        (state, store)
    }

    async fn install(state: &crate::state::SharedState, store: &Arc<dyn DocumentStore>) {
        state.set_store(store.clone()).await;
    }

    fn payload(id: &str, song_ids: &[&str]) -> PlaylistPayload {
        PlaylistPayload {
            id: id.to_string(),
            title: format!("Playlist {id}"),
            description: "test playlist".into(),
            cover: "https://cdn.example/cover.jpg".into(),
            fans: 7,
            duration: 1800,
            songs: song_ids
                .iter()
                .map(|song_id| SongPayload {
                    id: song_id.to_string(),
                    title: format!("Song {song_id}"),
                    artist: "Artist".into(),
                    cover: "https://cdn.example/album.jpg".into(),
                    preview: format!("https://cdn.example/{song_id}.mp3"),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn first_ingest_creates_playlist_and_songs() {
        let (state, store) = test_state_with_store();
        install(&state, &store).await;

        create_from_payload(&store, payload("123", &["a", "b", "c"]), "u1")
            .await
            .unwrap();

        let playlist = store.find_playlist("123").await.unwrap().unwrap();
        assert_eq!(playlist.songs.len(), 3);
        assert!(playlist.has_member("u1"));

        let song = store.find_song("a").await.unwrap().unwrap();
        assert!(song.playlists.contains("123"));
    }

    #[tokio::test]
    async fn ingest_is_idempotent_for_access_grants() {
        let (state, store) = test_state_with_store();
        install(&state, &store).await;
        create_from_payload(&store, payload("123", &["a"]), "u1")
            .await
            .unwrap();

        // Known playlist: ingest never goes back to the catalog.
        ingest(&state, "123", "u1").await.unwrap();
        ingest(&state, "123", "u1").await.unwrap();

        let playlist = store.find_playlist("123").await.unwrap().unwrap();
        assert_eq!(
            playlist.users.iter().filter(|id| *id == "u1").count(),
            1,
            "user must appear exactly once"
        );
    }

    #[tokio::test]
    async fn ingest_grants_access_to_additional_users() {
        let (state, store) = test_state_with_store();
        install(&state, &store).await;
        create_from_payload(&store, payload("123", &["a"]), "u1")
            .await
            .unwrap();

        ingest(&state, "123", "u2").await.unwrap();

        let playlist = store.find_playlist("123").await.unwrap().unwrap();
        assert!(playlist.has_member("u1"));
        assert!(playlist.has_member("u2"));
    }

    #[tokio::test]
    async fn songs_are_shared_across_playlists() {
        let (state, store) = test_state_with_store();
        install(&state, &store).await;

        create_from_payload(&store, payload("123", &["a", "b"]), "u1")
            .await
            .unwrap();
        create_from_payload(&store, payload("456", &["b", "c"]), "u1")
            .await
            .unwrap();

        // The shared song keeps its original record.
        let song = store.find_song("b").await.unwrap().unwrap();
        assert_eq!(
            song.playlists.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["123"]
        );

        let second = store.find_playlist("456").await.unwrap().unwrap();
        assert!(second.songs.contains("b"));
        assert!(second.songs.contains("c"));
    }

    #[tokio::test]
    async fn unpersistable_songs_are_dropped_not_fatal() {
        let catalog = CatalogClient::new("http://localhost:0").expect("client");
        let state = AppState::new(catalog);

        let memory = MemoryStore::new();
        memory.poison_song("b");
        let store: Arc<dyn DocumentStore> = Arc::new(memory);
        state.set_store(store.clone()).await;

        create_from_payload(&store, payload("123", &["a", "b", "c"]), "u1")
            .await
            .unwrap();

        let playlist = store.find_playlist("123").await.unwrap().unwrap();
        assert!(playlist.songs.contains("a"));
        assert!(!playlist.songs.contains("b"));
        assert!(playlist.songs.contains("c"));
    }

    #[tokio::test]
    async fn create_race_loser_falls_back_to_access_grant() {
        let (state, store) = test_state_with_store();
        install(&state, &store).await;

        create_from_payload(&store, payload("123", &["a"]), "u1")
            .await
            .unwrap();
        // Same payload again, as if a concurrent ingest lost the create race.
        create_from_payload(&store, payload("123", &["a"]), "u2")
            .await
            .unwrap();

        let playlist = store.find_playlist("123").await.unwrap().unwrap();
        assert!(playlist.has_member("u1"));
        assert!(playlist.has_member("u2"));
    }

    #[tokio::test]
    async fn get_for_user_enforces_membership() {
        let (state, store) = test_state_with_store();
        install(&state, &store).await;
        create_from_payload(&store, payload("123", &["a", "b"]), "u1")
            .await
            .unwrap();

        let detail = get_for_user(&state, "123", "u1").await.unwrap();
        assert_eq!(detail.id, "123");
        assert_eq!(detail.songs.len(), 2);

        let err = get_for_user(&state, "123", "u2").await.unwrap_err();
        assert!(matches!(err, ServiceError::AccessDenied(_)));

        let err = get_for_user(&state, "999", "u1").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_for_user_never_leaks_foreign_playlists() {
        let (state, store) = test_state_with_store();
        install(&state, &store).await;
        create_from_payload(&store, payload("mine", &["a"]), "u1")
            .await
            .unwrap();
        create_from_payload(&store, payload("theirs", &["b"]), "u2")
            .await
            .unwrap();

        let overviews = list_for_user(&state, "u1").await.unwrap();
        assert_eq!(overviews.len(), 1);
        assert_eq!(overviews[0].id, "mine");
        assert!(overviews[0].last_played.is_none());
    }

    #[tokio::test]
    async fn requests_fail_while_degraded() {
        let catalog = CatalogClient::new("http://localhost:0").expect("client");
        let state = AppState::new(catalog);

        let err = list_for_user(&state, "u1").await.unwrap_err();
        assert!(matches!(err, ServiceError::Degraded));
    }
}
