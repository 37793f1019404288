//! In-memory [`DocumentStore`] used by service tests.

use dashmap::{DashMap, DashSet, Entry};
use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::{
    document_store::DocumentStore,
    models::{GameEntity, PlaylistEntity, SongEntity},
    storage::{StorageError, StorageResult},
};

#[derive(Debug, thiserror::Error)]
#[error("simulated write failure")]
struct PoisonedWrite;

/// Concurrent-map store honoring the same conditional-create contract as the
/// CouchDB backend.
#[derive(Default)]
pub struct MemoryStore {
    playlists: DashMap<String, PlaylistEntity>,
    songs: DashMap<String, SongEntity>,
    games: DashMap<Uuid, GameEntity>,
    poisoned_songs: DashSet<String>,
}

impl MemoryStore {
    /// Fresh empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future `create_song` for this id fail, to exercise the
    /// best-effort ingestion path.
    pub fn poison_song(&self, id: &str) {
        self.poisoned_songs.insert(id.to_string());
    }
}

impl DocumentStore for MemoryStore {
    fn find_playlist(&self, id: &str) -> BoxFuture<'static, StorageResult<Option<PlaylistEntity>>> {
        let found = self.playlists.get(id).map(|entry| entry.clone());
        Box::pin(async move { Ok(found) })
    }

    fn create_playlist(&self, playlist: PlaylistEntity) -> BoxFuture<'static, StorageResult<()>> {
        let result = match self.playlists.entry(playlist.id.clone()) {
            Entry::Occupied(_) => Err(StorageError::Conflict { id: playlist.id }),
            Entry::Vacant(slot) => {
                slot.insert(playlist);
                Ok(())
            }
        };
        Box::pin(async move { result })
    }

    fn update_playlist(&self, playlist: PlaylistEntity) -> BoxFuture<'static, StorageResult<()>> {
        self.playlists.insert(playlist.id.clone(), playlist);
        Box::pin(async move { Ok(()) })
    }

    fn list_playlists(&self) -> BoxFuture<'static, StorageResult<Vec<PlaylistEntity>>> {
        let all = self
            .playlists
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        Box::pin(async move { Ok(all) })
    }

    fn find_song(&self, id: &str) -> BoxFuture<'static, StorageResult<Option<SongEntity>>> {
        let found = self.songs.get(id).map(|entry| entry.clone());
        Box::pin(async move { Ok(found) })
    }

    fn create_song(&self, song: SongEntity) -> BoxFuture<'static, StorageResult<()>> {
        if self.poisoned_songs.contains(&song.id) {
            let err = StorageError::unavailable(
                format!("failed to write song `{}`", song.id),
                PoisonedWrite,
            );
            return Box::pin(async move { Err(err) });
        }

        let result = match self.songs.entry(song.id.clone()) {
            Entry::Occupied(_) => Err(StorageError::Conflict { id: song.id }),
            Entry::Vacant(slot) => {
                slot.insert(song);
                Ok(())
            }
        };
        Box::pin(async move { result })
    }

    fn find_songs(&self, ids: Vec<String>) -> BoxFuture<'static, StorageResult<Vec<SongEntity>>> {
        let songs = ids
            .iter()
            .filter_map(|id| self.songs.get(id).map(|entry| entry.clone()))
            .collect();
        Box::pin(async move { Ok(songs) })
    }

    fn create_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>> {
        self.games.insert(game.id, game);
        Box::pin(async move { Ok(()) })
    }

    fn list_games_for_player(
        &self,
        player_id: &str,
    ) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        let games = self
            .games
            .iter()
            .filter(|entry| entry.player_id == player_id)
            .map(|entry| entry.value().clone())
            .collect();
        Box::pin(async move { Ok(games) })
    }

    fn list_games_for_playlist(
        &self,
        playlist_id: &str,
    ) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        let games = self
            .games
            .iter()
            .filter(|entry| entry.playlist_id == playlist_id)
            .map(|entry| entry.value().clone())
            .collect();
        Box::pin(async move { Ok(games) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async move { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async move { Ok(()) })
    }
}
