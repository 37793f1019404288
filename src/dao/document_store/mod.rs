//! Backend-agnostic document store contract.

/// CouchDB-backed implementation.
pub mod couchdb;
#[cfg(test)]
pub mod memory;

use futures::future::BoxFuture;

use crate::dao::models::{GameEntity, PlaylistEntity, SongEntity};
use crate::dao::storage::StorageResult;

/// Abstraction over the persistence layer for playlists, songs, and games.
///
/// `create_*` methods are atomic conditional creates: they fail with
/// [`StorageError::Conflict`](crate::dao::storage::StorageError::Conflict)
/// when a document with the same id already exists instead of overwriting it.
pub trait DocumentStore: Send + Sync {
    /// Fetch a playlist by its catalog id.
    fn find_playlist(&self, id: &str) -> BoxFuture<'static, StorageResult<Option<PlaylistEntity>>>;
    /// Create a playlist, failing on an existing document with the same id.
    fn create_playlist(&self, playlist: PlaylistEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Replace an existing playlist document.
    fn update_playlist(&self, playlist: PlaylistEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// List every stored playlist.
    fn list_playlists(&self) -> BoxFuture<'static, StorageResult<Vec<PlaylistEntity>>>;
    /// Fetch a song by its catalog track id.
    fn find_song(&self, id: &str) -> BoxFuture<'static, StorageResult<Option<SongEntity>>>;
    /// Create a song, failing on an existing document with the same id.
    fn create_song(&self, song: SongEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Resolve a batch of song ids, silently skipping ids with no document.
    fn find_songs(&self, ids: Vec<String>) -> BoxFuture<'static, StorageResult<Vec<SongEntity>>>;
    /// Append a completed game record.
    fn create_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// List every game played by the given user.
    fn list_games_for_player(
        &self,
        player_id: &str,
    ) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>>;
    /// List every game played against the given playlist.
    fn list_games_for_playlist(
        &self,
        playlist_id: &str,
    ) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>>;
    /// Cheap connectivity probe used by the storage supervisor.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Attempt to re-establish the backend connection after a failed probe.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
