//! Game recording and per-user history views.

use std::time::SystemTime;

use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::GameEntity,
    dto::game::{CreateGameRequest, GameHistoryEntry, RecordedGame},
    error::ServiceError,
    state::SharedState,
};

/// Persist one completed round.
///
/// The score ratio is deliberately not validated: the caller is trusted, and
/// whether an inconsistent `correct_answers > questions_number` should be
/// rejected here is still an open question.
pub async fn record(
    state: &SharedState,
    request: CreateGameRequest,
) -> Result<RecordedGame, ServiceError> {
    request
        .validate()
        .map_err(|err| ServiceError::InvalidInput(format!("validation failed: {err}")))?;

    let store = state.require_store().await?;

    let game = GameEntity {
        id: Uuid::new_v4(),
        playlist_id: request.playlist_id,
        player_id: request.user_id,
        correct_answers: request.correct_answers,
        questions_number: request.questions_number,
        finished_date: SystemTime::now(),
    };

    store.create_game(game.clone()).await?;
    info!(game_id = %game.id, playlist_id = %game.playlist_id, "recorded game");

    Ok(game.into())
}

/// Every round the user has finished, flattened with playlist display
/// metadata.
///
/// An empty history is a `NotFound` rather than an empty list so the UI can
/// tell "never played" apart from "no recent games".
pub async fn list_for_user(
    state: &SharedState,
    user_id: &str,
) -> Result<Vec<GameHistoryEntry>, ServiceError> {
    let store = state.require_store().await?;

    let games = store.list_games_for_player(user_id).await?;
    if games.is_empty() {
        return Err(ServiceError::NotFound(format!(
            "no games found for user `{user_id}`"
        )));
    }

    let mut entries = Vec::with_capacity(games.len());
    for game in games {
        let Some(playlist) = store.find_playlist(&game.playlist_id).await? else {
            warn!(
                game_id = %game.id,
                playlist_id = %game.playlist_id,
                "game references a missing playlist; skipping history entry"
            );
            continue;
        };

        entries.push(GameHistoryEntry {
            id: game.id.to_string(),
            title: playlist.title,
            cover: playlist.cover,
            fans: playlist.fans,
            duration: playlist.duration,
            description: playlist.description,
            correct_answers: game.correct_answers,
            questions_number: game.questions_number,
            finished_date: crate::dto::format_system_time(game.finished_date),
        });
    }

    Ok(entries)
}
