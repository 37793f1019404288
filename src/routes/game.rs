use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    dto::game::{CreateGameRequest, GameHistoryEntry, QuestionDto, QuizQuery, RecordedGame},
    error::AppError,
    services::{game_service, quiz_service},
    state::SharedState,
};

/// Default question count when the caller does not pick one.
const DEFAULT_QUESTIONS: usize = 10;

/// Routes handling quiz generation and game history.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/games", post(create_game))
        .route("/games/quiz/{id}", get(generate_quiz))
        .route("/games/user/{user_id}", get(list_games))
}

/// Generate a fresh quiz for a playlist the user may play.
#[utoipa::path(
    get,
    path = "/games/quiz/{id}",
    tag = "games",
    params(
        ("id" = String, Path, description = "Catalog playlist id"),
        ("userId" = Option<String>, Query, description = "Acting user; must be a playlist member"),
        ("number" = Option<usize>, Query, description = "Requested question count"),
    ),
    responses(
        (status = 200, description = "Generated quiz", body = [QuestionDto]),
        (status = 400, description = "Required parameters missing"),
        (status = 403, description = "User is not on the access list"),
        (status = 404, description = "Unknown playlist"),
    )
)]
pub async fn generate_quiz(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(query): Query<QuizQuery>,
) -> Result<Json<Vec<QuestionDto>>, AppError> {
    let Some(user_id) = query.user_id else {
        return Err(AppError::BadRequest("userId is required".into()));
    };
    let number = query.number.unwrap_or(DEFAULT_QUESTIONS);

    let questions = quiz_service::generate_quiz(&state, &id, &user_id, number).await?;
    Ok(Json(questions))
}

/// Record a finished round.
#[utoipa::path(
    post,
    path = "/games",
    tag = "games",
    request_body = CreateGameRequest,
    responses(
        (status = 201, description = "Game recorded", body = RecordedGame),
        (status = 400, description = "playlistId or userId missing"),
    )
)]
pub async fn create_game(
    State(state): State<SharedState>,
    Json(payload): Json<CreateGameRequest>,
) -> Result<(StatusCode, Json<RecordedGame>), AppError> {
    let recorded = game_service::record(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(recorded)))
}

/// List a user's game history joined with playlist metadata.
#[utoipa::path(
    get,
    path = "/games/user/{user_id}",
    tag = "games",
    params(("user_id" = String, Path, description = "User whose history to list")),
    responses(
        (status = 200, description = "Game history", body = [GameHistoryEntry]),
        (status = 404, description = "User has no recorded games"),
    )
)]
pub async fn list_games(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<GameHistoryEntry>>, AppError> {
    let history = game_service::list_for_user(&state, &user_id).await?;
    Ok(Json(history))
}
