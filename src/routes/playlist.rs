use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use crate::{
    dto::playlist::{
        IngestResponse, PlaylistDetail, PlaylistOverview, UserQuery, VerifyQuery, VerifyResponse,
    },
    error::AppError,
    services::playlist_service,
    state::SharedState,
};

/// Routes handling playlist verification, ingestion, and views.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/playlists/verify", get(verify_link))
        .route("/playlists/all", get(list_playlists))
        .route("/playlists/{id}", get(get_playlist).post(ingest_playlist))
}

fn require<T>(value: Option<T>, name: &str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::BadRequest(format!("{name} is required")))
}

/// Resolve a shareable playlist link to its canonical playlist id.
#[utoipa::path(
    get,
    path = "/playlists/verify",
    tag = "playlists",
    params(("url" = Option<String>, Query, description = "Shareable playlist link")),
    responses(
        (status = 200, description = "Playlist ID extracted", body = VerifyResponse),
        (status = 400, description = "Playlist link is missing"),
        (status = 404, description = "Link could not be resolved"),
    )
)]
pub async fn verify_link(
    State(state): State<SharedState>,
    Query(query): Query<VerifyQuery>,
) -> Result<Json<VerifyResponse>, AppError> {
    let url = require(query.url, "playlist link")?;
    let playlist_id = playlist_service::verify_link(&state, &url).await?;
    Ok(Json(VerifyResponse { playlist_id }))
}

/// Ingest a playlist for a user, granting access idempotently.
#[utoipa::path(
    post,
    path = "/playlists/{id}",
    tag = "playlists",
    params(
        ("id" = String, Path, description = "Catalog playlist id"),
        ("userId" = Option<String>, Query, description = "Acting user"),
    ),
    responses(
        (status = 200, description = "Playlist ingested", body = IngestResponse),
        (status = 400, description = "Required parameters missing"),
        (status = 500, description = "Catalog or storage failure"),
    )
)]
pub async fn ingest_playlist(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(query): Query<UserQuery>,
) -> Result<Json<IngestResponse>, AppError> {
    let user_id = require(query.user_id, "userId")?;
    playlist_service::ingest(&state, &id, &user_id).await?;
    Ok(Json(IngestResponse {
        message: "playlist ingested".into(),
    }))
}

/// Fetch a full playlist, songs included, for an access-list member.
#[utoipa::path(
    get,
    path = "/playlists/{id}",
    tag = "playlists",
    params(
        ("id" = String, Path, description = "Catalog playlist id"),
        ("userId" = Option<String>, Query, description = "Acting user"),
    ),
    responses(
        (status = 200, description = "Playlist with songs", body = PlaylistDetail),
        (status = 400, description = "Required parameters missing"),
        (status = 403, description = "User is not on the access list"),
        (status = 404, description = "Unknown playlist"),
    )
)]
pub async fn get_playlist(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(query): Query<UserQuery>,
) -> Result<Json<PlaylistDetail>, AppError> {
    let user_id = require(query.user_id, "userId")?;
    let detail = playlist_service::get_for_user(&state, &id, &user_id).await?;
    Ok(Json(detail))
}

/// List every playlist the user may play, with last-played timestamps.
#[utoipa::path(
    get,
    path = "/playlists/all",
    tag = "playlists",
    params(("userId" = Option<String>, Query, description = "Acting user")),
    responses(
        (status = 200, description = "Accessible playlists", body = [PlaylistOverview]),
        (status = 400, description = "User id missing"),
    )
)]
pub async fn list_playlists(
    State(state): State<SharedState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<PlaylistOverview>>, AppError> {
    let user_id = require(query.user_id, "userId")?;
    let overviews = playlist_service::list_for_user(&state, &user_id).await?;
    Ok(Json(overviews))
}
