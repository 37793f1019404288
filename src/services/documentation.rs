use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the song guesser backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::playlist::verify_link,
        crate::routes::playlist::ingest_playlist,
        crate::routes::playlist::get_playlist,
        crate::routes::playlist::list_playlists,
        crate::routes::game::generate_quiz,
        crate::routes::game::create_game,
        crate::routes::game::list_games,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::playlist::VerifyResponse,
            crate::dto::playlist::IngestResponse,
            crate::dto::playlist::SongDto,
            crate::dto::playlist::PlaylistDetail,
            crate::dto::playlist::PlaylistOverview,
            crate::dto::game::AnswerDto,
            crate::dto::game::QuestionDto,
            crate::dto::game::CreateGameRequest,
            crate::dto::game::RecordedGame,
            crate::dto::game::GameHistoryEntry,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "playlists", description = "Playlist ingestion and access"),
        (name = "games", description = "Quiz generation and game history"),
    )
)]
pub struct ApiDoc;
