//! Service layer: business logic between the HTTP boundary and the DAO.

/// OpenAPI aggregation.
pub mod documentation;
/// Game recording and history.
pub mod game_service;
/// Health probing.
pub mod health_service;
/// Playlist ingestion, access control, and list views.
pub mod playlist_service;
/// Quiz generation.
pub mod quiz_service;
/// Storage connectivity supervision.
pub mod storage_supervisor;
