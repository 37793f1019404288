//! Song guessing quiz backend plus the client-side game session driver.
//!
//! The server ingests playlists from an external music catalog, guards them
//! with per-playlist access lists, generates multiple-choice quizzes, and
//! records finished rounds. The [`session`] module hosts the client state
//! machine that consumes a quiz one question at a time.

/// External catalog client.
pub mod catalog;
/// Runtime configuration.
pub mod config;
/// Persistence layer.
pub mod dao;
/// HTTP request/response shapes.
pub mod dto;
/// Error taxonomy and HTTP projection.
pub mod error;
/// HTTP route trees.
pub mod routes;
/// Business logic.
pub mod services;
/// Client-side game session.
pub mod session;
/// Shared application state.
pub mod state;
