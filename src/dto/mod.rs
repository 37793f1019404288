//! Request/response shapes exposed over HTTP.

use std::time::SystemTime;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Playlist request/response DTOs.
pub mod playlist;
/// Game and quiz DTOs.
pub mod game;
/// Health DTOs.
pub mod health;

pub(crate) fn format_system_time(time: SystemTime) -> String {
    OffsetDateTime::from(time)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}
