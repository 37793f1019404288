use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dao::models::GameEntity;
use crate::dto::{format_system_time, playlist::SongDto};

/// Query string of the quiz generation endpoint.
#[derive(Debug, Deserialize)]
pub struct QuizQuery {
    /// Identifier of the acting user; must be on the playlist's access list.
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    /// Requested number of questions; capped by the playlist size.
    pub number: Option<usize>,
}

/// One answer option of a quiz question.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnswerDto {
    /// Title shown to the player.
    pub title: String,
    /// Whether this option names the target song.
    #[serde(rename = "isCorrect")]
    pub is_correct: bool,
}

/// One quiz question: the song to guess plus its shuffled answer options.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuestionDto {
    /// The song the player has to recognize from its preview.
    pub song: SongDto,
    /// Shuffled options, exactly one of which is correct.
    pub answers: Vec<AnswerDto>,
}

/// Body of the round recording endpoint.
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateGameRequest {
    /// Playlist the round was played against.
    #[serde(rename = "playlistId")]
    #[validate(length(min = 1, message = "playlistId is required"))]
    pub playlist_id: String,
    /// User who played the round.
    #[serde(rename = "userId")]
    #[validate(length(min = 1, message = "userId is required"))]
    pub user_id: String,
    /// Number of correct answers given.
    #[serde(default)]
    pub correct_answers: u32,
    /// Number of questions played.
    #[serde(default)]
    pub questions_number: u32,
}

/// Persisted round echoed back to the caller.
#[derive(Debug, Serialize, ToSchema)]
pub struct RecordedGame {
    /// Round id.
    pub id: String,
    /// Playlist the round was played against.
    pub playlist_id: String,
    /// User who played the round.
    pub player_id: String,
    /// Number of correct answers given.
    pub correct_answers: u32,
    /// Number of questions played.
    pub questions_number: u32,
    /// Completion timestamp (RFC 3339).
    pub finished_date: String,
}

impl From<GameEntity> for RecordedGame {
    fn from(entity: GameEntity) -> Self {
        Self {
            id: entity.id.to_string(),
            playlist_id: entity.playlist_id,
            player_id: entity.player_id,
            correct_answers: entity.correct_answers,
            questions_number: entity.questions_number,
            finished_date: format_system_time(entity.finished_date),
        }
    }
}

/// One game history row, flattened with its playlist's display metadata.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameHistoryEntry {
    /// Round id.
    pub id: String,
    /// Playlist title.
    pub title: String,
    /// Playlist cover reference.
    pub cover: String,
    /// Playlist fan count.
    pub fans: u64,
    /// Playlist duration in seconds.
    pub duration: u64,
    /// Playlist description.
    pub description: String,
    /// Number of correct answers given.
    pub correct_answers: u32,
    /// Number of questions played.
    pub questions_number: u32,
    /// Completion timestamp (RFC 3339).
    pub finished_date: String,
}
