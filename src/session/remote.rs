//! Remote boundaries of the client session: quiz fetching and score
//! submission against the backend API.

use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use thiserror::Error;

use crate::dto::game::QuestionDto;

/// Failures talking to the backend API.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Building the HTTP client failed.
    #[error("failed to build API client")]
    ClientBuilder {
        /// Underlying reqwest failure.
        #[source]
        source: reqwest::Error,
    },
    /// The request could not be sent at all.
    #[error("failed to reach the backend at `{path}`")]
    RequestSend {
        /// Path that was requested.
        path: String,
        /// Underlying reqwest failure.
        #[source]
        source: reqwest::Error,
    },
    /// The backend answered with an unexpected status.
    #[error("backend returned status {status} for `{path}`")]
    Status {
        /// Path that was requested.
        path: String,
        /// Status code returned.
        status: StatusCode,
    },
    /// The response body could not be decoded.
    #[error("failed to decode backend response for `{path}`")]
    DecodeResponse {
        /// Path that was requested.
        path: String,
        /// Underlying reqwest failure.
        #[source]
        source: reqwest::Error,
    },
}

/// Final tally of one round, as submitted to the recorder.
#[derive(Debug, Clone, Serialize)]
pub struct RoundResult {
    /// Playlist the round was played against.
    #[serde(rename = "playlistId")]
    pub playlist_id: String,
    /// User who played the round.
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Number of correct answers given.
    pub correct_answers: u32,
    /// Number of questions played.
    pub questions_number: u32,
}

/// Source of quiz questions for a session.
pub trait QuizSource: Send + Sync {
    /// Fetch a quiz for the playlist on behalf of the user.
    fn fetch_quiz(
        &self,
        playlist_id: &str,
        user_id: &str,
        count: usize,
    ) -> BoxFuture<'static, Result<Vec<QuestionDto>, RemoteError>>;
}

/// Sink for completed round scores.
pub trait ScoreRecorder: Send + Sync {
    /// Persist the final tally of a round.
    fn record(&self, result: RoundResult) -> BoxFuture<'static, Result<(), RemoteError>>;
}

/// HTTP implementation of both session boundaries against the backend API.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Arc<str>,
}

impl ApiClient {
    /// Build a client for the given backend base URL.
    pub fn new(base_url: &str) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .build()
            .map_err(|source| RemoteError::ClientBuilder { source })?;

        Ok(Self {
            client,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        })
    }
}

impl QuizSource for ApiClient {
    fn fetch_quiz(
        &self,
        playlist_id: &str,
        user_id: &str,
        count: usize,
    ) -> BoxFuture<'static, Result<Vec<QuestionDto>, RemoteError>> {
        let client = self.client.clone();
        let path = format!("{}/games/quiz/{}", self.base_url, playlist_id);
        let user_id = user_id.to_owned();

        Box::pin(async move {
            let number = count.to_string();
            let response = client
                .get(&path)
                .query(&[("userId", user_id.as_str()), ("number", number.as_str())])
                .send()
                .await
                .map_err(|source| RemoteError::RequestSend {
                    path: path.clone(),
                    source,
                })?;

            if !response.status().is_success() {
                return Err(RemoteError::Status {
                    path,
                    status: response.status(),
                });
            }

            response
                .json::<Vec<QuestionDto>>()
                .await
                .map_err(|source| RemoteError::DecodeResponse { path, source })
        })
    }
}

impl ScoreRecorder for ApiClient {
    fn record(&self, result: RoundResult) -> BoxFuture<'static, Result<(), RemoteError>> {
        let client = self.client.clone();
        let path = format!("{}/games", self.base_url);

        Box::pin(async move {
            let response = client
                .post(&path)
                .json(&result)
                .send()
                .await
                .map_err(|source| RemoteError::RequestSend {
                    path: path.clone(),
                    source,
                })?;

            if response.status().is_success() {
                Ok(())
            } else {
                Err(RemoteError::Status {
                    path,
                    status: response.status(),
                })
            }
        })
    }
}
