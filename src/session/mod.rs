//! Client-side game session: drives one quiz through load, answer, reveal,
//! advance, and finish, then reconciles the score with the backend.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::dto::game::QuestionDto;

/// Session lifecycle state machine.
pub mod machine;
/// Quiz source and score recorder boundaries.
pub mod remote;

use machine::{InvalidTransition, SessionEvent, SessionMachine, SessionPhase};
use remote::{QuizSource, RemoteError, RoundResult, ScoreRecorder};

/// Fixed delay between submitting an answer and its reveal. The transition is
/// scheduled, not instantaneous, and cannot be cancelled once submitted.
pub const REVEAL_DELAY: Duration = Duration::from_millis(2_100);

/// Failures surfaced by a game session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Fetching the quiz failed; the session is aborted.
    #[error("failed to load quiz")]
    Load(#[source] RemoteError),
    /// The quiz came back empty; there is nothing to play.
    #[error("quiz for playlist `{0}` is empty")]
    EmptyQuiz(String),
    /// An operation was attempted in the wrong phase.
    #[error(transparent)]
    Phase(#[from] InvalidTransition),
    /// A selection was attempted outside the answering phase.
    #[error("selection is only possible while answering (currently {phase:?})")]
    SelectionLocked {
        /// Phase the session was in.
        phase: SessionPhase,
    },
    /// The selected option index does not exist on the current question.
    #[error("option {index} is out of range for {available} answers")]
    OptionOutOfRange {
        /// Requested option index.
        index: usize,
        /// Number of answers on the current question.
        available: usize,
    },
}

/// Outcome of [`GameSession::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Moved on to the question at this index.
    NextQuestion(usize),
    /// The round is over; the final tally has been dispatched.
    Finished(FinalTally),
}

/// Final score of a finished round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalTally {
    /// Number of correctly answered questions.
    pub correct_answers: u32,
    /// Number of questions played.
    pub questions_number: u32,
}

/// Holder for the audio preview of the current question.
///
/// At most one clip is loaded at a time: loading a new clip releases the
/// previous one, and the slot is emptied on session teardown.
#[derive(Debug, Default)]
pub struct PreviewSlot {
    current: Option<String>,
}

impl PreviewSlot {
    /// Load a clip, releasing whatever was loaded before.
    pub fn load(&mut self, clip: &str) {
        if let Some(previous) = self.current.replace(clip.to_string()) {
            debug!(clip = %previous, "released audio preview");
        }
        debug!(clip, "loaded audio preview");
    }

    /// Release the loaded clip, if any.
    pub fn release(&mut self) {
        if let Some(previous) = self.current.take() {
            debug!(clip = %previous, "released audio preview");
        }
    }

    /// Clip currently loaded.
    pub fn loaded(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

/// One active play-through of a quiz.
pub struct GameSession {
    playlist_id: String,
    user_id: String,
    machine: SessionMachine,
    questions: Vec<QuestionDto>,
    current: usize,
    selection: Option<usize>,
    correct_answers: u32,
    preview: PreviewSlot,
    recorder: Arc<dyn ScoreRecorder>,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("playlist_id", &self.playlist_id)
            .field("user_id", &self.user_id)
            .field("machine", &self.machine)
            .field("questions", &self.questions)
            .field("current", &self.current)
            .field("selection", &self.selection)
            .field("correct_answers", &self.correct_answers)
            .field("preview", &self.preview)
            .field("recorder", &"<dyn ScoreRecorder>")
            .finish()
    }
}

impl GameSession {
    /// Fetch the quiz and start the session on its first question.
    ///
    /// A failed or empty fetch aborts the session: no `GameSession` value
    /// exists afterwards.
    pub async fn start(
        source: &dyn QuizSource,
        recorder: Arc<dyn ScoreRecorder>,
        playlist_id: &str,
        user_id: &str,
        count: usize,
    ) -> Result<Self, SessionError> {
        let mut machine = SessionMachine::new();

        let questions = source
            .fetch_quiz(playlist_id, user_id, count)
            .await
            .map_err(SessionError::Load)?;

        if questions.is_empty() {
            return Err(SessionError::EmptyQuiz(playlist_id.to_string()));
        }

        machine.apply(SessionEvent::QuizLoaded)?;

        let mut preview = PreviewSlot::default();
        preview.load(&questions[0].song.preview);

        Ok(Self {
            playlist_id: playlist_id.to_string(),
            user_id: user_id.to_string(),
            machine,
            questions,
            current: 0,
            selection: None,
            correct_answers: 0,
            preview,
            recorder,
        })
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.machine.phase()
    }

    /// Zero-based index of the question on screen.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Number of questions in the quiz.
    pub fn questions_number(&self) -> usize {
        self.questions.len()
    }

    /// Question currently on screen.
    pub fn current_question(&self) -> &QuestionDto {
        &self.questions[self.current]
    }

    /// Option currently selected for this question.
    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    /// Running count of correctly answered questions.
    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    /// Audio preview slot for the current question.
    pub fn preview(&self) -> &PreviewSlot {
        &self.preview
    }

    /// Pick an option for the current question.
    ///
    /// Re-selecting overwrites the previous pick; nothing is locked in until
    /// [`submit`](Self::submit).
    pub fn select(&mut self, option: usize) -> Result<(), SessionError> {
        if self.phase() != SessionPhase::Answering {
            return Err(SessionError::SelectionLocked {
                phase: self.phase(),
            });
        }

        let available = self.current_question().answers.len();
        if option >= available {
            return Err(SessionError::OptionOutOfRange {
                index: option,
                available,
            });
        }

        self.selection = Some(option);
        Ok(())
    }

    /// Freeze the selection and schedule the reveal.
    ///
    /// Returns the delay the caller must wait before calling
    /// [`complete_reveal`](Self::complete_reveal).
    pub fn submit(&mut self) -> Result<Duration, SessionError> {
        self.machine.apply(SessionEvent::Submit)?;
        Ok(REVEAL_DELAY)
    }

    /// Finish the scheduled reveal and score the frozen selection.
    ///
    /// Returns whether the selection was correct; no selection counts as
    /// incorrect.
    pub fn complete_reveal(&mut self) -> Result<bool, SessionError> {
        self.machine.apply(SessionEvent::RevealElapsed)?;

        let correct = self
            .selection
            .map(|index| self.questions[self.current].answers[index].is_correct)
            .unwrap_or(false);

        if correct {
            self.correct_answers += 1;
        }

        Ok(correct)
    }

    /// Submit and wait out the reveal in one step.
    ///
    /// The sleep is not raced against anything: once submitted, the reveal
    /// cannot be aborted.
    pub async fn submit_and_reveal(&mut self) -> Result<bool, SessionError> {
        let delay = self.submit()?;
        tokio::time::sleep(delay).await;
        self.complete_reveal()
    }

    /// Move past a revealed question.
    ///
    /// With questions remaining, the session returns to answering with all
    /// per-question state cleared. On the last question the final tally is
    /// dispatched to the score recorder without blocking, and the session
    /// finishes regardless of whether that write succeeds.
    pub fn advance(&mut self) -> Result<Advance, SessionError> {
        if self.current + 1 < self.questions.len() {
            self.machine.apply(SessionEvent::NextQuestion)?;
            self.current += 1;
            self.selection = None;
            self.preview.load(&self.questions[self.current].song.preview);
            return Ok(Advance::NextQuestion(self.current));
        }

        self.machine.apply(SessionEvent::Finish)?;
        self.selection = None;
        self.preview.release();

        let tally = FinalTally {
            correct_answers: self.correct_answers,
            questions_number: self.questions.len() as u32,
        };

        self.dispatch_result(&tally);

        Ok(Advance::Finished(tally))
    }

    /// Fire-and-forget score submission; failures are logged, never surfaced,
    /// and never retried.
    fn dispatch_result(&self, tally: &FinalTally) {
        let result = RoundResult {
            playlist_id: self.playlist_id.clone(),
            user_id: self.user_id.clone(),
            correct_answers: tally.correct_answers,
            questions_number: tally.questions_number,
        };

        let future = self.recorder.record(result);
        tokio::spawn(async move {
            if let Err(err) = future.await {
                warn!(error = %err, "failed to submit game result");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::BoxFuture;
    use tokio::sync::mpsc;

    use crate::dto::game::AnswerDto;
    use crate::dto::playlist::SongDto;

    struct FixedQuiz(Vec<QuestionDto>);

    impl QuizSource for FixedQuiz {
        fn fetch_quiz(
            &self,
            _playlist_id: &str,
            _user_id: &str,
            _count: usize,
        ) -> BoxFuture<'static, Result<Vec<QuestionDto>, RemoteError>> {
            let questions = self.0.clone();
            Box::pin(async move { Ok(questions) })
        }
    }

    struct FailingQuiz;

    impl QuizSource for FailingQuiz {
        fn fetch_quiz(
            &self,
            playlist_id: &str,
            _user_id: &str,
            _count: usize,
        ) -> BoxFuture<'static, Result<Vec<QuestionDto>, RemoteError>> {
            let path = format!("/games/quiz/{playlist_id}");
            Box::pin(async move {
                Err(RemoteError::Status {
                    path,
                    status: reqwest::StatusCode::FORBIDDEN,
                })
            })
        }
    }

    struct CapturingRecorder {
        sender: mpsc::UnboundedSender<RoundResult>,
        fail: bool,
    }

    impl ScoreRecorder for CapturingRecorder {
        fn record(&self, result: RoundResult) -> BoxFuture<'static, Result<(), RemoteError>> {
            let sender = self.sender.clone();
            let fail = self.fail;
            Box::pin(async move {
                sender.send(result.clone()).ok();
                if fail {
                    Err(RemoteError::Status {
                        path: "/games".into(),
                        status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                    })
                } else {
                    Ok(())
                }
            })
        }
    }

    fn question(preview: &str, correct_index: usize) -> QuestionDto {
        QuestionDto {
            song: SongDto {
                id: format!("song-{preview}"),
                title: "Target".into(),
                artist: "Artist".into(),
                cover: String::new(),
                preview: preview.to_string(),
            },
            answers: (0..4)
                .map(|index| AnswerDto {
                    title: format!("Option {index}"),
                    is_correct: index == correct_index,
                })
                .collect(),
        }
    }

    fn recorder(fail: bool) -> (Arc<dyn ScoreRecorder>, mpsc::UnboundedReceiver<RoundResult>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Arc::new(CapturingRecorder { sender, fail }), receiver)
    }

    async fn started(
        questions: Vec<QuestionDto>,
    ) -> (GameSession, mpsc::UnboundedReceiver<RoundResult>) {
        let (rec, rx) = recorder(false);
        let session = GameSession::start(&FixedQuiz(questions), rec, "123", "u1", 10)
            .await
            .unwrap();
        (session, rx)
    }

    #[tokio::test]
    async fn failed_load_aborts_the_session() {
        let (rec, _rx) = recorder(false);
        let err = GameSession::start(&FailingQuiz, rec, "123", "u1", 10)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Load(_)));
    }

    #[tokio::test]
    async fn selection_is_an_idempotent_overwrite() {
        let (mut session, _rx) = started(vec![question("a.mp3", 0)]).await;

        session.select(1).unwrap();
        session.select(3).unwrap();
        assert_eq!(session.selection(), Some(3));

        let err = session.select(9).unwrap_err();
        assert!(matches!(err, SessionError::OptionOutOfRange { .. }));
    }

    #[tokio::test]
    async fn selection_is_frozen_after_submit() {
        let (mut session, _rx) = started(vec![question("a.mp3", 0)]).await;

        session.select(0).unwrap();
        session.submit().unwrap();
        assert!(session.select(1).is_err());
        assert_eq!(session.selection(), Some(0));
    }

    #[tokio::test]
    async fn correct_answer_is_scored_on_reveal() {
        let (mut session, _rx) = started(vec![question("a.mp3", 2), question("b.mp3", 0)]).await;

        session.select(2).unwrap();
        session.submit().unwrap();
        assert!(session.complete_reveal().unwrap());
        assert_eq!(session.correct_answers(), 1);

        assert_eq!(session.advance().unwrap(), Advance::NextQuestion(1));
        assert_eq!(session.phase(), SessionPhase::Answering);
        assert_eq!(session.selection(), None);
    }

    #[tokio::test]
    async fn unanswered_question_scores_as_incorrect() {
        let (mut session, _rx) = started(vec![question("a.mp3", 0)]).await;

        session.submit().unwrap();
        assert!(!session.complete_reveal().unwrap());
        assert_eq!(session.correct_answers(), 0);
    }

    #[tokio::test]
    async fn wrong_last_answer_leaves_tally_and_records_quiz_length() {
        let (mut session, mut rx) =
            started(vec![question("a.mp3", 0), question("b.mp3", 0)]).await;

        // First question answered correctly.
        session.select(0).unwrap();
        session.submit().unwrap();
        session.complete_reveal().unwrap();
        session.advance().unwrap();

        // Last question: answers[2] is wrong.
        session.select(2).unwrap();
        session.submit().unwrap();
        let before = session.correct_answers();
        session.complete_reveal().unwrap();
        assert_eq!(session.correct_answers(), before);

        let outcome = session.advance().unwrap();
        assert_eq!(
            outcome,
            Advance::Finished(FinalTally {
                correct_answers: 1,
                questions_number: 2,
            })
        );
        assert_eq!(session.phase(), SessionPhase::Finished);

        let submitted = rx.recv().await.unwrap();
        assert_eq!(submitted.playlist_id, "123");
        assert_eq!(submitted.user_id, "u1");
        assert_eq!(submitted.correct_answers, 1);
        assert_eq!(submitted.questions_number, 2);
    }

    #[tokio::test]
    async fn session_finishes_even_when_recording_fails() {
        let (rec, mut rx) = recorder(true);
        let mut session = GameSession::start(&FixedQuiz(vec![question("a.mp3", 0)]), rec, "123", "u1", 10)
            .await
            .unwrap();

        session.select(0).unwrap();
        session.submit().unwrap();
        session.complete_reveal().unwrap();

        let outcome = session.advance().unwrap();
        assert!(matches!(outcome, Advance::Finished(_)));
        assert_eq!(session.phase(), SessionPhase::Finished);

        // The submission was still attempted exactly once.
        assert!(rx.recv().await.is_some());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn preview_holds_one_clip_at_a_time() {
        let (mut session, _rx) = started(vec![question("a.mp3", 0), question("b.mp3", 0)]).await;
        assert_eq!(session.preview().loaded(), Some("a.mp3"));

        session.submit().unwrap();
        session.complete_reveal().unwrap();
        session.advance().unwrap();
        assert_eq!(session.preview().loaded(), Some("b.mp3"));

        session.submit().unwrap();
        session.complete_reveal().unwrap();
        session.advance().unwrap();
        assert_eq!(session.preview().loaded(), None);
    }

    #[tokio::test]
    async fn reveal_delay_is_fixed() {
        let (mut session, _rx) = started(vec![question("a.mp3", 0)]).await;
        assert_eq!(session.submit().unwrap(), REVEAL_DELAY);
    }
}
