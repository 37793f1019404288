//! Quiz generation: turns a persisted playlist into an ephemeral sequence of
//! multiple-choice questions.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::{
    dao::models::SongEntity,
    dto::game::{AnswerDto, QuestionDto},
    error::ServiceError,
    services::playlist_service,
    state::SharedState,
};

/// One answer option of a generated question.
#[derive(Debug, Clone)]
pub struct Answer {
    /// Title shown to the player.
    pub title: String,
    /// Whether this option names the target song.
    pub is_correct: bool,
}

/// One generated question. Questions are never persisted or replayed.
#[derive(Debug, Clone)]
pub struct Question {
    /// The song to recognize.
    pub song: SongEntity,
    /// Shuffled answer options, exactly one of which is correct.
    pub answers: Vec<Answer>,
}

/// Generate a quiz for a playlist the user is allowed to play.
///
/// The shuffle is freshly seeded on every call, so two requests for the same
/// playlist produce different quizzes.
pub async fn generate_quiz(
    state: &SharedState,
    playlist_id: &str,
    user_id: &str,
    count: usize,
) -> Result<Vec<QuestionDto>, ServiceError> {
    let (_, songs) = playlist_service::authorized_playlist(state, playlist_id, user_id).await?;

    let questions = generate(&songs, count, &mut rand::rng());
    Ok(questions.into_iter().map(Into::into).collect())
}

/// Build `min(count, songs.len())` questions over the given songs.
///
/// Targets are sampled without replacement so no song is asked twice in one
/// quiz. Each question pairs the target with up to three incorrect options
/// drawn from the other songs; playlists with fewer than four songs simply
/// yield fewer options.
pub fn generate<R: Rng + ?Sized>(
    songs: &[SongEntity],
    count: usize,
    rng: &mut R,
) -> Vec<Question> {
    let effective = count.min(songs.len());
    if effective == 0 {
        return Vec::new();
    }

    let mut targets: Vec<&SongEntity> = songs.iter().collect();
    targets.shuffle(rng);
    targets.truncate(effective);

    targets
        .into_iter()
        .map(|target| {
            let mut pool: Vec<&SongEntity> =
                songs.iter().filter(|song| song.id != target.id).collect();
            pool.shuffle(rng);

            let mut answers: Vec<Answer> = pool
                .into_iter()
                .take(3)
                .map(|song| Answer {
                    title: song.title.clone(),
                    is_correct: false,
                })
                .collect();
            answers.push(Answer {
                title: target.title.clone(),
                is_correct: true,
            });
            answers.shuffle(rng);

            Question {
                song: target.clone(),
                answers,
            }
        })
        .collect()
}

impl From<Answer> for AnswerDto {
    fn from(answer: Answer) -> Self {
        Self {
            title: answer.title,
            is_correct: answer.is_correct,
        }
    }
}

impl From<Question> for QuestionDto {
    fn from(question: Question) -> Self {
        Self {
            song: question.song.into(),
            answers: question.answers.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexSet;
    use rand::{SeedableRng, rngs::StdRng};
    use std::collections::HashSet;

    fn songs(count: usize) -> Vec<SongEntity> {
        (0..count)
            .map(|index| SongEntity {
                id: format!("song-{index}"),
                title: format!("Title {index}"),
                artist: "Artist".into(),
                cover: String::new(),
                preview: String::new(),
                playlists: IndexSet::new(),
            })
            .collect()
    }

    #[test]
    fn question_count_and_answer_shape() {
        let songs = songs(8);
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let quiz = generate(&songs, 5, &mut rng);

            assert_eq!(quiz.len(), 5);
            for question in &quiz {
                assert_eq!(question.answers.len(), 4);
                assert_eq!(
                    question.answers.iter().filter(|a| a.is_correct).count(),
                    1,
                    "exactly one correct answer"
                );
            }
        }
    }

    #[test]
    fn targets_are_sampled_without_replacement() {
        let songs = songs(10);
        let mut rng = StdRng::seed_from_u64(7);
        let quiz = generate(&songs, 10, &mut rng);

        let target_ids: HashSet<&str> = quiz.iter().map(|q| q.song.id.as_str()).collect();
        assert_eq!(target_ids.len(), quiz.len());
    }

    #[test]
    fn incorrect_options_never_include_the_target() {
        let songs = songs(6);
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            for question in generate(&songs, 6, &mut rng) {
                let wrong_titles: Vec<&str> = question
                    .answers
                    .iter()
                    .filter(|a| !a.is_correct)
                    .map(|a| a.title.as_str())
                    .collect();
                // Titles are unique in this fixture, so a title match would
                // mean the target leaked into its own incorrect pool.
                assert!(!wrong_titles.contains(&question.song.title.as_str()));
            }
        }
    }

    #[test]
    fn request_larger_than_playlist_is_capped() {
        let songs = songs(4);
        let mut rng = StdRng::seed_from_u64(3);
        let quiz = generate(&songs, 10, &mut rng);

        assert_eq!(quiz.len(), 4);
        let target_ids: HashSet<&str> = quiz.iter().map(|q| q.song.id.as_str()).collect();
        assert_eq!(
            target_ids,
            HashSet::from(["song-0", "song-1", "song-2", "song-3"])
        );
    }

    #[test]
    fn empty_playlist_yields_empty_quiz() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate(&[], 10, &mut rng).is_empty());
    }

    #[test]
    fn degenerate_playlist_yields_short_answer_lists() {
        let songs = songs(2);
        let mut rng = StdRng::seed_from_u64(5);
        let quiz = generate(&songs, 2, &mut rng);

        for question in quiz {
            assert_eq!(question.answers.len(), 2);
            assert_eq!(question.answers.iter().filter(|a| a.is_correct).count(), 1);
        }
    }
}
