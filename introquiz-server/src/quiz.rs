//! Quiz Session Service
//!
//! Picks one correct song the session has not been asked yet, adds up to
//! three random distractors, and shuffles them. Also stores and scores the
//! two-player result for a session.
//!
//! Selection loads every id and draws in process. Fine for a catalog of
//! this size; not intended for very large catalogs.

use introquiz_common::db::songs::{song_ids, songs_by_ids};
use introquiz_common::db::Song;
use introquiz_common::{Error, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::HashSet;
use tracing::debug;

use crate::session::{ScoreRecord, SessionId, SessionStore};

/// Distractors per question when the catalog is large enough
pub const DISTRACTOR_COUNT: usize = 3;

/// Message returned when every song has been asked
pub const NO_SONGS_LEFT: &str = "No available songs left.";

/// One question: the answer plus shuffled choices that contain it once
#[derive(Debug, Clone, Serialize)]
pub struct QuizQuestion {
    pub correct_answer: Song,
    pub choices: Vec<Song>,
}

/// Scores plus the derived winner label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameResult {
    #[serde(rename = "player1Score")]
    pub player1_score: i64,
    #[serde(rename = "player2Score")]
    pub player2_score: i64,
    pub winner: &'static str,
}

/// Choose the correct id and the distractor ids
///
/// Distractors are drawn from every id except the correct one; `exclude`
/// is only applied to the correct answer. Returns `None` when `exclude`
/// covers the whole catalog.
pub fn pick_question_ids<R: Rng + ?Sized>(
    all_ids: &[i64],
    exclude: &HashSet<i64>,
    rng: &mut R,
) -> Option<(i64, Vec<i64>)> {
    let eligible: Vec<i64> = all_ids
        .iter()
        .copied()
        .filter(|id| !exclude.contains(id))
        .collect();
    let correct = *eligible.choose(rng)?;

    let others: Vec<i64> = all_ids.iter().copied().filter(|id| *id != correct).collect();
    let distractors = others
        .choose_multiple(rng, DISTRACTOR_COUNT)
        .copied()
        .collect();

    Some((correct, distractors))
}

/// Build the next question for a session
///
/// `exclude` holds the ids already asked; it is supplied by the caller on
/// every call and never remembered here.
pub async fn next_question<R: Rng + ?Sized + Send>(
    pool: &SqlitePool,
    exclude: &HashSet<i64>,
    rng: &mut R,
) -> Result<QuizQuestion> {
    let all_ids = song_ids(pool).await?;

    let (correct_id, distractor_ids) = pick_question_ids(&all_ids, exclude, rng)
        .ok_or_else(|| Error::NotFound(NO_SONGS_LEFT.to_string()))?;

    let mut wanted = distractor_ids.clone();
    wanted.push(correct_id);
    let mut songs = songs_by_ids(pool, &wanted).await?;

    // Removed between the two queries
    let correct_answer = songs
        .get(&correct_id)
        .cloned()
        .ok_or_else(|| Error::NotFound(NO_SONGS_LEFT.to_string()))?;

    let mut choices: Vec<Song> = distractor_ids
        .iter()
        .filter_map(|id| songs.remove(id))
        .collect();
    choices.push(correct_answer.clone());
    choices.shuffle(rng);

    debug!(
        "Question: answer {} among {} choices ({} excluded)",
        correct_answer.id,
        choices.len(),
        exclude.len()
    );

    Ok(QuizQuestion {
        correct_answer,
        choices,
    })
}

/// Store a session's scores, replacing anything submitted before
pub fn submit_scores(
    sessions: &SessionStore,
    session_id: SessionId,
    player1_score: i64,
    player2_score: i64,
) {
    sessions.put(
        session_id,
        ScoreRecord {
            player1_score,
            player2_score,
        },
    );
}

/// Winner label for a pair of scores
pub fn winner_label(record: &ScoreRecord) -> &'static str {
    use std::cmp::Ordering;

    match record.player1_score.cmp(&record.player2_score) {
        Ordering::Greater => "player 1 wins",
        Ordering::Less => "player 2 wins",
        Ordering::Equal => "tie",
    }
}

/// Last submitted scores for a session (0/0 when nothing was submitted)
pub fn compute_result(sessions: &SessionStore, session_id: SessionId) -> GameResult {
    let record = sessions.get(session_id).unwrap_or_default();

    GameResult {
        player1_score: record.player1_score,
        player2_score: record.player2_score,
        winner: winner_label(&record),
    }
}
