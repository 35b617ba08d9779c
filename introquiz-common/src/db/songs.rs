//! Song Store queries
//!
//! Read-only at request time. The catalog is written only by [`super::seed`].

use crate::db::models::Song;
use crate::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use std::collections::HashMap;

fn song_from_row(row: &SqliteRow) -> Result<Song> {
    let difficulty: String = row.try_get("difficulty")?;
    let difficulty = difficulty.parse().map_err(|_| {
        Error::Internal(format!("Corrupt difficulty in music table: {:?}", difficulty))
    })?;

    Ok(Song {
        id: row.try_get("music_id")?,
        title: row.try_get("title")?,
        composer: row.try_get("composer")?,
        audio_file: row.try_get("audio_file")?,
        difficulty,
        hint: row.try_get("hint")?,
    })
}

/// Every song, ordered by id
pub async fn all_songs(pool: &SqlitePool) -> Result<Vec<Song>> {
    let rows = sqlx::query(
        "SELECT music_id, title, composer, audio_file, difficulty, hint
         FROM music
         ORDER BY music_id ASC",
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(song_from_row).collect()
}

/// Look up songs by id
///
/// Unknown ids are silently omitted. The map carries no order; callers
/// re-impose their own id order.
pub async fn songs_by_ids(pool: &SqlitePool, ids: &[i64]) -> Result<HashMap<i64, Song>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT music_id, title, composer, audio_file, difficulty, hint
         FROM music
         WHERE music_id IN (",
    );
    let mut separated = query.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");

    let rows = query.build().fetch_all(pool).await?;

    rows.iter()
        .map(|row| song_from_row(row).map(|song| (song.id, song)))
        .collect()
}

/// All song ids, ascending
pub async fn song_ids(pool: &SqlitePool) -> Result<Vec<i64>> {
    let ids = sqlx::query_scalar("SELECT music_id FROM music ORDER BY music_id ASC")
        .fetch_all(pool)
        .await?;

    Ok(ids)
}

/// Number of songs in the catalog
pub async fn count_songs(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM music")
        .fetch_one(pool)
        .await?;

    Ok(count)
}
