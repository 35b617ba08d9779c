//! Catalog seeding
//!
//! Replaces the whole `music` table with either the built-in sample list
//! or the rows of a CSV file. Runs at deployment setup, never while serving.

use crate::db::models::{Difficulty, NewSong};
use crate::{Error, Result};
use serde::Deserialize;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::{debug, info};

/// Built-in sample catalog
pub fn sample_catalog() -> Vec<NewSong> {
    [
        ("2:23 AM", "audio/0001.mp3"),
        ("10℃", "audio/0002.mp3"),
        ("You and Me", "audio/0003.mp3"),
        ("Cassette Tape Dream", "audio/0004.mp3"),
        ("極東の羊、テレキャスターと踊る", "audio/0005.mp3"),
        ("サンタは中央線でやってくる", "audio/0006.mp3"),
        ("野良猫は宇宙を目指した", "audio/0007.mp3"),
    ]
    .into_iter()
    .map(|(title, audio_file)| NewSong::new(title, "しゃろう", audio_file, Difficulty::Normal))
    .collect()
}

/// One CSV row: `title,composer,audio_file,difficulty[,hint]`
#[derive(Debug, Deserialize)]
struct CsvRow {
    title: String,
    composer: String,
    audio_file: String,
    difficulty: String,
    #[serde(default)]
    hint: Option<String>,
}

/// Read a catalog from a CSV file with a header row
pub fn load_csv(path: &Path) -> Result<Vec<NewSong>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;

    let mut songs = Vec::new();
    for (index, record) in reader.deserialize::<CsvRow>().enumerate() {
        // Header is line 1
        let line = index + 2;
        let row = record?;

        if row.title.is_empty() || row.composer.is_empty() || row.audio_file.is_empty() {
            return Err(Error::InvalidInput(format!(
                "{} line {}: title, composer and audio_file are required",
                path.display(),
                line
            )));
        }

        let difficulty: Difficulty = row
            .difficulty
            .parse()
            .map_err(|e| Error::InvalidInput(format!("{} line {}: {}", path.display(), line, e)))?;

        songs.push(NewSong {
            title: row.title,
            composer: row.composer,
            audio_file: row.audio_file,
            difficulty,
            hint: row.hint.filter(|h| !h.is_empty()),
        });
    }

    debug!("Read {} songs from {}", songs.len(), path.display());
    Ok(songs)
}

/// Replace the entire catalog in one transaction
///
/// Ids restart at 1. On failure nothing changes.
pub async fn replace_catalog(pool: &SqlitePool, songs: &[NewSong]) -> Result<usize> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM music").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM sqlite_sequence WHERE name = 'music'")
        .execute(&mut *tx)
        .await?;

    for song in songs {
        sqlx::query(
            "INSERT INTO music (title, composer, audio_file, difficulty, hint)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&song.title)
        .bind(&song.composer)
        .bind(&song.audio_file)
        .bind(song.difficulty.as_str())
        .bind(&song.hint)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    info!("Replaced music catalog with {} songs", songs.len());
    Ok(songs.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init::init_memory_database;
    use crate::db::songs::{all_songs, count_songs};
    use std::io::Write;

    fn csv_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_sample_catalog() {
        let songs = sample_catalog();
        assert_eq!(songs.len(), 7);
        assert!(songs.iter().all(|s| s.difficulty == Difficulty::Normal));
        assert_eq!(songs[6].audio_file, "audio/0007.mp3");
    }

    #[test]
    fn test_load_csv_with_and_without_hint() {
        let file = csv_file(
            "title,composer,audio_file,difficulty,hint\n\
             Song A,Composer A,audio/a.mp3,easy,starts with piano\n\
             Song B,Composer B,audio/b.mp3,HARD,\n",
        );

        let songs = load_csv(file.path()).unwrap();
        assert_eq!(songs.len(), 2);
        assert_eq!(songs[0].hint.as_deref(), Some("starts with piano"));
        assert_eq!(songs[1].difficulty, Difficulty::Hard);
        assert_eq!(songs[1].hint, None);
    }

    #[test]
    fn test_load_csv_without_hint_column() {
        let file = csv_file(
            "title,composer,audio_file,difficulty\n\
             Song A,Composer A,audio/a.mp3,normal\n",
        );

        let songs = load_csv(file.path()).unwrap();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].hint, None);
    }

    #[test]
    fn test_load_csv_rejects_unknown_difficulty() {
        let file = csv_file(
            "title,composer,audio_file,difficulty\n\
             Song A,Composer A,audio/a.mp3,normal\n\
             Song B,Composer B,audio/b.mp3,impossible\n",
        );

        match load_csv(file.path()) {
            Err(Error::InvalidInput(msg)) => assert!(msg.contains("line 3"), "{}", msg),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_replace_catalog_replaces_prior_contents() {
        let pool = init_memory_database().await.unwrap();
        replace_catalog(&pool, &sample_catalog()).await.unwrap();

        let replacement = vec![
            NewSong::new("Only", "Someone", "audio/only.mp3", Difficulty::Easy).with_hint("short"),
        ];
        let inserted = replace_catalog(&pool, &replacement).await.unwrap();
        assert_eq!(inserted, 1);

        let songs = all_songs(&pool).await.unwrap();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].id, 1);
        assert_eq!(songs[0].title, "Only");
        assert_eq!(songs[0].hint.as_deref(), Some("short"));
    }

    #[tokio::test]
    async fn test_replace_catalog_rolls_back_on_duplicate_audio() {
        let pool = init_memory_database().await.unwrap();
        replace_catalog(&pool, &sample_catalog()).await.unwrap();

        let duplicate = vec![
            NewSong::new("A", "X", "audio/same.mp3", Difficulty::Easy),
            NewSong::new("B", "Y", "audio/same.mp3", Difficulty::Easy),
        ];
        assert!(replace_catalog(&pool, &duplicate).await.is_err());

        assert_eq!(count_songs(&pool).await.unwrap(), 7);
    }
}
