//! Database models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Difficulty label attached to each song
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            other => Err(Error::InvalidInput(format!("Unknown difficulty: {:?}", other))),
        }
    }
}

/// One catalog entry as stored in the `music` table
///
/// Serialized with the `music_id` key the quiz page expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    #[serde(rename = "music_id")]
    pub id: i64,
    pub title: String,
    pub composer: String,
    pub audio_file: String,
    pub difficulty: Difficulty,
    pub hint: Option<String>,
}

/// Song row before insertion (no id assigned yet)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSong {
    pub title: String,
    pub composer: String,
    pub audio_file: String,
    pub difficulty: Difficulty,
    pub hint: Option<String>,
}

impl NewSong {
    pub fn new(
        title: impl Into<String>,
        composer: impl Into<String>,
        audio_file: impl Into<String>,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            title: title.into(),
            composer: composer.into(),
            audio_file: audio_file.into(),
            difficulty,
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_song_json_shape() {
        let song = Song {
            id: 3,
            title: "You and Me".to_string(),
            composer: "しゃろう".to_string(),
            audio_file: "audio/0003.mp3".to_string(),
            difficulty: Difficulty::Normal,
            hint: None,
        };

        let json = serde_json::to_value(&song).unwrap();
        assert_eq!(json["music_id"], 3);
        assert_eq!(json["difficulty"], "normal");
        assert!(json["hint"].is_null());
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_difficulty_parsing() {
        assert_eq!("Hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!(" easy ".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert!(matches!(
            "extreme".parse::<Difficulty>(),
            Err(Error::InvalidInput(_))
        ));
    }
}
