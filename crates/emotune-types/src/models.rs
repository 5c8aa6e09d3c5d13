use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The five mood keys every recommendation is indexed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Sad,
    Angry,
    Neutral,
    Surprise,
}

impl Mood {
    pub const ALL: [Mood; 5] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Angry,
        Mood::Neutral,
        Mood::Surprise,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Angry => "angry",
            Mood::Neutral => "neutral",
            Mood::Surprise => "surprise",
        }
    }

    /// Map an emoji glyph picked on the recommend page to a mood.
    /// Anything unrecognised is neutral.
    pub fn from_emoji(glyph: &str) -> Mood {
        match glyph {
            "😊" => Mood::Happy,
            "😢" => Mood::Sad,
            "😡" => Mood::Angry,
            "😲" => Mood::Surprise,
            "🙂" => Mood::Neutral,
            _ => Mood::Neutral,
        }
    }

    /// Map a classifier emotion label to a mood.
    ///
    /// Face classifiers usually report seven labels; `fear` and `disgust`
    /// have no song list of their own and fold into the closest mood.
    pub fn from_emotion_label(label: &str) -> Mood {
        match label.to_ascii_lowercase().as_str() {
            "happy" => Mood::Happy,
            "sad" => Mood::Sad,
            "angry" | "disgust" => Mood::Angry,
            "surprise" | "fear" => Mood::Surprise,
            _ => Mood::Neutral,
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMood(pub String);

impl fmt::Display for UnknownMood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown mood '{}'", self.0)
    }
}

impl std::error::Error for UnknownMood {}

impl FromStr for Mood {
    type Err = UnknownMood;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownMood(s.to_string()))
    }
}

/// One entry of a mood's song list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodSong {
    pub name: String,
    pub singer: String,
    pub spotify_url: String,
}

/// A registered account. The password hash never leaves the db layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub age: Option<i64>,
    pub gender: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emoji {
    pub id: i64,
    pub description: String,
    pub glyph: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    pub id: i64,
    pub author: String,
    pub movie_name: String,
    pub music_producer: String,
    pub name: String,
    pub singer: String,
}
