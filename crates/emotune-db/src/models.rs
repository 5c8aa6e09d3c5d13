//! Database row types — these map directly to SQLite rows.
//! Distinct from emotune-types models so the password hash stays in this layer.

use emotune_types::models::{Emoji, Song, User};

pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub password: String,
    pub age: Option<i64>,
    pub gender: Option<String>,
}

pub struct EmojiRow {
    pub emoji_id: i64,
    pub description: String,
    pub emoji: String,
}

pub struct SongRow {
    pub id: i64,
    pub author: String,
    pub movie_name: String,
    pub music_producer: String,
    pub name: String,
    pub singer: String,
}

/// New account data; `password_hash` must already be hashed.
pub struct NewUser<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub age: Option<i64>,
    pub gender: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Users,
    Emojis,
    Songs,
    EmojiSongMappings,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::Users => "users",
            Table::Emojis => "emojis",
            Table::Songs => "songs",
            Table::EmojiSongMappings => "emoji_song_mappings",
        }
    }
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            age: row.age,
            gender: row.gender,
        }
    }
}

impl From<EmojiRow> for Emoji {
    fn from(row: EmojiRow) -> Self {
        Self {
            id: row.emoji_id,
            description: row.description,
            glyph: row.emoji,
        }
    }
}

impl From<SongRow> for Song {
    fn from(row: SongRow) -> Self {
        Self {
            id: row.id,
            author: row.author,
            movie_name: row.movie_name,
            music_producer: row.music_producer,
            name: row.name,
            singer: row.singer,
        }
    }
}
