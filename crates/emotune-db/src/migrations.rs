use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            email       TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            age         INTEGER,
            gender      TEXT
        );

        CREATE TABLE IF NOT EXISTS emojis (
            emoji_id    INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            emoji       TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS songs (
            id              INTEGER PRIMARY KEY,
            author          TEXT,
            movie_name      TEXT,
            music_producer  TEXT,
            name            TEXT,
            singer          TEXT
        );

        -- Many-to-many edge; duplicate pairs are allowed.
        CREATE TABLE IF NOT EXISTS emoji_song_mappings (
            emoji_id    INTEGER REFERENCES emojis(emoji_id),
            song_id     INTEGER REFERENCES songs(id)
        );

        CREATE INDEX IF NOT EXISTS idx_mappings_emoji
            ON emoji_song_mappings(emoji_id);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
