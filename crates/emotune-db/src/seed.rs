use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

use crate::models::Table;

/// (emoji_id, description, glyph)
pub const EMOJIS: &[(i64, &str, &str)] = &[
    (1, "Happy", "😊"),
    (2, "Sad", "😢"),
    (3, "Angry", "😠"),
    (4, "Love", "😍"),
];

/// (id, author, movie_name, music_producer, name, singer)
pub const SONGS: &[(i64, &str, &str, &str, &str, &str)] = &[
    (1, "John Williams", "A New Hope", "London Symphony Orchestra", "Star Wars Theme", "London Symphony Orchestra"),
    (2, "Ludovico Einaudi", "Night", "Decca Records", "Nuvole Bianche", "Ludovico Einaudi"),
    (3, "Adele", "21", "Paul Epworth", "Rolling in the Deep", "Adele"),
    (4, "Pharrell Williams", "Happy", "Pharrell Williams", "Happy", "Pharrell Williams"),
    (5, "Bill Withers", "+", "Bill Withers", "Ain't No Sunshine", "Bill Withers"),
];

/// emoji_id -> song ids
pub const EMOJI_SONGS: &[(i64, &[i64])] = &[
    (1, &[4, 1]),
    (2, &[2, 5]),
    (3, &[3]),
    (4, &[2, 4]),
];

/// Seed each catalog table independently, only when it is empty.
pub fn run(conn: &Connection) -> Result<()> {
    if is_empty(conn, Table::Emojis)? {
        let mut stmt =
            conn.prepare("INSERT INTO emojis (emoji_id, description, emoji) VALUES (?1, ?2, ?3)")?;
        for (id, description, glyph) in EMOJIS {
            stmt.execute((id, description, glyph))?;
        }
        info!("Seeded {} emojis", EMOJIS.len());
    }

    if is_empty(conn, Table::Songs)? {
        let mut stmt = conn.prepare(
            "INSERT INTO songs (id, author, movie_name, music_producer, name, singer)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for song in SONGS {
            stmt.execute(*song)?;
        }
        info!("Seeded {} songs", SONGS.len());
    }

    if is_empty(conn, Table::EmojiSongMappings)? {
        let mut stmt =
            conn.prepare("INSERT INTO emoji_song_mappings (emoji_id, song_id) VALUES (?1, ?2)")?;
        let mut inserted = 0;
        for (emoji_id, song_ids) in EMOJI_SONGS {
            for song_id in *song_ids {
                stmt.execute((emoji_id, song_id))?;
                inserted += 1;
            }
        }
        info!("Seeded {} emoji/song mappings", inserted);
    }

    Ok(())
}

pub(crate) fn count_rows(conn: &Connection, table: Table) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM {}", table.name());
    Ok(conn.query_row(&sql, [], |row| row.get(0))?)
}

fn is_empty(conn: &Connection, table: Table) -> Result<bool> {
    Ok(count_rows(conn, table)? == 0)
}
