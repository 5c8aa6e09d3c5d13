use crate::Database;
use crate::models::{EmojiRow, NewUser, SongRow, Table, UserRow};
use crate::seed;
use anyhow::Result;
use rusqlite::{Connection, ErrorCode, ffi};

impl Database {
    // -- Users --

    /// Insert a user. Returns `None` when the email is already registered.
    pub fn create_user(&self, user: &NewUser<'_>) -> Result<Option<i64>> {
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT INTO users (email, password, age, gender) VALUES (?1, ?2, ?3, ?4)",
                (user.email, user.password_hash, user.age, user.gender),
            );

            match inserted {
                Ok(_) => Ok(Some(conn.last_insert_rowid())),
                Err(e) if is_unique_violation(&e) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_email(conn, email))
    }

    // -- Catalog --

    pub fn list_emojis(&self) -> Result<Vec<EmojiRow>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT emoji_id, description, emoji FROM emojis ORDER BY emoji_id")?;

            let rows = stmt
                .query_map([], |row| {
                    Ok(EmojiRow {
                        emoji_id: row.get(0)?,
                        description: row.get(1)?,
                        emoji: row.get(2)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Songs mapped to an emoji, in store order. An unknown emoji yields an
    /// empty list; duplicate mapping rows yield duplicate songs.
    pub fn songs_for_emoji(&self, emoji_id: i64) -> Result<Vec<SongRow>> {
        self.with_conn(|conn| query_songs_for_emoji(conn, emoji_id))
    }

    pub fn row_count(&self, table: Table) -> Result<i64> {
        self.with_conn(|conn| seed::count_rows(conn, table))
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn query_user_by_email(conn: &Connection, email: &str) -> Result<Option<UserRow>> {
    let mut stmt =
        conn.prepare("SELECT id, email, password, age, gender FROM users WHERE email = ?1")?;

    let row = stmt
        .query_row([email], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                email: row.get(1)?,
                password: row.get(2)?,
                age: row.get(3)?,
                gender: row.get(4)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_songs_for_emoji(conn: &Connection, emoji_id: i64) -> Result<Vec<SongRow>> {
    let mut stmt = conn.prepare(
        "SELECT s.id, s.author, s.movie_name, s.music_producer, s.name, s.singer
         FROM songs s
         JOIN emoji_song_mappings m ON s.id = m.song_id
         WHERE m.emoji_id = ?1",
    )?;

    // Catalog columns are nullable in the schema.
    let text = |row: &rusqlite::Row<'_>, idx: usize| -> rusqlite::Result<String> {
        Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
    };

    let rows = stmt
        .query_map([emoji_id], |row| {
            Ok(SongRow {
                id: row.get(0)?,
                author: text(row, 1)?,
                movie_name: text(row, 2)?,
                music_producer: text(row, 3)?,
                name: text(row, 4)?,
                singer: text(row, 5)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn open_temp() -> (TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("test.db")).unwrap();
        (dir, db)
    }

    fn song_ids(db: &Database, emoji_id: i64) -> BTreeSet<i64> {
        db.songs_for_emoji(emoji_id).unwrap().into_iter().map(|s| s.id).collect()
    }

    fn new_user<'a>(email: &'a str, hash: &'a str) -> NewUser<'a> {
        NewUser {
            email,
            password_hash: hash,
            age: Some(30),
            gender: Some("f"),
        }
    }

    #[test]
    fn seeded_emojis_map_to_expected_songs() {
        let (_dir, db) = open_temp();

        assert_eq!(song_ids(&db, 1), BTreeSet::from([4, 1]));
        assert_eq!(song_ids(&db, 2), BTreeSet::from([2, 5]));
        assert_eq!(song_ids(&db, 3), BTreeSet::from([3]));
        assert_eq!(song_ids(&db, 4), BTreeSet::from([2, 4]));
    }

    #[test]
    fn unknown_emoji_has_no_songs() {
        let (_dir, db) = open_temp();
        assert!(db.songs_for_emoji(42).unwrap().is_empty());
        assert!(db.songs_for_emoji(-1).unwrap().is_empty());
    }

    #[test]
    fn duplicate_mappings_surface_as_duplicate_songs() {
        let (_dir, db) = open_temp();
        db.with_conn(|conn| {
            conn.execute("INSERT INTO emoji_song_mappings (emoji_id, song_id) VALUES (3, 3)", [])?;
            Ok(())
        })
        .unwrap();

        let songs = db.songs_for_emoji(3).unwrap();
        assert_eq!(songs.len(), 2);
        assert!(songs.iter().all(|s| s.name == "Rolling in the Deep"));
    }

    #[test]
    fn emojis_listed_in_id_order() {
        let (_dir, db) = open_temp();
        let glyphs: Vec<String> = db.list_emojis().unwrap().into_iter().map(|e| e.emoji).collect();
        assert_eq!(glyphs, ["😊", "😢", "😠", "😍"]);
    }

    #[test]
    fn duplicate_email_is_reported_without_new_row() {
        let (_dir, db) = open_temp();

        let id = db.create_user(&new_user("a@example.com", "h1")).unwrap();
        assert!(id.is_some());

        let dup = db.create_user(&new_user("a@example.com", "h2")).unwrap();
        assert!(dup.is_none());
        assert_eq!(db.row_count(Table::Users).unwrap(), 1);

        let row = db.get_user_by_email("a@example.com").unwrap().unwrap();
        assert_eq!(row.password, "h1");
        assert_eq!(row.age, Some(30));
        assert_eq!(row.gender.as_deref(), Some("f"));
    }

    #[test]
    fn missing_user_is_none() {
        let (_dir, db) = open_temp();
        assert!(db.get_user_by_email("nobody@example.com").unwrap().is_none());
    }
}
