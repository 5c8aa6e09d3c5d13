use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use rand::Rng;
use rand::seq::IndexedRandom;
use thiserror::Error;

use emotune_types::models::{Mood, MoodSong};

/// Songs returned per recommendation.
pub const SAMPLE_SIZE: usize = 4;
/// Songs every mood must carry.
pub const SONGS_PER_MOOD: usize = 10;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("mood table has no entry for '{0}'")]
    MissingMood(Mood),

    #[error("mood '{mood}' has {count} songs, expected {expected}", expected = SONGS_PER_MOOD)]
    WrongSize { mood: Mood, count: usize },

    #[error("unknown mood key '{0}' in mood table")]
    UnknownMood(String),

    #[error(transparent)]
    Load(#[from] anyhow::Error),
}

/// Immutable mood → song list table, built once at startup.
#[derive(Debug, Clone)]
pub struct MoodCatalog {
    songs: BTreeMap<Mood, Vec<MoodSong>>,
}

impl MoodCatalog {
    /// Validate and wrap a table: every mood present with exactly ten songs.
    pub fn new(songs: BTreeMap<Mood, Vec<MoodSong>>) -> Result<Self, CatalogError> {
        for mood in Mood::ALL {
            let list = songs.get(&mood).ok_or(CatalogError::MissingMood(mood))?;
            if list.len() != SONGS_PER_MOOD {
                return Err(CatalogError::WrongSize {
                    mood,
                    count: list.len(),
                });
            }
        }
        Ok(Self { songs })
    }

    /// Load a table from JSON shaped like `{"happy": [{"name", "singer", "spotify_url"}, ...], ...}`.
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read mood table {}", path.display()))?;
        let parsed: BTreeMap<String, Vec<MoodSong>> = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid mood table JSON in {}", path.display()))?;

        let mut songs = BTreeMap::new();
        for (key, list) in parsed {
            let mood: Mood = key.parse().map_err(|_| CatalogError::UnknownMood(key))?;
            songs.insert(mood, list);
        }
        Self::new(songs)
    }

    pub fn songs(&self, mood: Mood) -> &[MoodSong] {
        self.songs.get(&mood).map(Vec::as_slice).unwrap_or_default()
    }

    /// Pick `SAMPLE_SIZE` distinct songs for a mood, in random order.
    pub fn sample<R: Rng + ?Sized>(&self, mood: Mood, rng: &mut R) -> Vec<MoodSong> {
        self.songs(mood)
            .choose_multiple(rng, SAMPLE_SIZE)
            .cloned()
            .collect()
    }
}

impl Default for MoodCatalog {
    fn default() -> Self {
        let songs = DEFAULT_TABLE
            .iter()
            .map(|(mood, list)| {
                let list: Vec<MoodSong> = list
                    .iter()
                    .map(|(name, singer, track)| MoodSong {
                        name: name.to_string(),
                        singer: singer.to_string(),
                        spotify_url: format!("https://open.spotify.com/track/{}", track),
                    })
                    .collect();
                (*mood, list)
            })
            .collect();
        Self { songs }
    }
}

type Entry = (&'static str, &'static str, &'static str);

/// (name, singer, spotify track id)
const DEFAULT_TABLE: [(Mood, [Entry; SONGS_PER_MOOD]); 5] = [
    (Mood::Happy, [
        ("Happy", "Pharrell Williams", "60nZcImufyMA1MKQY3dcCH"),
        ("Uptown Funk", "Bruno Mars", "32OlwWuMpZ6b0aN2RZOeMS"),
        ("Can’t Stop the Feeling", "Justin Timberlake", "6JV2JOEocMgcZxYSZelKcc"),
        ("Good Life", "OneRepublic", "6OtCIsQZ64Vs1EbzztvAv4"),
        ("Shake It Off", "Taylor Swift", "5xTtaWoae3wi06K5WfVUUH"),
        ("I Gotta Feeling", "Black Eyed Peas", "4bHsxqR3GMrXTxEPLuK5ue"),
        ("On Top of the World", "Imagine Dragons", "6KuHjfXHkfnIjdmcIvt9r0"),
        ("Best Day of My Life", "American Authors", "5Hroj5K7vLpIG4FNCRIjbP"),
        ("Sugar", "Maroon 5", "494OU6M7NOf4ICYb4zWCf5"),
        ("Firework", "Katy Perry", "4jCj0C5eaM3yTQpYJ1dHzT"),
    ]),
    (Mood::Sad, [
        ("Someone Like You", "Adele", "4kflIGfjdZJW4ot2ioixTB"),
        ("Let Her Go", "Passenger", "2jyjhRf6DVbMPU5zxagN2h"),
        ("Fix You", "Coldplay", "7LVHVU3tWfcxj5aiPFEW4Q"),
        ("Stay With Me", "Sam Smith", "3jjujdWJ72nww5eGnfs2E7"),
        ("When I Was Your Man", "Bruno Mars", "0nJW01T7XtvILxQgC5J7Wh"),
        ("All I Want", "Kodaline", "0MlTOiC5ZYKFGeZ8h3D4rd"),
        ("Say Something", "A Great Big World", "2aBxt229cbLDOvtL7Xbb9x"),
        ("The Night We Met", "Lord Huron", "0sQLhU6sAuQG2iJQyF4kOx"),
        ("Jealous", "Labrinth", "3dT4hzxwPjKYQxDq2AvivO"),
        ("With or Without You", "U2", "5J4PZby3pi0wfQWmVHg6Y7"),
    ]),
    (Mood::Angry, [
        ("In The End", "Linkin Park", "60a0Rd6pjrkxjPbaKzXjfq"),
        ("Break Stuff", "Limp Bizkit", "5UoFrZbjWKQUn0KPLWgwhT"),
        ("Killing In The Name", "RATM", "4u7EnebtmKWzUH433cf5Qv"),
        ("Smells Like Teen Spirit", "Nirvana", "5ghIJDpPoe3CfHMGu71E6T"),
        ("Duality", "Slipknot", "6QgjcU0zLnzq5OrUoSZ3OK"),
        ("Down With The Sickness", "Disturbed", "2DlHlPMa4M17kufBvI2lEN"),
        ("Enter Sandman", "Metallica", "5sICkBXVmaCQk5aISGR3x1"),
        ("Bulls on Parade", "RATM", "4oN6KR2hAm5JTYo5kxv8aD"),
        ("Bodies", "Drowning Pool", "5r6Vi8ghsl7W95Y0UHMgCy"),
        ("Faint", "Linkin Park", "5w3slHyJp3ihX5mymXy4pM"),
    ]),
    (Mood::Neutral, [
        ("Shape of You", "Ed Sheeran", "7qiZfU4dY1lWllzX7mPBI3"),
        ("Counting Stars", "OneRepublic", "2tpWsVSb9UEmDRxAl1zhX1"),
        ("Rolling in the Deep", "Adele", "4OSBTYWVwsQhGLF9NHvIbR"),
        ("Perfect", "Ed Sheeran", "0tgVpDi06FyKpA1z0VMD4v"),
        ("Photograph", "Ed Sheeran", "1HNkqx9Ahdgi1Ixy2xkKkL"),
        ("Hall of Fame", "The Script", "0jQpzzUwC8FrQ1Z21aWztN"),
        ("Cheap Thrills", "Sia", "4pNApnaUWAL2J4KO2eqokq"),
        ("Stay", "Rihanna", "2gZUPNdnz5Y45eiGxpHGSc"),
        ("A Sky Full of Stars", "Coldplay", "2sSyjEshk5U1S4nTbB4ShJ"),
        ("Memories", "Maroon 5", "2NmsngXHeC1GQ9wWrzhOMf"),
    ]),
    (Mood::Surprise, [
        ("Believer", "Imagine Dragons", "0pqnGHJpmpxLKifKRmU6WP"),
        ("Thunder", "Imagine Dragons", "1zB4vmk8tFRmM9UULNzbLB"),
        ("Stronger", "Kanye West", "5D4cdSZ6f3j2cGl9LJZNlU"),
        ("Titanium", "David Guetta", "45wXjjX9g4BTQoyKp7jGxm"),
        ("Wake Me Up", "Avicii", "0nrRP2bk19rLc0orkWPQk2"),
        ("Fireflies", "Owl City", "2VxeLyX666F8uXCJ0dZF8B"),
        ("Radioactive", "Imagine Dragons", "4G8gkOterJn0Ywt6uhqbhp"),
        ("We Found Love", "Rihanna", "4KBeYlgkHhGXlDUl9RrY5e"),
        ("On The Floor", "Jennifer Lopez", "2KsP6tYLJlTBvSUxnwlVWa"),
        ("Stronger (What Doesn’t Kill You)", "Kelly Clarkson", "7o7E1r7hMaS8mx3v0xkhOm"),
    ]),
];
