use std::path::PathBuf;

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use tracing::warn;

/// The secret shipped in `.env.example`; never used to sign sessions.
const PLACEHOLDER_SECRET: &str = "change-me-to-a-random-string";

pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub session_secret: String,
    pub detector_url: Option<String>,
    pub mood_table: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let host = non_empty("EMOTUNE_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = non_empty("EMOTUNE_PORT")
            .unwrap_or_else(|| "5000".into())
            .parse()
            .context("EMOTUNE_PORT must be a port number")?;
        let db_path = non_empty("EMOTUNE_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(emotune_db::default_db_path);

        let session_secret = match non_empty("EMOTUNE_SESSION_SECRET") {
            Some(secret) if secret == PLACEHOLDER_SECRET => {
                warn!(
                    "EMOTUNE_SESSION_SECRET is still the example placeholder; using a random secret instead"
                );
                random_secret()
            }
            Some(secret) => secret,
            None => {
                warn!("EMOTUNE_SESSION_SECRET is unset; sessions will not survive a restart");
                random_secret()
            }
        };

        Ok(Self {
            host,
            port,
            db_path,
            session_secret,
            detector_url: non_empty("EMOTUNE_DETECTOR_URL"),
            mood_table: non_empty("EMOTUNE_MOOD_TABLE").map(PathBuf::from),
        })
    }
}

fn random_secret() -> String {
    B64.encode(rand::random::<[u8; 32]>())
}
