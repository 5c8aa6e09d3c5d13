mod console;

use std::path::PathBuf;

use clap::Parser;

use crate::console::Console;

/// Emoji-based music recommender: sign up, log in, pick an emoji, get songs.
#[derive(Parser)]
#[command(name = "emotune-cli")]
#[command(version)]
struct Args {
    /// SQLite database file (defaults to emotune.db next to the executable)
    #[arg(long, env = "EMOTUNE_DB_PATH")]
    db: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    // Logs go to stderr so they never interleave with the menu
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let args = Args::parse();
    let db_path = args.db.unwrap_or_else(emotune_db::default_db_path);
    let db = emotune_db::Database::open(&db_path)?;

    let stdin = std::io::stdin().lock();
    let stdout = std::io::stdout().lock();
    Console::new(&db, stdin, stdout).run()
}
