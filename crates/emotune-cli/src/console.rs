use std::io::{BufRead, Write};

use anyhow::Result;
use thiserror::Error;
use tracing::error;

use emotune_core::accounts::{self, LoginError, Signup, SignupError};
use emotune_db::Database;
use emotune_types::models::{Emoji, Song, User};

/// Raised by `prompt` when stdin is exhausted; ends the session cleanly.
#[derive(Debug, Error)]
#[error("input closed")]
struct InputClosed;

const COLUMN: usize = 20;

/// The interactive menu loop over any line-based input and output.
pub struct Console<'a, R, W> {
    db: &'a Database,
    input: R,
    out: W,
}

impl<'a, R: BufRead, W: Write> Console<'a, R, W> {
    pub fn new(db: &'a Database, input: R, out: W) -> Self {
        Self { db, input, out }
    }

    pub fn run(mut self) -> Result<()> {
        writeln!(self.out, "\nWelcome to the Emoji-Based Music Recommender!")?;

        match self.main_menu() {
            Err(e) if e.is::<InputClosed>() => {
                writeln!(self.out, "\nGoodbye!")?;
                Ok(())
            }
            other => other,
        }
    }

    fn main_menu(&mut self) -> Result<()> {
        loop {
            writeln!(self.out, "\nMain Menu:")?;
            writeln!(self.out, "1. Sign Up")?;
            writeln!(self.out, "2. Log In")?;
            writeln!(self.out, "3. Exit")?;

            match self.prompt("Select an option: ")?.trim() {
                "1" => self.sign_up()?,
                "2" => {
                    if self.log_in()?.is_some() {
                        self.user_menu()?;
                    }
                }
                "3" => {
                    writeln!(self.out, "Goodbye!")?;
                    return Ok(());
                }
                _ => writeln!(self.out, "Invalid choice. Please try again.")?,
            }
        }
    }

    fn user_menu(&mut self) -> Result<()> {
        loop {
            writeln!(self.out, "\nChoose an action:")?;
            writeln!(self.out, "1. Get song recommendations by emoji")?;
            writeln!(self.out, "2. Log out")?;

            match self.prompt("Select an option: ")?.trim() {
                "1" => self.show_recommendations()?,
                "2" => return Ok(()),
                _ => writeln!(self.out, "Invalid choice. Please try again.")?,
            }
        }
    }

    fn sign_up(&mut self) -> Result<()> {
        let email = self.prompt("Enter email: ")?.trim().to_string();
        let password = loop {
            let password = self.prompt("Enter password: ")?;
            let confirm = self.prompt("Confirm password: ")?;
            if password == confirm {
                break password;
            }
            writeln!(self.out, "Passwords do not match. Please try again.")?;
        };
        let age = self.prompt("Enter age (optional): ")?;
        let gender = self.prompt("Enter gender (optional): ")?;

        let result = accounts::sign_up(
            self.db,
            &Signup {
                email: &email,
                password: &password,
                confirm_password: None,
                age: Some(&age),
                gender: Some(&gender),
            },
        );

        match result {
            Ok(_) => writeln!(self.out, "Signup successful. You can now log in.")?,
            Err(SignupError::EmailTaken) => writeln!(
                self.out,
                "A user with this email already exists. Please try another email."
            )?,
            Err(e) => {
                error!("Signup failed: {:#}", e);
                writeln!(self.out, "Signup failed: {}", e)?;
            }
        }
        Ok(())
    }

    fn log_in(&mut self) -> Result<Option<User>> {
        let email = self.prompt("Enter email: ")?;
        let password = self.prompt("Enter password: ")?;

        match accounts::log_in(self.db, &email, &password) {
            Ok(user) => {
                writeln!(self.out, "Login successful. Welcome, {}!", user.email)?;
                Ok(Some(user))
            }
            Err(LoginError::InvalidCredentials) => {
                writeln!(self.out, "Login failed. Invalid credentials.")?;
                Ok(None)
            }
            Err(LoginError::Internal(e)) => Err(e),
        }
    }

    fn show_recommendations(&mut self) -> Result<()> {
        let emojis: Vec<Emoji> = self.db.list_emojis()?.into_iter().map(Emoji::from).collect();
        writeln!(self.out, "\nAvailable Emojis:")?;
        writeln!(self.out, "ID  | Emoji | Description")?;
        writeln!(self.out, "----+-------+------------")?;
        for emoji in &emojis {
            writeln!(self.out, "{:>2}  | {}    | {}", emoji.id, emoji.glyph, emoji.description)?;
        }

        let choice = self.prompt("\nEnter the ID of the emoji you feel like: ")?;
        let Some(emoji_id) = parse_emoji_id(&choice) else {
            writeln!(self.out, "Invalid input. Please enter a numeric emoji ID.")?;
            return Ok(());
        };

        let songs: Vec<Song> = self
            .db
            .songs_for_emoji(emoji_id)?
            .into_iter()
            .map(Song::from)
            .collect();

        if songs.is_empty() {
            writeln!(self.out, "No songs found for the selected emoji.")?;
            return Ok(());
        }

        writeln!(self.out, "\nRecommended Songs:")?;
        writeln!(
            self.out,
            "ID  | Song Name            | Singer               | Author/Producer"
        )?;
        writeln!(
            self.out,
            "----+----------------------+----------------------+----------------------"
        )?;
        for song in &songs {
            writeln!(
                self.out,
                "{:>2}  | {:<w$} | {:<w$} | {:<w$}",
                song.id,
                clip(&song.name),
                clip(&song.singer),
                clip(&song.author),
                w = COLUMN
            )?;
        }
        Ok(())
    }

    fn prompt(&mut self, message: &str) -> Result<String> {
        write!(self.out, "{}", message)?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(InputClosed.into());
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Digits only; anything else (signs, spaces inside, overflow) is rejected.
fn parse_emoji_id(input: &str) -> Option<i64> {
    let input = input.trim();
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    input.parse().ok()
}

fn clip(text: &str) -> String {
    text.chars().take(COLUMN).collect()
}
