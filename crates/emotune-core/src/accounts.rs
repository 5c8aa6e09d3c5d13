use thiserror::Error;
use tracing::{info, warn};

use emotune_db::Database;
use emotune_db::models::NewUser;
use emotune_types::models::User;

use crate::password::{hash_password, verify_password};

#[derive(Debug, Error)]
pub enum SignupError {
    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("A user with this email already exists")]
    EmailTaken,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum LoginError {
    /// Unknown email and wrong password are deliberately indistinguishable.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Default)]
pub struct Signup<'a> {
    pub email: &'a str,
    pub password: &'a str,
    /// When present it must equal `password`.
    pub confirm_password: Option<&'a str>,
    pub age: Option<&'a str>,
    pub gender: Option<&'a str>,
}

/// Ages are kept only when the input is all digits; anything else is stored as NULL.
pub fn parse_age(input: &str) -> Option<i64> {
    let input = input.trim();
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    input.parse().ok()
}

fn normalize_gender(input: &str) -> Option<&str> {
    Some(input.trim()).filter(|g| !g.is_empty())
}

pub fn sign_up(db: &Database, req: &Signup<'_>) -> Result<User, SignupError> {
    if req.confirm_password.is_some_and(|c| c != req.password) {
        return Err(SignupError::PasswordMismatch);
    }

    let email = req.email.trim();
    let age = req.age.and_then(parse_age);
    let gender = req.gender.and_then(normalize_gender);
    let password_hash = hash_password(req.password)?;

    let id = db
        .create_user(&NewUser {
            email,
            password_hash: &password_hash,
            age,
            gender,
        })?
        .ok_or(SignupError::EmailTaken)?;

    info!("User {} signed up as {}", id, email);
    Ok(User {
        id,
        email: email.to_string(),
        age,
        gender: gender.map(str::to_string),
    })
}

pub fn log_in(db: &Database, email: &str, password: &str) -> Result<User, LoginError> {
    let email = email.trim();

    let Some(row) = db.get_user_by_email(email)? else {
        warn!("Login failed for {}", email);
        return Err(LoginError::InvalidCredentials);
    };

    if !verify_password(password, &row.password)? {
        warn!("Login failed for {}", email);
        return Err(LoginError::InvalidCredentials);
    }

    info!("User {} logged in", row.id);
    Ok(row.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use emotune_db::models::Table;
    use tempfile::TempDir;

    fn open_temp() -> (TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("accounts.db")).unwrap();
        (dir, db)
    }

    fn signup<'a>(email: &'a str, password: &'a str) -> Signup<'a> {
        Signup {
            email,
            password,
            confirm_password: Some(password),
            age: Some("27"),
            gender: Some("  nonbinary "),
        }
    }

    #[test]
    fn signup_then_login_succeeds() {
        let (_dir, db) = open_temp();

        let created = sign_up(&db, &signup("ana@example.com", "pw")).unwrap();
        assert_eq!(created.age, Some(27));
        assert_eq!(created.gender.as_deref(), Some("nonbinary"));

        let user = log_in(&db, "ana@example.com", "pw").unwrap();
        assert_eq!(user, created);
    }

    #[test]
    fn wrong_password_and_unknown_email_fail_alike() {
        let (_dir, db) = open_temp();
        sign_up(&db, &signup("ana@example.com", "pw")).unwrap();

        let wrong = log_in(&db, "ana@example.com", "nope").unwrap_err();
        let unknown = log_in(&db, "bob@example.com", "pw").unwrap_err();
        assert!(matches!(wrong, LoginError::InvalidCredentials));
        assert!(matches!(unknown, LoginError::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[test]
    fn duplicate_email_is_rejected_without_second_row() {
        let (_dir, db) = open_temp();
        sign_up(&db, &signup("ana@example.com", "pw")).unwrap();

        let err = sign_up(&db, &signup("ana@example.com", "other")).unwrap_err();
        assert!(matches!(err, SignupError::EmailTaken));
        assert_eq!(db.row_count(Table::Users).unwrap(), 1);

        // The original password still works.
        assert!(log_in(&db, "ana@example.com", "pw").is_ok());
    }

    #[test]
    fn mismatched_confirmation_creates_nothing() {
        let (_dir, db) = open_temp();
        let req = Signup {
            confirm_password: Some("typo"),
            ..signup("ana@example.com", "pw")
        };

        assert!(matches!(sign_up(&db, &req), Err(SignupError::PasswordMismatch)));
        assert_eq!(db.row_count(Table::Users).unwrap(), 0);
    }

    #[test]
    fn password_is_not_stored_verbatim() {
        let (_dir, db) = open_temp();
        sign_up(&db, &signup("ana@example.com", "pw")).unwrap();

        let row = db.get_user_by_email("ana@example.com").unwrap().unwrap();
        assert_ne!(row.password, "pw");
        assert!(row.password.starts_with("$argon2"));
    }

    #[test]
    fn optional_fields_default_to_null() {
        let (_dir, db) = open_temp();
        let req = Signup {
            age: Some("twenty"),
            gender: Some("   "),
            ..signup("ana@example.com", "pw")
        };

        let user = sign_up(&db, &req).unwrap();
        assert_eq!(user.age, None);
        assert_eq!(user.gender, None);
    }

    #[test]
    fn age_must_be_all_digits() {
        assert_eq!(parse_age("42"), Some(42));
        assert_eq!(parse_age(" 7 "), Some(7));
        assert_eq!(parse_age("-3"), None);
        assert_eq!(parse_age("4.5"), None);
        assert_eq!(parse_age(""), None);
        assert_eq!(parse_age("99999999999999999999999"), None);
    }
}
