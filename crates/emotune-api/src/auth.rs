use std::sync::Arc;

use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::error;

use emotune_core::accounts::{self, LoginError, Signup, SignupError};
use emotune_core::detector::EmotionDetector;
use emotune_core::mood::MoodCatalog;
use emotune_db::Database;
use emotune_types::api::{LoginForm, SessionClaims, SignupForm};
use emotune_types::models::User;

use crate::middleware::SESSION_COOKIE;
use crate::pages::{self, Flash};

pub type AppState = Arc<AppStateInner>;

/// Everything a request handler may touch, built once at startup.
pub struct AppStateInner {
    pub db: Database,
    pub catalog: MoodCatalog,
    pub detector: Box<dyn EmotionDetector>,
    pub session_secret: String,
}

pub async fn signup_page(jar: CookieJar) -> impl IntoResponse {
    let (jar, flash) = pages::take_flash(jar);
    (jar, pages::signup(flash))
}

pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<SignupForm>,
) -> Result<impl IntoResponse, StatusCode> {
    // Argon2 hashing and the insert both block
    let db = state.clone();
    let result = tokio::task::spawn_blocking(move || {
        accounts::sign_up(
            &db.db,
            &Signup {
                email: &form.email,
                password: &form.password,
                confirm_password: form.confirm_password.as_deref(),
                age: form.age.as_deref(),
                gender: form.gender.as_deref(),
            },
        )
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    match result {
        Ok(_) => Ok((pages::set_flash(jar, Flash::SignupOk), Redirect::to("/login"))),
        Err(SignupError::EmailTaken) => {
            Ok((pages::set_flash(jar, Flash::EmailTaken), Redirect::to("/signup")))
        }
        Err(SignupError::PasswordMismatch) => {
            Ok((pages::set_flash(jar, Flash::PasswordMismatch), Redirect::to("/signup")))
        }
        Err(SignupError::Internal(e)) => {
            error!("Signup failed: {:#}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

pub async fn login_page(jar: CookieJar) -> impl IntoResponse {
    let (jar, flash) = pages::take_flash(jar);
    (jar, pages::login(flash))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, StatusCode> {
    let db = state.clone();
    let result =
        tokio::task::spawn_blocking(move || accounts::log_in(&db.db, &form.email, &form.password))
            .await
            .map_err(|e| {
                error!("spawn_blocking join error: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            })?;

    match result {
        Ok(user) => {
            let token = create_token(&state.session_secret, &user)
                .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
            let jar = pages::set_flash(jar.add(session_cookie(token)), Flash::LoginOk);
            Ok((jar, Redirect::to("/recommend")))
        }
        Err(LoginError::InvalidCredentials) => {
            Ok((pages::set_flash(jar, Flash::BadCredentials), Redirect::to("/login")))
        }
        Err(LoginError::Internal(e)) => {
            error!("Login failed: {:#}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (pages::set_flash(jar, Flash::LoggedOut), Redirect::to("/login"))
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

pub(crate) fn create_token(secret: &str, user: &User) -> anyhow::Result<String> {
    let claims = SessionClaims {
        sub: user.id,
        email: user.email.clone(),
        exp: (chrono::Utc::now() + chrono::Duration::days(1)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}
