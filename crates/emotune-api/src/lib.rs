pub mod auth;
pub mod error;
pub mod middleware;
pub mod pages;
pub mod recommend;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    middleware as axum_middleware,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;

use crate::auth::AppState;

/// Camera frames arrive base64-encoded inside JSON.
const DETECT_BODY_LIMIT: usize = 16 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(landing))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/emoji_recommend", post(recommend::emoji_recommend))
        .route(
            "/detect_mood",
            post(recommend::detect_mood).layer(DefaultBodyLimit::max(DETECT_BODY_LIMIT)),
        )
        .route("/health", get(health))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/recommend", get(recommend::recommend_page))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_session,
        ))
        .with_state(state);

    Router::new().merge(public_routes).merge(protected_routes)
}

async fn landing(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let logged_in = middleware::session_claims(&jar, &state.session_secret).is_some();
    pages::landing(logged_in)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
