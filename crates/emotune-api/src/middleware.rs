use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{DecodingKey, Validation, decode};

use emotune_types::api::SessionClaims;

use crate::auth::AppState;

pub const SESSION_COOKIE: &str = "session";

/// Decode the session cookie, if any. Expired or forged tokens count as absent.
pub fn session_claims(jar: &CookieJar, secret: &str) -> Option<SessionClaims> {
    let token = jar.get(SESSION_COOKIE)?.value();

    decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()
    .map(|data| data.claims)
}

/// Gate a route on a logged-in session; anonymous visitors go to the login page.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    match session_claims(&jar, &state.session_secret) {
        Some(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        None => Redirect::to("/login").into_response(),
    }
}
