use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{error, info};

use emotune_core::detector::{self, ImageFrame};
use emotune_types::api::{
    DetectMoodRequest, EmojiRecommendRequest, RecommendationResponse, SessionClaims,
};
use emotune_types::models::Mood;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::pages;

pub async fn recommend_page(
    Extension(claims): Extension<SessionClaims>,
    jar: CookieJar,
) -> impl IntoResponse {
    let (jar, flash) = pages::take_flash(jar);
    (jar, pages::recommend(&claims.email, flash))
}

/// POST /detect_mood — classify a camera frame, then recommend for its mood.
pub async fn detect_mood(
    State(state): State<AppState>,
    payload: Result<Json<DetectMoodRequest>, JsonRejection>,
) -> Result<Json<RecommendationResponse>, ApiError> {
    let Json(req) = payload?;

    // Base64 and image decoding of a full frame block
    let frame = tokio::task::spawn_blocking(move || ImageFrame::from_data_url(&req.image))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal
        })??;
    let mood = detector::detect_mood(state.detector.as_ref(), &frame).await?;

    info!("Detected mood {}", mood);
    Ok(Json(recommendation(&state, mood)))
}

/// POST /emoji_recommend — unknown or missing emoji falls back to neutral.
pub async fn emoji_recommend(
    State(state): State<AppState>,
    payload: Result<Json<EmojiRecommendRequest>, JsonRejection>,
) -> Result<Json<RecommendationResponse>, ApiError> {
    let Json(req) = payload?;

    let mood = req.emoji.as_deref().map_or(Mood::Neutral, Mood::from_emoji);
    Ok(Json(recommendation(&state, mood)))
}

fn recommendation(state: &AppState, mood: Mood) -> RecommendationResponse {
    RecommendationResponse {
        mood,
        songs: state.catalog.sample(mood, &mut rand::rng()),
    }
}
