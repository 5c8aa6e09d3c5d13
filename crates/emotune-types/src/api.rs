use serde::{Deserialize, Serialize};

use crate::models::{Mood, MoodSong};

// -- Session --

/// JWT claims carried in the session cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: i64,
    pub email: String,
    pub exp: usize,
}

// -- Auth forms --

/// Browsers submit empty inputs as empty strings, so the optional fields
/// are kept raw and interpreted by the account service.
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub confirm_password: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

// -- Recommendations --

#[derive(Debug, Deserialize)]
pub struct EmojiRecommendRequest {
    #[serde(default)]
    pub emoji: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DetectMoodRequest {
    /// A `data:image/...;base64,` URL or bare base64.
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub mood: Mood,
    pub songs: Vec<MoodSong>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
