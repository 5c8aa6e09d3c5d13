//! Router-level tests: signup/login/session flow and the JSON recommendation endpoints.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use emotune_api::auth::AppStateInner;
use emotune_core::detector::{EmotionDetector, FaceEmotions, ImageFrame};
use emotune_core::mood::MoodCatalog;
use emotune_db::Database;
use emotune_types::models::Mood;

/// Reports a single face whose dominant emotion is the given label.
struct OneFace(&'static str);

#[async_trait]
impl EmotionDetector for OneFace {
    async fn detect(&self, _frame: &ImageFrame) -> anyhow::Result<Vec<FaceEmotions>> {
        let mut emotions = std::collections::BTreeMap::new();
        emotions.insert(self.0.to_string(), 0.9);
        emotions.insert("neutral".to_string(), 0.05);
        Ok(vec![FaceEmotions {
            bounding_box: vec![0, 0, 8, 8],
            emotions,
        }])
    }
}

/// A classifier that is configured but cannot answer.
struct BrokenDetector;

#[async_trait]
impl EmotionDetector for BrokenDetector {
    async fn detect(&self, _frame: &ImageFrame) -> anyhow::Result<Vec<FaceEmotions>> {
        anyhow::bail!("classifier offline")
    }
}

struct Harness {
    _dir: TempDir,
    app: axum::Router,
}

fn setup(detector: Box<dyn EmotionDetector>) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(&dir.path().join("web.db")).unwrap();
    let state = Arc::new(AppStateInner {
        db,
        catalog: MoodCatalog::default(),
        detector,
        session_secret: "test-secret".into(),
    });
    Harness {
        _dir: dir,
        app: emotune_api::router(state),
    }
}

async fn send(app: &axum::Router, req: Request<Body>) -> axum::response::Response {
    app.clone().oneshot(req).await.unwrap()
}

fn form(path: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(path: &str, cookie: Option<&str>) -> Request<Body> {
    let mut req = Request::builder().uri(path);
    if let Some(cookie) = cookie {
        req = req.header(header::COOKIE, cookie);
    }
    req.body(Body::empty()).unwrap()
}

async fn post_json(app: &axum::Router, path: &str, body: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = send(app, req).await;
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn location(resp: &axum::response::Response) -> &str {
    resp.headers()[header::LOCATION].to_str().unwrap()
}

/// `name=value` of a Set-Cookie header with the given name.
fn set_cookie(resp: &axum::response::Response, name: &str) -> Option<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or_default().to_string())
        .find(|pair| pair.starts_with(&format!("{name}=")))
}

async fn body_text(resp: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn png_data_url() -> String {
    png_data_url_of(8, 8)
}

fn png_data_url_of(width: u32, height: u32) -> String {
    let frame = ImageFrame::new(image::RgbImage::new(width, height));
    format!("data:image/png;base64,{}", B64.encode(frame.to_png().unwrap()))
}

fn assert_four_distinct_of(catalog: &MoodCatalog, mood: Mood, body: &Value) {
    assert_eq!(body["mood"], mood.as_str());
    let songs = body["songs"].as_array().unwrap();
    assert_eq!(songs.len(), 4);

    let names: HashSet<&str> = songs.iter().map(|s| s["name"].as_str().unwrap()).collect();
    assert_eq!(names.len(), 4);
    for name in names {
        assert!(catalog.songs(mood).iter().any(|s| s.name == name));
    }
}

const SIGNUP: &str = "email=ana%40example.com&password=pw&confirm_password=pw&age=31&gender=";

#[tokio::test]
async fn signup_login_and_session_gate() {
    let h = setup(Box::new(OneFace("happy")));

    let resp = send(&h.app, form("/signup", SIGNUP)).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
    assert_eq!(set_cookie(&resp, "flash").as_deref(), Some("flash=signup_ok"));

    let resp = send(&h.app, form("/login", "email=ana%40example.com&password=pw")).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/recommend");
    let session = set_cookie(&resp, "session").expect("session cookie");

    let resp = send(&h.app, get("/recommend", Some(&session))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("ana@example.com"));
}

#[tokio::test]
async fn recommend_requires_session() {
    let h = setup(Box::new(OneFace("happy")));

    let resp = send(&h.app, get("/recommend", None)).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");

    let resp = send(&h.app, get("/recommend", Some("session=not-a-jwt"))).await;
    assert_eq!(location(&resp), "/login");
}

#[tokio::test]
async fn wrong_password_flashes_generic_error() {
    let h = setup(Box::new(OneFace("happy")));
    send(&h.app, form("/signup", SIGNUP)).await;

    let resp = send(&h.app, form("/login", "email=ana%40example.com&password=nope")).await;
    assert_eq!(location(&resp), "/login");
    assert!(set_cookie(&resp, "session").is_none());
    assert_eq!(set_cookie(&resp, "flash").as_deref(), Some("flash=bad_credentials"));

    // The flash is rendered once on the login page.
    let resp = send(&h.app, get("/login", Some("flash=bad_credentials"))).await;
    assert!(body_text(resp).await.contains("Invalid email or password"));
}

#[tokio::test]
async fn duplicate_signup_is_flashed() {
    let h = setup(Box::new(OneFace("happy")));
    send(&h.app, form("/signup", SIGNUP)).await;

    let resp = send(&h.app, form("/signup", SIGNUP)).await;
    assert_eq!(location(&resp), "/signup");
    assert_eq!(set_cookie(&resp, "flash").as_deref(), Some("flash=email_taken"));
}

#[tokio::test]
async fn logout_clears_session() {
    let h = setup(Box::new(OneFace("happy")));

    send(&h.app, form("/signup", SIGNUP)).await;
    let resp = send(&h.app, form("/login", "email=ana%40example.com&password=pw")).await;
    let session = set_cookie(&resp, "session").unwrap();

    let resp = send(&h.app, get("/logout", Some(&session))).await;
    assert_eq!(location(&resp), "/login");
    assert_eq!(set_cookie(&resp, "session").as_deref(), Some("session="));
    assert_eq!(set_cookie(&resp, "flash").as_deref(), Some("flash=logged_out"));
}

#[tokio::test]
async fn smiling_emoji_is_happy() {
    let h = setup(Box::new(OneFace("happy")));
    let catalog = MoodCatalog::default();

    let (status, body) = post_json(&h.app, "/emoji_recommend", json!({ "emoji": "😊" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_four_distinct_of(&catalog, Mood::Happy, &body);
}

#[tokio::test]
async fn unmapped_or_missing_emoji_is_neutral() {
    let h = setup(Box::new(OneFace("happy")));
    let catalog = MoodCatalog::default();

    let (_, body) = post_json(&h.app, "/emoji_recommend", json!({ "emoji": "🦀" })).await;
    assert_four_distinct_of(&catalog, Mood::Neutral, &body);

    let (_, body) = post_json(&h.app, "/emoji_recommend", json!({})).await;
    assert_four_distinct_of(&catalog, Mood::Neutral, &body);
}

#[tokio::test]
async fn every_mood_yields_four_distinct_songs() {
    let catalog = MoodCatalog::default();
    let cases = [
        ("😊", "happy", Mood::Happy),
        ("😢", "sad", Mood::Sad),
        ("😡", "angry", Mood::Angry),
        ("🙂", "neutral", Mood::Neutral),
        ("😲", "surprise", Mood::Surprise),
    ];

    for (glyph, label, mood) in cases {
        let h = setup(Box::new(OneFace(label)));

        let (_, body) = post_json(&h.app, "/emoji_recommend", json!({ "emoji": glyph })).await;
        assert_four_distinct_of(&catalog, mood, &body);

        let (status, body) =
            post_json(&h.app, "/detect_mood", json!({ "image": png_data_url() })).await;
        assert_eq!(status, StatusCode::OK);
        assert_four_distinct_of(&catalog, mood, &body);
    }
}

#[tokio::test]
async fn bad_image_returns_json_error() {
    let h = setup(Box::new(OneFace("happy")));

    let (status, body) =
        post_json(&h.app, "/detect_mood", json!({ "image": "data:image/png;base64,@@@" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("base64"));

    let (status, body) = post_json(&h.app, "/detect_mood", json!({ "picture": "x" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn classifier_failure_returns_bad_gateway() {
    let h = setup(Box::new(BrokenDetector));

    let (status, body) =
        post_json(&h.app, "/detect_mood", json!({ "image": png_data_url() })).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("classifier offline"));
}

#[tokio::test]
async fn large_frame_decode_leaves_runtime_responsive() {
    let h = setup(Box::new(OneFace("sad")));
    let image = png_data_url_of(2000, 2000);

    let stop = Arc::new(AtomicBool::new(false));
    let ticker = tokio::spawn({
        let stop = stop.clone();
        async move {
            let mut longest = Duration::ZERO;
            let mut last = Instant::now();
            while !stop.load(Ordering::Relaxed) {
                tokio::time::sleep(Duration::from_millis(1)).await;
                let now = Instant::now();
                longest = longest.max(now - last);
                last = now;
            }
            longest
        }
    });
    tokio::task::yield_now().await;

    let (status, body) = post_json(&h.app, "/detect_mood", json!({ "image": image })).await;
    stop.store(true, Ordering::Relaxed);
    let longest = ticker.await.unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mood"], "sad");
    assert!(longest < Duration::from_millis(250), "runtime stalled for {longest:?}");
}

#[tokio::test]
async fn health_is_ok() {
    let h = setup(Box::new(OneFace("happy")));
    let resp = send(&h.app, get("/health", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
