use std::borrow::Cow;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use image::{ImageFormat, RgbImage};
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use emotune_types::models::Mood;

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("Image payload is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Image payload could not be decoded: {0}")]
    InvalidImage(#[from] image::ImageError),

    #[error("Emotion classifier failed: {0}")]
    Classifier(anyhow::Error),
}

/// A single decoded camera frame. Clones share the pixel buffer.
#[derive(Clone)]
pub struct ImageFrame {
    image: Arc<RgbImage>,
}

impl ImageFrame {
    pub fn new(image: RgbImage) -> Self {
        Self {
            image: Arc::new(image),
        }
    }

    /// Decode a `data:image/...;base64,` URL (or bare base64) into a frame.
    /// ASCII whitespace inside the base64 text is ignored.
    ///
    /// CPU-bound for camera-sized frames; async callers should run it on
    /// the blocking pool.
    pub fn from_data_url(payload: &str) -> Result<Self, DetectError> {
        let encoded = payload.split_once(',').map_or(payload, |(_, data)| data);
        let encoded: Cow<'_, str> = if encoded.bytes().any(|b| b.is_ascii_whitespace()) {
            Cow::Owned(encoded.split_ascii_whitespace().collect())
        } else {
            Cow::Borrowed(encoded)
        };
        let bytes = B64.decode(encoded.as_bytes())?;
        let image = image::load_from_memory(&bytes)?.to_rgb8();
        Ok(Self::new(image))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        self.image
            .write_to(&mut buf, ImageFormat::Png)
            .context("Failed to encode frame as PNG")?;
        Ok(buf.into_inner())
    }
}

/// One detected face: emotion label → confidence.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FaceEmotions {
    #[serde(rename = "box", default)]
    pub bounding_box: Vec<i64>,
    pub emotions: BTreeMap<String, f32>,
}

/// Boundary to an external facial-emotion classifier.
#[async_trait]
pub trait EmotionDetector: Send + Sync {
    async fn detect(&self, frame: &ImageFrame) -> Result<Vec<FaceEmotions>>;
}

/// The highest-scoring emotion of the first face, or neutral when no
/// face was found. Ties keep the first label.
pub fn dominant_mood(faces: &[FaceEmotions]) -> Mood {
    faces
        .first()
        .and_then(|face| {
            face.emotions
                .iter()
                .reduce(|best, cur| if cur.1 > best.1 { cur } else { best })
        })
        .map_or(Mood::Neutral, |(label, _)| Mood::from_emotion_label(label))
}

pub async fn detect_mood(
    detector: &dyn EmotionDetector,
    frame: &ImageFrame,
) -> Result<Mood, DetectError> {
    let faces = detector.detect(frame).await.map_err(DetectError::Classifier)?;
    let mood = dominant_mood(&faces);
    debug!(
        "{} face(s) in {}x{} frame, mood {}",
        faces.len(),
        frame.width(),
        frame.height(),
        mood
    );
    Ok(mood)
}

/// Used when no classifier is configured: never finds a face.
pub struct NoFaceDetector;

#[async_trait]
impl EmotionDetector for NoFaceDetector {
    async fn detect(&self, _frame: &ImageFrame) -> Result<Vec<FaceEmotions>> {
        Ok(vec![])
    }
}

/// Posts the frame as PNG to a FER-style HTTP service which answers with
/// `[{"box": [x, y, w, h], "emotions": {"happy": 0.93, ...}}]`.
pub struct HttpEmotionDetector {
    client: reqwest::Client,
    url: String,
}

impl HttpEmotionDetector {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl EmotionDetector for HttpEmotionDetector {
    async fn detect(&self, frame: &ImageFrame) -> Result<Vec<FaceEmotions>> {
        // PNG encoding is CPU-bound
        let frame = frame.clone();
        let body = tokio::task::spawn_blocking(move || frame.to_png())
            .await
            .context("PNG encoding task failed")??;

        let faces = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "image/png")
            .body(body)
            .send()
            .await
            .with_context(|| format!("Classifier at {} unreachable", self.url))?
            .error_for_status()?
            .json::<Vec<FaceEmotions>>()
            .await
            .context("Classifier returned malformed JSON")?;

        Ok(faces)
    }
}
