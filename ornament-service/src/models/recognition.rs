//! Request payloads for the recognition proxy.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use thiserror::Error;
use validator::Validate;

/// JPEG start-of-image marker followed by the first marker prefix.
const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// Body of `POST /api/recognize`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecognitionRequest {
    /// Base64-encoded JPEG bytes.
    #[validate(length(min = 1, message = "image must not be empty"))]
    pub image: String,
    /// Language hint, one of `kz`, `ru`, `en`.
    #[serde(default)]
    pub lang: Option<String>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ImageError {
    #[error("image is empty")]
    Empty,

    #[error("image is not valid base64: {0}")]
    InvalidBase64(String),

    #[error("image is not a JPEG")]
    NotJpeg,
}

/// A base64 JPEG payload that has been decoded and checked once.
#[derive(Debug, Clone)]
pub struct JpegImage {
    base64: String,
    byte_len: usize,
}

impl JpegImage {
    /// Accepts plain base64 or a `data:image/...;base64,` URI.
    pub fn from_base64(raw: &str) -> Result<Self, ImageError> {
        let trimmed = raw.trim();
        let encoded = match trimmed.strip_prefix("data:") {
            Some(uri) => uri
                .split_once(";base64,")
                .map(|(_, data)| data)
                .ok_or_else(|| ImageError::InvalidBase64("data URI is not base64".to_string()))?,
            None => trimmed,
        };

        if encoded.is_empty() {
            return Err(ImageError::Empty);
        }

        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| ImageError::InvalidBase64(e.to_string()))?;

        if !bytes.starts_with(&JPEG_MAGIC) {
            return Err(ImageError::NotJpeg);
        }

        Ok(Self {
            base64: encoded.to_string(),
            byte_len: bytes.len(),
        })
    }

    pub fn as_base64(&self) -> &str {
        &self.base64
    }

    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    pub fn mime_type(&self) -> &'static str {
        "image/jpeg"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jpeg_b64() -> String {
        STANDARD.encode([0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'])
    }

    #[test]
    fn accepts_plain_base64_jpeg() {
        let image = JpegImage::from_base64(&jpeg_b64()).unwrap();
        assert_eq!(image.byte_len(), 10);
        assert_eq!(image.as_base64(), jpeg_b64());
    }

    #[test]
    fn strips_data_uri_prefix() {
        let uri = format!("data:image/jpeg;base64,{}", jpeg_b64());
        let image = JpegImage::from_base64(&uri).unwrap();
        assert_eq!(image.as_base64(), jpeg_b64());
    }

    #[test]
    fn rejects_png_bytes() {
        let png = STANDARD.encode([0x89, b'P', b'N', b'G', 0x0D, 0x0A]);
        assert_eq!(JpegImage::from_base64(&png).unwrap_err(), ImageError::NotJpeg);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            JpegImage::from_base64("not base64 at all!"),
            Err(ImageError::InvalidBase64(_))
        ));
        assert_eq!(JpegImage::from_base64("   ").unwrap_err(), ImageError::Empty);
    }

    #[test]
    fn empty_image_fails_validation() {
        let request: RecognitionRequest =
            serde_json::from_str(r#"{"image":"","lang":"kz"}"#).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn lang_is_optional() {
        let request: RecognitionRequest = serde_json::from_str(r#"{"image":"abc"}"#).unwrap();
        assert!(request.lang.is_none());
    }
}
