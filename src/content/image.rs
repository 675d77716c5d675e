use anyhow::{Context, Result};
use base64::Engine as _;

const DEFAULT_MIME: &str = "image/jpeg";

/// Decoded image bytes plus their MIME type.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageRef {
    mime: String,
    bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageRef")
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageRef {
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
        }
    }

    /// Decode either a bare base64 payload (assumed JPEG, as bot photos are)
    /// or a full `data:<mime>;base64,<payload>` URI.
    pub fn from_base64(payload: &str) -> Result<Self> {
        let payload = payload.trim();
        if let Some(rest) = payload.strip_prefix("data:") {
            let (header, data) = rest
                .split_once(',')
                .context("Data URI has no payload separator")?;
            let mime = header
                .strip_suffix(";base64")
                .context("Only base64 data URIs are supported")?;
            let mime = if mime.is_empty() { DEFAULT_MIME } else { mime };
            return Ok(Self::new(mime, decode(data)?));
        }

        Ok(Self::new(DEFAULT_MIME, decode(payload)?))
    }

    /// Guess the MIME type from a file extension. Returns `None` for anything
    /// that is not a common image format.
    pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some("image/jpeg"),
            "png" => Some("image/png"),
            "gif" => Some("image/gif"),
            "webp" => Some("image/webp"),
            "bmp" => Some("image/bmp"),
            _ => None,
        }
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

fn decode(data: &str) -> Result<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(data.trim())
        .context("Invalid base64 image payload")
}
