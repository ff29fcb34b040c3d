// src/services/image_processor.rs
use base64::{Engine as _, engine::general_purpose};
use image::ImageFormat;

const FALLBACK_MIME: &str = "application/octet-stream";

pub struct ImageProcessor;

impl ImageProcessor {
    pub fn new() -> Self {
        Self
    }

    /// MIME type for the uploaded image. A declared `image/*` content type
    /// wins; otherwise the bytes are sniffed.
    pub fn mime_type(&self, declared: Option<&str>, data: &[u8]) -> String {
        if let Some(declared) = declared.filter(|ct| ct.starts_with("image/")) {
            return declared.to_string();
        }

        match image::guess_format(data) {
            Ok(format) => format_mime(format).to_string(),
            Err(_) => FALLBACK_MIME.to_string(),
        }
    }

    /// `data:` URI the client can render without a second request.
    pub fn to_data_uri(&self, mime: &str, data: &[u8]) -> String {
        format!(
            "data:{};base64,{}",
            mime,
            general_purpose::STANDARD.encode(data)
        )
    }
}

impl Default for ImageProcessor {
    fn default() -> Self {
        Self::new()
    }
}

fn format_mime(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "image/png",
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::Gif => "image/gif",
        ImageFormat::WebP => "image/webp",
        ImageFormat::Bmp => "image/bmp",
        ImageFormat::Tiff => "image/tiff",
        ImageFormat::Avif => "image/avif",
        _ => FALLBACK_MIME,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
    const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10];

    #[test]
    fn declared_image_type_is_kept() {
        let processor = ImageProcessor::new();
        assert_eq!(processor.mime_type(Some("image/jpeg"), b"xx"), "image/jpeg");
    }

    #[test]
    fn sniffs_when_type_is_generic() {
        let processor = ImageProcessor::new();
        assert_eq!(
            processor.mime_type(Some("application/octet-stream"), PNG_MAGIC),
            "image/png"
        );
        assert_eq!(processor.mime_type(None, JPEG_MAGIC), "image/jpeg");
    }

    #[test]
    fn unknown_bytes_fall_back() {
        let processor = ImageProcessor::new();
        assert_eq!(processor.mime_type(None, b"hello"), FALLBACK_MIME);
    }

    #[test]
    fn data_uri_is_base64() {
        let processor = ImageProcessor::new();
        assert_eq!(
            processor.to_data_uri("image/png", &[0, 1, 2]),
            "data:image/png;base64,AAEC"
        );
    }
}
