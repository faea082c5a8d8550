//! Image format sniffing.
//!
//! The catalog stores images as opaque bytes; the only processing anywhere
//! is detecting the format from the bytes, so both the CLI (before
//! attaching) and the server (before storing) agree on what is accepted.

use std::io::Cursor;

use image::{ImageFormat, ImageReader};

/// Allowed image formats for recipe photos.
pub const ALLOWED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// Maximum image size (5MB).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Validate image data: check the format is allowed and detect the content
/// type. Returns the content type on success (e.g. "image/jpeg").
pub fn validate_image(data: &[u8]) -> Result<String, String> {
    if data.len() > MAX_IMAGE_BYTES {
        return Err(format!(
            "Image too large: {} bytes (max {})",
            data.len(),
            MAX_IMAGE_BYTES
        ));
    }

    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| format!("Failed to read image: {}", e))?;

    let format = reader
        .format()
        .ok_or_else(|| "Could not detect image format".to_string())?;

    if !ALLOWED_FORMATS.contains(&format) {
        return Err(format!(
            "Unsupported image format: {:?}. Allowed: JPEG, PNG, GIF, WebP",
            format
        ));
    }

    Ok(format.to_mime_type().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Smallest valid PNG header: signature + IHDR chunk start.
    const PNG_MAGIC: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52,
    ];

    #[test]
    fn png_bytes_are_detected() {
        assert_eq!(validate_image(PNG_MAGIC).unwrap(), "image/png");
    }

    #[test]
    fn arbitrary_bytes_are_rejected() {
        assert!(validate_image(b"not an image").is_err());
    }

    #[test]
    fn oversized_data_is_rejected() {
        let data = vec![0u8; MAX_IMAGE_BYTES + 1];
        let err = validate_image(&data).unwrap_err();
        assert!(err.contains("too large"));
    }
}
