//! Decoded render output.

use std::io::Cursor;

use crate::error::RenderError;

/// A finished raster image with its decoded dimensions.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    /// Encoded image bytes (PNG from both tiers).
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Validate raw renderer output by decoding its dimensions.
///
/// Empty bytes and zero-area images surface as
/// [`RenderError::EmptyOutput`]; undecodable bytes as a capture
/// failure.
pub fn decode_output(bytes: Vec<u8>) -> Result<RenderedImage, RenderError> {
    if bytes.is_empty() {
        return Err(RenderError::EmptyOutput);
    }
    let reader = image::ImageReader::new(Cursor::new(&bytes))
        .with_guessed_format()
        .map_err(|e| RenderError::Capture(format!("Unrecognized image data: {e}")))?;
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| RenderError::Capture(format!("Failed to decode image: {e}")))?;
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyOutput);
    }
    Ok(RenderedImage {
        bytes,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn valid_png_decodes_with_dimensions() {
        let out = decode_output(png_bytes(8, 4)).unwrap();
        assert_eq!((out.width, out.height), (8, 4));
        assert!(!out.bytes.is_empty());
    }

    #[test]
    fn empty_bytes_are_empty_output() {
        assert_matches!(decode_output(Vec::new()), Err(RenderError::EmptyOutput));
    }

    #[test]
    fn garbage_bytes_are_a_capture_failure() {
        assert_matches!(
            decode_output(b"not an image".to_vec()),
            Err(RenderError::Capture(_))
        );
    }
}
