use crate::api::caption::error::CaptionError;
use base64::{Engine as _, engine::general_purpose};
use color_eyre::eyre::eyre;
use fast_image_resize as fr;
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageReader};
use std::io::Cursor;
use tokio::task;

/// Image ready to be sent to the vision backend.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    /// JPEG encoded, RGB, longest side within the configured bound.
    pub jpeg: Vec<u8>,
    /// `(width, height)` before downscaling.
    pub original_size: (u32, u32),
}

/// Decodes an inline payload, dropping a `data:<mime>;base64,` header if present.
///
/// Line-wrapped payloads are accepted, ASCII whitespace is ignored.
pub fn decode_base64_image(payload: &str) -> Result<Vec<u8>, CaptionError> {
    let encoded = payload.split_once(',').map_or(payload, |(_, data)| data);
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    Ok(general_purpose::STANDARD.decode(compact)?)
}

/// Size after fitting the longest side into `max_dimension`, keeping the aspect ratio.
#[must_use]
pub fn target_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_dimension {
        return (width, height);
    }
    let ratio = f64::from(max_dimension) / f64::from(longest);
    let scale = |side: u32| ((f64::from(side) * ratio) as u32).max(1);
    if width >= height {
        (max_dimension, scale(height))
    } else {
        (scale(width), max_dimension)
    }
}

/// Decodes any supported format, flattens it to RGB, downsamples with Lanczos3
/// when it exceeds `max_dimension` and re-encodes it as JPEG.
pub fn normalize_image(
    bytes: &[u8],
    max_dimension: u32,
    quality: u8,
) -> Result<NormalizedImage, CaptionError> {
    let img = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| CaptionError::Decode(e.to_string()))?
        .decode()
        .map_err(|e| CaptionError::Decode(e.to_string()))?;

    let (width, height) = (img.width(), img.height());
    // Alpha and palette images become plain three channel RGB.
    let rgb = img.into_rgb8();
    let (dst_width, dst_height) = target_dimensions(width, height, max_dimension);

    let pixels = if (dst_width, dst_height) == (width, height) {
        rgb.into_raw()
    } else {
        let src_image =
            fr::images::Image::from_vec_u8(width, height, rgb.into_raw(), fr::PixelType::U8x3)
                .map_err(|e| eyre!("Resize source error: {e}"))?;
        let mut dst_image = fr::images::Image::new(dst_width, dst_height, fr::PixelType::U8x3);
        let options = fr::ResizeOptions::new()
            .resize_alg(fr::ResizeAlg::Convolution(fr::FilterType::Lanczos3));
        fr::Resizer::new()
            .resize(&src_image, &mut dst_image, &options)
            .map_err(|e| eyre!("Resizing failed: {e}"))?;
        dst_image.into_vec()
    };

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, quality)
        .encode(&pixels, dst_width, dst_height, ExtendedColorType::Rgb8)
        .map_err(|e| eyre!("JPEG encoding failed: {e}"))?;

    Ok(NormalizedImage {
        jpeg,
        original_size: (width, height),
    })
}

/// [`normalize_image`] on the blocking pool.
pub async fn normalize_image_blocking(
    bytes: Vec<u8>,
    max_dimension: u32,
    quality: u8,
) -> Result<NormalizedImage, CaptionError> {
    task::spawn_blocking(move || normalize_image(&bytes, max_dimension, quality)).await?
}

#[cfg(test)]
mod tests {
    use super::*;
    use color_eyre::eyre::Result;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

    fn png_bytes(img: &DynamicImage) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)?;
        Ok(out)
    }

    fn rgba_png(width: u32, height: u32) -> Result<Vec<u8>> {
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 30, 30, 120]));
        png_bytes(&DynamicImage::ImageRgba8(img))
    }

    #[test]
    fn large_image_is_downscaled() -> Result<()> {
        let normalized = normalize_image(&rgba_png(2048, 1024)?, 1024, 85)?;
        assert_eq!(normalized.original_size, (2048, 1024));

        let out = image::load_from_memory_with_format(&normalized.jpeg, ImageFormat::Jpeg)?;
        assert_eq!((out.width(), out.height()), (1024, 512));
        assert!(!out.color().has_alpha());
        assert_eq!(out.color().channel_count(), 3);
        Ok(())
    }

    #[test]
    fn portrait_image_keeps_aspect_ratio() -> Result<()> {
        let normalized = normalize_image(&rgba_png(300, 1500)?, 1024, 85)?;
        let out = image::load_from_memory(&normalized.jpeg)?;
        assert_eq!((out.width(), out.height()), (204, 1024));
        Ok(())
    }

    #[test]
    fn small_image_keeps_its_size() -> Result<()> {
        let normalized = normalize_image(&rgba_png(64, 48)?, 1024, 85)?;
        let out = image::load_from_memory(&normalized.jpeg)?;
        assert_eq!((out.width(), out.height()), (64, 48));
        assert_eq!(normalized.original_size, (64, 48));
        Ok(())
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let result = normalize_image(b"definitely not an image", 1024, 85);
        assert!(matches!(result, Err(CaptionError::Decode(_))));
    }

    #[test]
    fn target_dimensions_bounds() {
        assert_eq!(target_dimensions(1024, 1024, 1024), (1024, 1024));
        assert_eq!(target_dimensions(3000, 2000, 1024), (1024, 682));
        assert_eq!(target_dimensions(5000, 1, 1024), (1024, 1));
        for (w, h) in [(1025, 10), (4000, 3000), (777, 2049)] {
            let (tw, th) = target_dimensions(w, h, 1024);
            assert!(tw <= 1024 && th <= 1024);
            assert_eq!(tw.max(th), 1024);
        }
    }

    #[test]
    fn data_uri_header_is_stripped() -> Result<()> {
        let png = rgba_png(4, 4)?;
        let encoded = general_purpose::STANDARD.encode(&png);

        assert_eq!(decode_base64_image(&encoded)?, png);
        assert_eq!(decode_base64_image(&format!("data:image/png;base64,{encoded}"))?, png);
        Ok(())
    }

    #[test]
    fn line_wrapped_payload_is_decoded() -> Result<()> {
        let png = rgba_png(16, 16)?;
        let encoded = general_purpose::STANDARD.encode(&png);
        let wrapped = encoded
            .as_bytes()
            .chunks(76)
            .map(|line| String::from_utf8_lossy(line).into_owned())
            .collect::<Vec<_>>()
            .join("\r\n");
        assert!(wrapped.contains('\n'));

        let payload = format!("data:image/png;base64,\n{wrapped}\n");
        assert_eq!(decode_base64_image(&payload)?, png);
        assert_eq!(normalize_image(&decode_base64_image(&payload)?, 1024, 85)?.original_size, (16, 16));
        Ok(())
    }

    #[test]
    fn invalid_base64_is_a_decode_error() {
        assert!(matches!(
            decode_base64_image("data:image/png;base64,@@@@"),
            Err(CaptionError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn normalizes_on_blocking_pool() -> Result<()> {
        let normalized = normalize_image_blocking(rgba_png(1500, 1500)?, 1024, 85).await?;
        let out = image::load_from_memory(&normalized.jpeg)?;
        assert_eq!((out.width(), out.height()), (1024, 1024));
        Ok(())
    }
}
