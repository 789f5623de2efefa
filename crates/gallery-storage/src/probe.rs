//! Image inspection for providers that do not measure uploads themselves.

use std::io::Cursor;

use bytes::Bytes;
use image::{ImageFormat, ImageReader};

use gallery_core::error::{AppError, ErrorKind};
use gallery_core::result::AppResult;

/// Dimensions and format read from an image header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
    /// Lower-case format name.
    pub format: String,
}

/// Read dimensions and format without decoding the full image.
pub fn probe_image(data: &[u8]) -> AppResult<ImageInfo> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| AppError::with_source(ErrorKind::InvalidFileType, "Unreadable image", e))?;

    let format = reader
        .format()
        .ok_or_else(|| AppError::invalid_file_type("Unrecognized image format"))?;

    let (width, height) = reader.into_dimensions().map_err(|e| {
        AppError::with_source(ErrorKind::InvalidFileType, "Corrupt image header", e)
    })?;

    Ok(ImageInfo {
        width,
        height,
        format: format_name(format),
    })
}

/// Probe on the blocking pool so large headers never stall the runtime.
pub async fn probe_image_blocking(data: Bytes) -> AppResult<ImageInfo> {
    tokio::task::spawn_blocking(move || probe_image(&data))
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Image probe task panicked", e))?
}

fn format_name(format: ImageFormat) -> String {
    match format {
        ImageFormat::Png => "png".to_string(),
        ImageFormat::Jpeg => "jpeg".to_string(),
        ImageFormat::Gif => "gif".to_string(),
        ImageFormat::WebP => "webp".to_string(),
        ImageFormat::Bmp => "bmp".to_string(),
        other => other
            .extensions_str()
            .first()
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unknown".to_string()),
    }
}

/// Encode a solid-colour PNG of the given size. Handy for fixtures.
pub fn solid_png(width: u32, height: u32) -> AppResult<Bytes> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 120, 40]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to encode PNG", e))?;
    Ok(Bytes::from(out.into_inner()))
}
