//! Image loader - decodes source images into pixel buffers.
//!
//! Art layers are decoded to grayscale+alpha and metadata layers to RGBA,
//! whatever the colour type stored in the file. All images of a run must
//! share one size, a multiple of the tile size in both directions.

use std::path::Path;

use crate::error::{BakeError, Result};
use crate::types::{PixelBuffer, TILE_SIZE};

use super::scanner::{InputKind, SourceImage};

/// A decoded source image.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub source: SourceImage,
    pub buffer: PixelBuffer,
}

fn decode_error(path: &Path, e: image::ImageError) -> BakeError {
    match e {
        image::ImageError::IoError(io) => BakeError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read image: {}", io),
        },
        other => BakeError::Decode {
            path: path.to_path_buf(),
            message: other.to_string(),
        },
    }
}

/// Decode one image in the pixel format of its layer kind.
pub fn load_image(source: &SourceImage) -> Result<LoadedImage> {
    let image = image::open(&source.path).map_err(|e| decode_error(&source.path, e))?;
    let buffer = match source.kind {
        InputKind::Art => PixelBuffer::from_gray_alpha(image.to_luma_alpha8()),
        InputKind::Metadata => PixelBuffer::from_rgba(image.to_rgba8()),
    };
    check_tile_multiple(&source.path, &buffer)?;
    Ok(LoadedImage {
        source: source.clone(),
        buffer,
    })
}

fn check_tile_multiple(path: &Path, buffer: &PixelBuffer) -> Result<()> {
    for (axis, size) in [("width", buffer.width()), ("height", buffer.height())] {
        if size == 0 || size % TILE_SIZE != 0 {
            return Err(BakeError::Dimension {
                path: path.to_path_buf(),
                message: format!("{} ({}) is not a multiple of {}", axis, size, TILE_SIZE),
                help: Some(format!(
                    "Pad the image to a multiple of {} pixels",
                    TILE_SIZE
                )),
            });
        }
    }
    Ok(())
}

/// Check that every image matches the size of the first one.
pub fn check_uniform_size(images: &[LoadedImage]) -> Result<()> {
    let Some(first) = images.first() else {
        return Ok(());
    };
    let expected = (first.buffer.width(), first.buffer.height());
    for image in &images[1..] {
        let actual = (image.buffer.width(), image.buffer.height());
        if actual != expected {
            return Err(BakeError::Dimension {
                path: image.source.path.clone(),
                message: format!(
                    "input image sizes are not uniform: expected {}x{}, got {}x{}",
                    expected.0, expected.1, actual.0, actual.1
                ),
                help: Some(format!(
                    "All layers must match {}",
                    first.source.path.display()
                )),
            });
        }
    }
    Ok(())
}

/// Decode all sources in order, stopping at the first failure.
pub fn load_images(sources: &[SourceImage]) -> Result<Vec<LoadedImage>> {
    let images = sources
        .iter()
        .map(load_image)
        .collect::<Result<Vec<_>>>()?;
    check_uniform_size(&images)?;
    Ok(images)
}
