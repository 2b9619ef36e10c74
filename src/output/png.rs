use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageFormat};

use crate::cli::CompressionLevel;
use crate::error::SlicerError;

/// Save an image as PNG in its own color type, optionally recompressed with
/// oxipng. Float images, which PNG cannot hold, are written as 16-bit.
pub fn save_png(
    image: &DynamicImage,
    path: &Path,
    compress: Option<CompressionLevel>,
) -> Result<(), SlicerError> {
    let widened;
    let image = match image {
        DynamicImage::ImageRgb32F(_) => {
            widened = DynamicImage::ImageRgb16(image.to_rgb16());
            &widened
        }
        DynamicImage::ImageRgba32F(_) => {
            widened = DynamicImage::ImageRgba16(image.to_rgba16());
            &widened
        }
        _ => image,
    };

    // Encode to PNG in memory
    let mut png_data = Cursor::new(Vec::new());
    image
        .write_to(&mut png_data, ImageFormat::Png)
        .map_err(|e| SlicerError::ImageSave {
            path: path.to_path_buf(),
            source: e,
        })?;

    let output_data = if let Some(level) = compress {
        let opts = match level {
            CompressionLevel::Level(n) => oxipng::Options::from_preset(n),
            CompressionLevel::Max => oxipng::Options::max_compression(),
        };
        oxipng::optimize_from_memory(&png_data.into_inner(), &opts).map_err(|e| {
            SlicerError::PngCompress {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?
    } else {
        png_data.into_inner()
    };

    fs::write(path, output_data).map_err(|e| SlicerError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
