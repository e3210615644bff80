//! Avatar image transform trait and the `image`-crate implementation

use std::io::Cursor;

use async_trait::async_trait;
use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, GenericImageView};
use log::debug;
use profile_model::{ImageFormat, TransformOptions};
use tokio_util::sync::CancellationToken;

use crate::errors::{TransformError, TransformResult};

/// Compress/resize an uploaded image
///
/// Implementations return [`TransformError::Cancelled`] once `cancel`
/// fires. Work already handed to another thread may finish in the
/// background, but its output is discarded.
#[async_trait]
pub trait ImageTransform: Send + Sync {
    async fn compress(
        &self,
        source: Bytes,
        options: &TransformOptions,
        cancel: CancellationToken,
    ) -> TransformResult<Bytes>;
}

/// Decodes, downsizes and re-encodes on the blocking pool
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateTransform;

#[async_trait]
impl ImageTransform for ImageCrateTransform {
    async fn compress(
        &self,
        source: Bytes,
        options: &TransformOptions,
        cancel: CancellationToken,
    ) -> TransformResult<Bytes> {
        if cancel.is_cancelled() {
            return Err(TransformError::Cancelled);
        }

        let options = *options;
        let job_cancel = cancel.clone();
        let job = tokio::task::spawn_blocking(move || {
            compress_image(&source, &options, &job_cancel)
        });

        tokio::select! {
            _ = cancel.cancelled() => Err(TransformError::Cancelled),
            joined = job => joined.map_err(|e| {
                TransformError::Internal(format!("compression task failed: {e}"))
            })?,
        }
    }
}

/// Synchronous transform: fit within `max_dimension` and re-encode
///
/// `cancel` is checked between the decode, resize and encode steps.
pub fn compress_image(
    source: &[u8],
    options: &TransformOptions,
    cancel: &CancellationToken,
) -> TransformResult<Bytes> {
    ensure_live(cancel)?;
    let img = image::load_from_memory(source)
        .map_err(|e| TransformError::Decode(e.to_string()))?;

    ensure_live(cancel)?;
    let img = fit_within(img, options.max_dimension);

    ensure_live(cancel)?;
    let (width, height) = img.dimensions();
    debug!(
        "Encoding {}x{} avatar as {}",
        width, height, options.output_format
    );

    let mut out = Vec::new();
    match options.output_format {
        ImageFormat::Webp => {
            let rgba = img.to_rgba8();
            WebPEncoder::new_lossless(&mut out)
                .encode(&rgba, width, height, ExtendedColorType::Rgba8)
                .map_err(|e| TransformError::Encode(e.to_string()))?;
        }
        ImageFormat::Png => {
            img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
                .map_err(|e| TransformError::Encode(e.to_string()))?;
        }
        ImageFormat::Jpeg => {
            let rgb = img.to_rgb8();
            JpegEncoder::new_with_quality(&mut out, options.jpeg_quality)
                .encode(&rgb, width, height, ExtendedColorType::Rgb8)
                .map_err(|e| TransformError::Encode(e.to_string()))?;
        }
    }

    Ok(Bytes::from(out))
}

fn ensure_live(cancel: &CancellationToken) -> TransformResult<()> {
    if cancel.is_cancelled() {
        return Err(TransformError::Cancelled);
    }
    Ok(())
}

/// Downscale so the longest side is at most `max_dimension`; never upscales
fn fit_within(img: DynamicImage, max_dimension: u32) -> DynamicImage {
    let (width, height) = img.dimensions();
    if width.max(height) <= max_dimension {
        return img;
    }
    img.resize(max_dimension, max_dimension, FilterType::Lanczos3)
}
