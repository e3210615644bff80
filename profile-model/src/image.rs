use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::error::{ModelError, Result};

/// Output encodings the avatar transform can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ImageFormat {
    #[default]
    Webp,
    Png,
    Jpeg,
}

impl ImageFormat {
    pub const fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Webp => "image/webp",
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }

    pub const fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Webp => "webp",
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
        }
    }
}

impl Display for ImageFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

impl FromStr for ImageFormat {
    type Err = ModelError;

    /// Accepts bare names (`webp`), extensions (`jpg`) and MIME types
    /// (`image/webp`), case-insensitively.
    fn from_str(raw: &str) -> Result<Self> {
        let normalized = raw.trim().to_ascii_lowercase();
        let name = normalized
            .strip_prefix("image/")
            .unwrap_or(normalized.as_str());

        match name {
            "webp" => Ok(ImageFormat::Webp),
            "png" => Ok(ImageFormat::Png),
            "jpeg" | "jpg" => Ok(ImageFormat::Jpeg),
            _ => Err(ModelError::UnknownImageFormat(raw.to_string())),
        }
    }
}

/// Parameters handed to the image transform for every avatar selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransformOptions {
    /// Longest side of the output, in pixels. Smaller images are not upscaled.
    pub max_dimension: u32,
    pub output_format: ImageFormat,
    /// Only consulted for [`ImageFormat::Jpeg`].
    pub jpeg_quality: u8,
}

impl TransformOptions {
    pub const DEFAULT_MAX_DIMENSION: u32 = 256;
    pub const DEFAULT_JPEG_QUALITY: u8 = 85;

    pub fn new(max_dimension: u32, output_format: ImageFormat) -> Result<Self> {
        if max_dimension == 0 {
            return Err(ModelError::InvalidDimension(max_dimension));
        }

        Ok(Self {
            max_dimension,
            output_format,
            jpeg_quality: Self::DEFAULT_JPEG_QUALITY,
        })
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            max_dimension: Self::DEFAULT_MAX_DIMENSION,
            output_format: ImageFormat::Webp,
            jpeg_quality: Self::DEFAULT_JPEG_QUALITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_extensions_and_mime_types() {
        assert_eq!("webp".parse::<ImageFormat>(), Ok(ImageFormat::Webp));
        assert_eq!("image/WEBP".parse::<ImageFormat>(), Ok(ImageFormat::Webp));
        assert_eq!("jpg".parse::<ImageFormat>(), Ok(ImageFormat::Jpeg));
        assert_eq!(" PNG ".parse::<ImageFormat>(), Ok(ImageFormat::Png));
        assert!(matches!(
            "gif".parse::<ImageFormat>(),
            Err(ModelError::UnknownImageFormat(_))
        ));
    }

    #[test]
    fn defaults_match_avatar_upload_settings() {
        let options = TransformOptions::default();
        assert_eq!(options.max_dimension, 256);
        assert_eq!(options.output_format, ImageFormat::Webp);
        assert_eq!(options.output_format.mime_type(), "image/webp");
    }

    #[test]
    fn zero_dimension_is_rejected() {
        assert_eq!(
            TransformOptions::new(0, ImageFormat::Png),
            Err(ModelError::InvalidDimension(0))
        );
        let options = TransformOptions::new(64, ImageFormat::Jpeg)
            .unwrap()
            .with_jpeg_quality(0);
        assert_eq!(options.jpeg_quality, 1);
    }
}
