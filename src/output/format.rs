use std::path::{Path, PathBuf};

use crate::foundation::core::FrameIndex;
use crate::foundation::error::{HoldError, HoldResult};

/// Still-image format of the frame sequence.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// PNG.
    #[default]
    Png,
    /// JPEG (alpha is dropped).
    Jpeg,
    /// Windows bitmap.
    Bmp,
    /// TIFF.
    Tiff,
    /// Truevision TGA.
    Targa,
    /// OpenEXR (32-bit float).
    OpenExr,
}

impl OutputFormat {
    /// Every supported format.
    pub const ALL: [Self; 6] = [
        Self::Png,
        Self::Jpeg,
        Self::Bmp,
        Self::Tiff,
        Self::Targa,
        Self::OpenExr,
    ];

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
            Self::Targa => "tga",
            Self::OpenExr => "exr",
        }
    }

    /// Matching `image` crate format.
    pub fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Bmp => image::ImageFormat::Bmp,
            Self::Tiff => image::ImageFormat::Tiff,
            Self::Targa => image::ImageFormat::Tga,
            Self::OpenExr => image::ImageFormat::OpenExr,
        }
    }

    /// Parse an extension (case-insensitive, `jpeg`/`tif` accepted).
    pub fn from_extension(ext: &str) -> HoldResult<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "bmp" => Ok(Self::Bmp),
            "tif" | "tiff" => Ok(Self::Tiff),
            "tga" => Ok(Self::Targa),
            "exr" => Ok(Self::OpenExr),
            other => Err(HoldError::configuration(format!(
                "unsupported image extension '{other}'"
            ))),
        }
    }

    /// Format implied by a path's extension.
    pub fn from_path(path: &Path) -> HoldResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| {
                HoldError::configuration(format!(
                    "output path '{}' has no image extension",
                    path.display()
                ))
            })?;
        Self::from_extension(ext)
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = HoldError;

    fn from_str(s: &str) -> HoldResult<Self> {
        Self::from_extension(s)
    }
}

/// Directory holding the numbered frames of a run.
pub fn images_dir(output_directory: &Path) -> PathBuf {
    output_directory.join("images")
}

/// `<images_dir>/<frame>.<ext>`.
pub fn frame_path(images_dir: &Path, frame: FrameIndex, format: OutputFormat) -> PathBuf {
    images_dir.join(format!("{}.{}", frame.0, format.extension()))
}

#[cfg(test)]
#[path = "../../tests/unit/output/format.rs"]
mod tests;
