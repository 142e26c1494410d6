use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_FILES: usize = 20;
/// A4 width
pub const DEFAULT_PAGE_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;
pub const DEFAULT_OUTPUT_FILE_NAME: &str = "converted.pdf";

pub const DEFAULT_MAX_SIZE_BYTES: usize = 1024 * 1024;
pub const DEFAULT_MAX_DIMENSION_PX: u32 = 1920;
pub const DEFAULT_INITIAL_QUALITY: u8 = 92;
pub const DEFAULT_MIN_QUALITY: u8 = 40;
pub const DEFAULT_QUALITY_STEP: u8 = 8;

/// How page height is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PageSizing {
    /// Page is exactly as tall as the scaled image
    #[default]
    FitImage,
    /// Fixed A4 page, image anchored at the top-left corner
    A4,
}

/// What to do when one file cannot be decoded during rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DecodeFailurePolicy {
    /// Fail the whole generation
    #[default]
    Abort,
    /// Log a warning and leave the file out of the document
    Skip,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CompressionOptions {
    pub max_size_bytes: usize,
    /// Longest edge after compression
    pub max_dimension_px: u32,
    pub initial_quality: u8,
    pub min_quality: u8,
    pub quality_step: u8,
    /// Run compression on the blocking pool instead of the calling task
    pub use_worker: bool,
}

impl Default for CompressionOptions {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            max_dimension_px: DEFAULT_MAX_DIMENSION_PX,
            initial_quality: DEFAULT_INITIAL_QUALITY,
            min_quality: DEFAULT_MIN_QUALITY,
            quality_step: DEFAULT_QUALITY_STEP,
            use_worker: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConvertOptions {
    pub max_files: usize,
    pub page_width_mm: f32,
    pub page_sizing: PageSizing,
    /// `None` disables the compression step
    pub compression: Option<CompressionOptions>,
    pub on_decode_error: DecodeFailurePolicy,
    pub output_file_name: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
            page_width_mm: DEFAULT_PAGE_WIDTH_MM,
            page_sizing: PageSizing::FitImage,
            compression: None,
            on_decode_error: DecodeFailurePolicy::Abort,
            output_file_name: DEFAULT_OUTPUT_FILE_NAME.to_string(),
        }
    }
}

impl ConvertOptions {
    /// Defaults with the compression step switched on
    pub fn with_compression() -> Self {
        Self {
            compression: Some(CompressionOptions::default()),
            ..Default::default()
        }
    }

    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options: Self = serde_json::from_slice(&bytes)
            .map_err(|e| ConvertError::Config(format!("Failed to parse config: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConvertError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_files == 0 {
            return Err(ConvertError::Config(
                "max_files must be at least 1".to_string(),
            ));
        }

        if !(self.page_width_mm.is_finite() && self.page_width_mm > 0.0) {
            return Err(ConvertError::Config(format!(
                "page_width_mm must be positive, got {}",
                self.page_width_mm
            )));
        }

        if self.page_sizing == PageSizing::A4 && self.page_width_mm > DEFAULT_PAGE_WIDTH_MM {
            return Err(ConvertError::Config(format!(
                "page_width_mm {} does not fit on an A4 page",
                self.page_width_mm
            )));
        }

        let name = self.output_file_name.trim();
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(ConvertError::Config(format!(
                "Invalid output file name '{}'",
                self.output_file_name
            )));
        }

        if let Some(compression) = &self.compression {
            compression.validate()?;
        }

        Ok(())
    }
}

impl CompressionOptions {
    pub fn validate(&self) -> Result<()> {
        if self.max_size_bytes == 0 {
            return Err(ConvertError::Config(
                "max_size_bytes must be positive".to_string(),
            ));
        }
        if self.max_dimension_px == 0 {
            return Err(ConvertError::Config(
                "max_dimension_px must be positive".to_string(),
            ));
        }
        if self.min_quality == 0
            || self.initial_quality > 100
            || self.min_quality > self.initial_quality
        {
            return Err(ConvertError::Config(format!(
                "JPEG quality range {}..={} is invalid",
                self.min_quality, self.initial_quality
            )));
        }
        if self.quality_step == 0 {
            return Err(ConvertError::Config(
                "quality_step must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
