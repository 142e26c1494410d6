use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("You can select at most {max} images ({selected} selected)")]
    TooManyFiles { max: usize, selected: usize },
    #[error("No images selected")]
    EmptySelection,
    #[error("A conversion is already running")]
    Busy,
    #[error("Unsupported file '{name}': only JPEG and PNG images are accepted")]
    UnsupportedFormat { name: String },
    #[error("Failed to decode image #{position} '{name}': {reason}", position = .index + 1)]
    Decode {
        index: usize,
        name: String,
        reason: String,
    },
    #[error("None of the {skipped} images could be decoded")]
    NoPagesRendered { skipped: usize },
    #[error("Failed to compress '{name}': {reason}")]
    Compression { name: String, reason: String },
    #[error("PDF error: {0}")]
    Pdf(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, ConvertError>;

/// Raster formats accepted by the upload gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
        }
    }

    /// Classify by magic bytes
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match image::guess_format(bytes).ok()? {
            image::ImageFormat::Jpeg => Some(ImageFormat::Jpeg),
            image::ImageFormat::Png => Some(ImageFormat::Png),
            _ => None,
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            _ => None,
        }
    }

    pub(crate) fn to_image_format(self) -> image::ImageFormat {
        match self {
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
        }
    }
}

/// One entry of the user's selection. Its identity is its position in the list.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, format: ImageFormat, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            format,
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Geometry of one appended page, in millimetres
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub source_name: String,
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub image_width_mm: f32,
    pub image_height_mm: f32,
}

/// A finalized PDF ready to be saved
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub pages: Vec<PageLayout>,
}

impl GeneratedDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Pipeline stage reported through progress callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Compressing,
    Rendering,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Stage::Compressing => "Compressing images",
            Stage::Rendering => "Rendering pages",
        }
    }
}
