//! Reading selected files from disk

use crate::types::*;
use std::path::Path;

/// Load one image file, accepting only JPEG and PNG
pub async fn load_image_file(path: impl AsRef<Path>) -> Result<SelectedFile> {
    let path = path.as_ref();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let bytes = tokio::fs::read(path).await?;
    let format = classify(path, &bytes).ok_or(ConvertError::UnsupportedFormat {
        name: name.clone(),
    })?;

    log::debug!("Loaded {} ({}, {} bytes)", name, format.mime_type(), bytes.len());
    Ok(SelectedFile::new(name, format, bytes))
}

/// Load a selection in the order given
pub async fn load_selection(paths: &[impl AsRef<Path>]) -> Result<Vec<SelectedFile>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        files.push(load_image_file(path).await?);
    }
    Ok(files)
}

/// True if the path looks like something the picker should offer
pub fn has_image_extension(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(ImageFormat::from_extension)
        .is_some()
}

fn classify(path: &Path, bytes: &[u8]) -> Option<ImageFormat> {
    if let Some(format) = ImageFormat::sniff(bytes) {
        return Some(format);
    }
    // Content we cannot recognise still gets a chance through its extension;
    // decoding later reports the real problem.
    if bytes.is_empty() {
        return None;
    }
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(ImageFormat::from_extension)
}
