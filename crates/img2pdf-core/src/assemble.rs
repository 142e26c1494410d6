//! Document assembler: sequential render loop, finalization and saving

use crate::compress::compress_all;
use crate::options::{ConvertOptions, DecodeFailurePolicy};
use crate::render::{DocumentBuilder, decode_image};
use crate::types::*;
use std::path::{Path, PathBuf};

const DOCUMENT_TITLE: &str = "Converted images";

/// Render `files` into one document, one page per file, in order.
///
/// Each file is decoded and appended before the next one starts.
pub async fn render_document<F>(
    files: &[SelectedFile],
    options: &ConvertOptions,
    mut on_progress: F,
) -> Result<GeneratedDocument>
where
    F: FnMut(usize, usize),
{
    options.validate()?;
    if files.is_empty() {
        return Err(ConvertError::EmptySelection);
    }

    let total = files.len();
    let mut builder = DocumentBuilder::new(DOCUMENT_TITLE, options);

    for (index, file) in files.iter().enumerate() {
        let file_clone = file.clone();
        let decoded =
            tokio::task::spawn_blocking(move || decode_image(index, &file_clone)).await?;

        match decoded {
            Ok(image) => {
                builder.append_page(&file.name, image);
            }
            Err(e) => match options.on_decode_error {
                DecodeFailurePolicy::Abort => return Err(e),
                DecodeFailurePolicy::Skip => {
                    log::warn!("Skipping {}: {}", file.name, e);
                }
            },
        }

        on_progress(index + 1, total);
    }

    if builder.page_count() == 0 {
        return Err(ConvertError::NoPagesRendered { skipped: total });
    }

    let file_name = options.output_file_name.clone();
    let document = tokio::task::spawn_blocking(move || builder.finish(&file_name)).await?;

    log::info!(
        "Rendered {} of {} images into {} ({} bytes)",
        document.page_count(),
        total,
        document.file_name,
        document.bytes.len()
    );

    Ok(document)
}

/// Full pipeline: optional compression, then rendering
pub async fn generate<F>(
    files: &[SelectedFile],
    options: &ConvertOptions,
    mut on_progress: F,
) -> Result<GeneratedDocument>
where
    F: FnMut(Stage, usize, usize),
{
    options.validate()?;

    match &options.compression {
        Some(compression) => {
            let compressed = compress_all(files, compression, |current, total| {
                on_progress(Stage::Compressing, current, total)
            })
            .await?;
            log::info!(
                "Compressed {} images: {} -> {} bytes",
                files.len(),
                total_size(files),
                total_size(&compressed)
            );
            render_document(&compressed, options, |current, total| {
                on_progress(Stage::Rendering, current, total)
            })
            .await
        }
        None => {
            render_document(files, options, |current, total| {
                on_progress(Stage::Rendering, current, total)
            })
            .await
        }
    }
}

/// Write the document into `dir` under its file name
pub async fn save_document(document: &GeneratedDocument, dir: impl AsRef<Path>) -> Result<PathBuf> {
    let path = dir.as_ref().join(&document.file_name);
    save_document_as(document, &path).await?;
    Ok(path)
}

/// Write the document to an explicit path
pub async fn save_document_as(document: &GeneratedDocument, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    tokio::fs::write(path, &document.bytes).await?;
    log::info!("Saved {} pages to {}", document.page_count(), path.display());
    Ok(())
}

fn total_size(files: &[SelectedFile]) -> usize {
    files.iter().map(SelectedFile::size).sum()
}
