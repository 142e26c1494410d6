use img2pdf_async_runtime::{
    ConvertOptions, ConvertUpdate, SelectedFile, SelectionGeneration, UpdateSender,
};
use img2pdf_core::preview::DEFAULT_THUMBNAIL_EDGE_PX;
use std::path::PathBuf;

pub async fn handle_load_selection(paths: Vec<PathBuf>, update_tx: &UpdateSender) {
    match img2pdf_core::load_selection(&paths).await {
        Ok(files) => {
            let _ = update_tx.send(ConvertUpdate::SelectionLoaded { files });
        }
        Err(e) => {
            let _ = update_tx.send(ConvertUpdate::Error {
                message: format!("Failed to read images: {e}"),
            });
        }
    }
}

/// Decode thumbnails one by one so the grid fills in as they become ready
pub async fn handle_thumbnails(
    generation: SelectionGeneration,
    files: Vec<SelectedFile>,
    update_tx: &UpdateSender,
) {
    for (index, file) in files.into_iter().enumerate() {
        let result = tokio::task::spawn_blocking(move || {
            img2pdf_core::make_thumbnail(index, &file, DEFAULT_THUMBNAIL_EDGE_PX)
        })
        .await;

        match result {
            Ok(Ok(thumbnail)) => {
                let _ = update_tx.send(ConvertUpdate::ThumbnailReady {
                    generation,
                    index,
                    thumbnail,
                });
            }
            Ok(Err(e)) => {
                log::warn!("No preview: {}", e);
                let _ = update_tx.send(ConvertUpdate::ThumbnailFailed {
                    generation,
                    index,
                    message: e.to_string(),
                });
            }
            Err(e) => {
                log::warn!("Preview task join error: {}", e);
                let _ = update_tx.send(ConvertUpdate::ThumbnailFailed {
                    generation,
                    index,
                    message: e.to_string(),
                });
            }
        }
    }
}

pub async fn handle_generate(
    files: Vec<SelectedFile>,
    options: ConvertOptions,
    output_path: PathBuf,
    update_tx: &UpdateSender,
) {
    let result = async {
        let document = img2pdf_core::generate(&files, &options, |stage, current, total| {
            let _ = update_tx.send(ConvertUpdate::Progress {
                stage,
                current,
                total,
            });
        })
        .await?;
        img2pdf_core::save_document_as(&document, &output_path).await?;
        Ok::<_, img2pdf_core::ConvertError>(document.page_count())
    }
    .await;

    match result {
        Ok(page_count) => {
            let _ = update_tx.send(ConvertUpdate::GenerationComplete {
                path: output_path,
                page_count,
            });
        }
        Err(e) => {
            log::error!("Conversion failed: {}", e);
            let _ = update_tx.send(ConvertUpdate::GenerationFailed {
                message: format!("Failed to generate PDF: {e}"),
            });
        }
    }
}
