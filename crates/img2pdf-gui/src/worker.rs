use img2pdf_async_runtime::{CommandReceiver, ConvertCommand, UpdateSender};

use crate::handlers;

/// Async worker task that processes conversion commands and sends updates
pub async fn worker_task(mut command_rx: CommandReceiver, update_tx: UpdateSender) {
    while let Some(cmd) = command_rx.recv().await {
        process_command(cmd, &mut command_rx, &update_tx).await;
    }
    log::debug!("Worker stopped: command channel closed");
}

async fn process_command(
    cmd: ConvertCommand,
    command_rx: &mut CommandReceiver,
    update_tx: &UpdateSender,
) {
    match cmd {
        ConvertCommand::LoadSelection { paths } => {
            handlers::convert::handle_load_selection(paths, update_tx).await;
        }
        ConvertCommand::GenerateThumbnails {
            mut generation,
            mut files,
        } => {
            // Only the newest selection needs previews
            while let Ok(next_cmd) = command_rx.try_recv() {
                if let ConvertCommand::GenerateThumbnails {
                    generation: newer_generation,
                    files: newer_files,
                } = next_cmd
                {
                    log::debug!("Discarding thumbnails of {:?}, superseded", generation);
                    generation = newer_generation;
                    files = newer_files;
                } else {
                    // Can't put it back, so handle it before the thumbnails
                    Box::pin(process_command(next_cmd, command_rx, update_tx)).await;
                }
            }

            handlers::convert::handle_thumbnails(generation, files, update_tx).await;
        }
        ConvertCommand::Generate {
            files,
            options,
            output_path,
        } => {
            handlers::convert::handle_generate(files, options, output_path, update_tx).await;
        }
    }
}
