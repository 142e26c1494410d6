use eframe::egui;
use img2pdf_async_runtime::{CommandSender, ConvertCommand, ConvertUpdate, UpdateReceiver};
use img2pdf_core::{ConvertError, ConvertOptions, PreviewSet, SelectedFile, Session, Stage};
use std::path::PathBuf;

use crate::logger::AppLogger;
use crate::views::{ConverterAction, show_converter, show_log_panel};

#[derive(Clone)]
struct ProgressState {
    stage: Stage,
    current: usize,
    total: usize,
}

pub struct ImageToPdfApp {
    session: Session,
    options: ConvertOptions,
    compress: bool,
    status: String,

    // Thumbnail textures for the current selection
    previews: PreviewSet<egui::TextureHandle>,

    // Async infrastructure
    command_tx: CommandSender,
    update_rx: UpdateReceiver,

    // Progress tracking
    progress: Option<ProgressState>,

    logger: AppLogger,

    _tokio_handle: tokio::runtime::Handle,
}

impl ImageToPdfApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        tokio_handle: tokio::runtime::Handle,
        logger: AppLogger,
    ) -> Self {
        let ((command_tx, command_rx), (update_tx, update_rx)) =
            img2pdf_async_runtime::channels();

        // Spawn worker task
        tokio_handle.spawn(crate::worker::worker_task(command_rx, update_tx));

        Self {
            session: Session::new(),
            options: ConvertOptions::default(),
            compress: true,
            status: String::new(),
            previews: PreviewSet::new(),
            command_tx,
            update_rx,
            progress: None,
            logger,
            _tokio_handle: tokio_handle,
        }
    }

    fn request_selection(&mut self, paths: Vec<PathBuf>) {
        if paths.is_empty() || self.session.is_busy() {
            return;
        }
        if let Err(e) = img2pdf_core::check_selection_size(paths.len(), &self.options) {
            self.reject_selection(&e);
            return;
        }
        self.status = format!("Reading {} files...", paths.len());
        let _ = self.command_tx.send(ConvertCommand::LoadSelection { paths });
    }

    fn accept_selection(&mut self, files: Vec<SelectedFile>) {
        match self.session.select(files, &self.options) {
            Ok(()) => {
                let generation = self.session.generation();
                let files = self.session.files().to_vec();
                self.previews.reset(generation, files.len());
                self.status = format!("Selected {} images", files.len());
                let _ = self
                    .command_tx
                    .send(ConvertCommand::GenerateThumbnails { generation, files });
            }
            Err(e @ ConvertError::TooManyFiles { .. }) => self.reject_selection(&e),
            Err(e) => {
                self.status = format!("Error: {e}");
            }
        }
    }

    fn reject_selection(&mut self, error: &ConvertError) {
        self.status = error.to_string();
        show_blocking_alert("Too many images", &self.status);
    }

    fn start_generation(&mut self) {
        if !self.session.can_generate() {
            return;
        }

        let Some(output_path) = rfd::FileDialog::new()
            .set_file_name(&self.options.output_file_name)
            .add_filter("PDF", &["pdf"])
            .save_file()
        else {
            return;
        };

        let mut options = self.options.clone();
        options.compression = self.compress.then(Default::default);

        match self.session.begin_generation() {
            Ok(files) => {
                log::info!("Converting {} images", files.len());
                self.status = "Processing...".to_string();
                let _ = self.command_tx.send(ConvertCommand::Generate {
                    files,
                    options,
                    output_path,
                });
            }
            Err(e) => self.status = format!("Error: {e}"),
        }
    }

    fn handle_update(&mut self, ctx: &egui::Context, update: ConvertUpdate) {
        match update {
            ConvertUpdate::Progress {
                stage,
                current,
                total,
            } => {
                self.progress = Some(ProgressState {
                    stage,
                    current,
                    total,
                });
                ctx.request_repaint();
            }
            ConvertUpdate::SelectionLoaded { files } => {
                self.accept_selection(files);
            }
            ConvertUpdate::ThumbnailReady {
                generation,
                index,
                thumbnail,
            } => {
                let color_image = egui::ColorImage::from_rgba_unmultiplied(
                    [thumbnail.width, thumbnail.height],
                    &thumbnail.rgba,
                );
                let texture = ctx.load_texture(
                    format!("preview-{}-{}", generation.0, index),
                    color_image,
                    egui::TextureOptions::default(),
                );
                self.previews.insert(generation, index, texture);
            }
            ConvertUpdate::ThumbnailFailed {
                generation,
                index,
                message,
            } => {
                log::debug!("Preview {} unavailable: {}", index, message);
                self.previews.mark_failed(generation, index);
            }
            ConvertUpdate::GenerationComplete { path, page_count } => {
                self.session.finish_generation(true);
                self.previews.reset(self.session.generation(), 0);
                self.progress = None;
                self.status = format!("Saved {} pages → {}", page_count, path.display());
            }
            ConvertUpdate::GenerationFailed { message } => {
                self.session.finish_generation(false);
                self.progress = None;
                self.status = message.clone();
                show_blocking_error("Conversion failed", &message);
            }
            ConvertUpdate::Error { message } => {
                self.status = message;
                self.progress = None;
            }
        }
    }
}

impl eframe::App for ImageToPdfApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Dropped image files count as a new selection
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .filter(|path| img2pdf_core::input::has_image_extension(path))
                .collect()
        });
        self.request_selection(dropped);

        // Process all pending updates from worker
        while let Ok(update) = self.update_rx.try_recv() {
            self.handle_update(ctx, update);
        }

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            if let Some(ref progress) = self.progress {
                ui.label(progress.stage.label());
                ui.add(
                    egui::ProgressBar::new(progress.current as f32 / progress.total.max(1) as f32)
                        .show_percentage(),
                );
                ctx.request_repaint(); // Keep updating during operations
            }

            if !self.status.is_empty() {
                ui.label(&self.status);
            } else if let Some(message) = self.logger.latest_message() {
                ui.weak(message);
            }

            show_log_panel(ui, &self.logger);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let action = show_converter(
                ui,
                &self.session,
                &self.previews,
                &mut self.compress,
                self.options.max_files,
            );

            match action {
                ConverterAction::PickFiles => {
                    if let Some(paths) = rfd::FileDialog::new()
                        .add_filter("Images", &["jpg", "jpeg", "png"])
                        .pick_files()
                    {
                        self.request_selection(paths);
                    }
                }
                ConverterAction::Generate => self.start_generation(),
                ConverterAction::None => {}
            }
        });

        if self.session.is_busy() {
            ctx.request_repaint();
        }
    }
}

impl Drop for ImageToPdfApp {
    fn drop(&mut self) {
        self.previews.release();
    }
}

fn show_blocking_alert(title: &str, message: &str) {
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Warning)
        .set_title(title)
        .set_description(message)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}

fn show_blocking_error(title: &str, message: &str) {
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title(title)
        .set_description(message)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}
