use std::path::PathBuf;

// Re-export types from library crates
pub use img2pdf_core::{ConvertOptions, SelectedFile, SelectionGeneration, Stage, Thumbnail};

/// Commands sent from UI to worker
#[derive(Debug)]
pub enum ConvertCommand {
    /// Read the picked files from disk
    LoadSelection { paths: Vec<PathBuf> },
    /// Build preview thumbnails for an accepted selection
    GenerateThumbnails {
        generation: SelectionGeneration,
        files: Vec<SelectedFile>,
    },
    /// Compress (optionally), render and save the document
    Generate {
        files: Vec<SelectedFile>,
        options: ConvertOptions,
        output_path: PathBuf,
    },
}

/// Updates sent from worker to UI
#[derive(Debug, Clone)]
pub enum ConvertUpdate {
    Progress {
        stage: Stage,
        current: usize,
        total: usize,
    },
    SelectionLoaded {
        files: Vec<SelectedFile>,
    },
    ThumbnailReady {
        generation: SelectionGeneration,
        index: usize,
        thumbnail: Thumbnail,
    },
    ThumbnailFailed {
        generation: SelectionGeneration,
        index: usize,
        message: String,
    },
    GenerationComplete {
        path: PathBuf,
        page_count: usize,
    },
    GenerationFailed {
        message: String,
    },
    Error {
        message: String,
    },
}

pub type CommandSender = tokio::sync::mpsc::UnboundedSender<ConvertCommand>;
pub type CommandReceiver = tokio::sync::mpsc::UnboundedReceiver<ConvertCommand>;
pub type UpdateSender = tokio::sync::mpsc::UnboundedSender<ConvertUpdate>;
pub type UpdateReceiver = tokio::sync::mpsc::UnboundedReceiver<ConvertUpdate>;

/// Create the command and update channels connecting a UI to its worker
pub fn channels() -> ((CommandSender, CommandReceiver), (UpdateSender, UpdateReceiver)) {
    (
        tokio::sync::mpsc::unbounded_channel(),
        tokio::sync::mpsc::unbounded_channel(),
    )
}
