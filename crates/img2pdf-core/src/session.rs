//! Selection and busy state shared by the upload gate and the assembler

use crate::options::ConvertOptions;
use crate::types::*;

/// Identifies one accepted selection; bumped every time the selection changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct SelectionGeneration(pub u64);

#[derive(Debug, Default)]
pub struct Session {
    files: Vec<SelectedFile>,
    busy: bool,
    generation: SelectionGeneration,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn generation(&self) -> SelectionGeneration {
        self.generation
    }

    pub fn can_generate(&self) -> bool {
        !self.busy && !self.files.is_empty()
    }

    /// Upload gate: accept the selection whole or not at all
    pub fn select(&mut self, files: Vec<SelectedFile>, options: &ConvertOptions) -> Result<()> {
        if self.busy {
            return Err(ConvertError::Busy);
        }

        check_selection_size(files.len(), options)?;

        log::info!("Accepted selection of {} files", files.len());
        self.files = files;
        self.bump_generation();
        Ok(())
    }

    /// Enter the busy state and hand out the files to convert
    pub fn begin_generation(&mut self) -> Result<Vec<SelectedFile>> {
        if self.busy {
            return Err(ConvertError::Busy);
        }
        if self.files.is_empty() {
            return Err(ConvertError::EmptySelection);
        }
        self.busy = true;
        Ok(self.files.clone())
    }

    /// Leave the busy state. A successful run clears the selection; a failed
    /// one keeps it so the user can retry.
    pub fn finish_generation(&mut self, succeeded: bool) {
        self.busy = false;
        if succeeded {
            self.files.clear();
            self.bump_generation();
        }
    }

    fn bump_generation(&mut self) {
        self.generation = SelectionGeneration(self.generation.0 + 1);
    }
}

/// Count check of the upload gate. Callers holding only paths run it before
/// reading any file.
pub fn check_selection_size(selected: usize, options: &ConvertOptions) -> Result<()> {
    if selected > options.max_files {
        log::warn!(
            "Rejected selection of {} files (limit {})",
            selected,
            options.max_files
        );
        return Err(ConvertError::TooManyFiles {
            max: options.max_files,
            selected,
        });
    }
    Ok(())
}
