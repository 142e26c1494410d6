//! Thumbnails for the selection grid and tracking of their display handles

use crate::session::SelectionGeneration;
use crate::types::*;
use image::GenericImageView;
use image::imageops::FilterType;

pub const DEFAULT_THUMBNAIL_EDGE_PX: u32 = 160;

/// RGBA thumbnail pixels
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

/// Decode `file` and shrink it so its longest edge is at most `max_edge`
pub fn make_thumbnail(index: usize, file: &SelectedFile, max_edge: u32) -> Result<Thumbnail> {
    let img = image::load_from_memory_with_format(&file.bytes, file.format.to_image_format())
        .map_err(|e| ConvertError::Decode {
            index,
            name: file.name.clone(),
            reason: e.to_string(),
        })?;

    let (w, h) = img.dimensions();
    let img = if w.max(h) > max_edge {
        img.resize(max_edge, max_edge, FilterType::Triangle)
    } else {
        img
    };

    let rgba = img.to_rgba8();
    Ok(Thumbnail {
        width: rgba.width() as usize,
        height: rgba.height() as usize,
        rgba: rgba.into_raw(),
    })
}

/// State of one thumbnail slot
#[derive(Debug)]
pub enum PreviewSlot<H> {
    Pending,
    Ready(H),
    Failed,
}

impl<H> PreviewSlot<H> {
    pub fn handle(&self) -> Option<&H> {
        match self {
            PreviewSlot::Ready(handle) => Some(handle),
            _ => None,
        }
    }
}

/// Holds every preview handle created for the current selection.
///
/// Handles belong to the selection generation they were created for. Moving to
/// a new generation, or calling [`PreviewSet::release`], drops all of them.
#[derive(Debug)]
pub struct PreviewSet<H> {
    generation: SelectionGeneration,
    slots: Vec<PreviewSlot<H>>,
}

impl<H> Default for PreviewSet<H> {
    fn default() -> Self {
        Self {
            generation: SelectionGeneration::default(),
            slots: Vec::new(),
        }
    }
}

impl<H> PreviewSet<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> SelectionGeneration {
        self.generation
    }

    /// Release every held handle and prepare `len` pending slots for
    /// `generation`. Returns how many handles were released.
    pub fn reset(&mut self, generation: SelectionGeneration, len: usize) -> usize {
        let released = self.release();
        self.generation = generation;
        self.slots.resize_with(len, || PreviewSlot::Pending);
        released
    }

    /// Store a handle. Handles for another generation or an out-of-range slot
    /// are dropped and `false` is returned.
    pub fn insert(&mut self, generation: SelectionGeneration, index: usize, handle: H) -> bool {
        self.set(generation, index, PreviewSlot::Ready(handle))
    }

    /// Record that no preview can be made for `index`
    pub fn mark_failed(&mut self, generation: SelectionGeneration, index: usize) -> bool {
        self.set(generation, index, PreviewSlot::Failed)
    }

    fn set(
        &mut self,
        generation: SelectionGeneration,
        index: usize,
        state: PreviewSlot<H>,
    ) -> bool {
        if generation != self.generation {
            log::debug!("Dropping stale preview {} of {:?}", index, generation);
            return false;
        }
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = state;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, index: usize) -> Option<&H> {
        self.slots.get(index).and_then(PreviewSlot::handle)
    }

    pub fn slots(&self) -> impl Iterator<Item = &PreviewSlot<H>> {
        self.slots.iter()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.handle().is_some()).count()
    }

    /// Drop all handles. Returns how many were released.
    pub fn release(&mut self) -> usize {
        let released = self.live_count();
        self.slots.clear();
        if released > 0 {
            log::debug!("Released {} previews", released);
        }
        released
    }
}
