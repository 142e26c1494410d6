pub mod assemble;
pub mod compress;
pub mod input;
mod options;
pub mod preview;
pub mod render;
mod session;
mod types;

pub use assemble::{generate, render_document, save_document, save_document_as};
pub use compress::{compress_all, compress_image};
pub use input::{load_image_file, load_selection};
pub use options::*;
pub use preview::{PreviewSet, PreviewSlot, Thumbnail, make_thumbnail};
pub use render::{DecodedImage, DocumentBuilder, decode_image, page_height};
pub use session::{SelectionGeneration, Session, check_selection_size};
pub use types::*;
