pub mod converter;

pub use converter::{ConverterAction, show_converter, show_log_panel};
