//! Output filename handling: sanitizing labels and allocating unique names.

mod allocator;
mod sanitize;

pub use allocator::{positional_label, UsedNames};
pub use sanitize::{sanitize_filename, DEFAULT_MAX_FILENAME_LENGTH};
