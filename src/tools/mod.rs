//! Helpers recipe hooks use to stage files and discover libraries.

mod copy;
mod libs;

pub use copy::{CopyOptions, copy};
pub use libs::{LIB_EXTENSIONS, LibraryFormat, collect_libs, library_name, probe_format};
