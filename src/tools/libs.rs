use anyhow::Result;
use log::{debug, warn};
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

/// File extensions that mark a link library artifact.
pub const LIB_EXTENSIONS: &[&str] = &["so", "lib", "a", "dylib", "bc"];

/// Logical library name for a file name, or `None` if it is not a library.
///
/// `libfoo.a` -> `foo`, `foo.lib` -> `foo`. The `lib` prefix is kept for
/// `.lib` files, where it is not a naming convention.
pub fn library_name(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || !LIB_EXTENSIONS.contains(&ext) {
        return None;
    }

    let name = if ext == "lib" {
        stem
    } else {
        stem.strip_prefix("lib")
            .filter(|rest| !rest.is_empty())
            .unwrap_or(stem)
    };
    Some(name.to_string())
}

/// Binary container format detected from a file's leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryFormat {
    Elf,
    MachO,
    Pe,
    Archive,
}

impl fmt::Display for LibraryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LibraryFormat::Elf => "ELF",
            LibraryFormat::MachO => "Mach-O",
            LibraryFormat::Pe => "PE",
            LibraryFormat::Archive => "ar archive",
        };
        f.write_str(name)
    }
}

/// Peek at the header of `path` with goblin.
///
/// Returns `None` for unreadable, short, or unrecognized files.
pub fn probe_format<R: Runtime>(runtime: &R, path: &Path) -> Option<LibraryFormat> {
    let file = runtime.open(path).ok()?;

    let mut header = Vec::with_capacity(16);
    file.take(16).read_to_end(&mut header).ok()?;
    let bytes: [u8; 16] = header.try_into().ok()?;

    match goblin::peek_bytes(&bytes) {
        Ok(goblin::Hint::Elf(_)) => Some(LibraryFormat::Elf),
        Ok(goblin::Hint::Mach(_)) | Ok(goblin::Hint::MachFat(_)) => Some(LibraryFormat::MachO),
        Ok(goblin::Hint::PE) => Some(LibraryFormat::Pe),
        Ok(goblin::Hint::Archive) => Some(LibraryFormat::Archive),
        _ => None,
    }
}

/// The libdirs that exist under `package_folder`, in declaration order.
fn existing_libdirs<R: Runtime>(
    runtime: &R,
    package_folder: &Path,
    libdirs: &[String],
) -> Vec<PathBuf> {
    libdirs
        .iter()
        .map(|libdir| package_folder.join(libdir))
        .filter(|dir| {
            let exists = runtime.is_dir(dir);
            if !exists {
                debug!("Lib folder doesn't exist: {}", dir.display());
            }
            exists
        })
        .collect()
}

/// Collect the names of the libraries found in `libdirs` under `package_folder`.
///
/// Each libdir is listed non-recursively in file name order. Missing libdirs
/// are skipped, with a warning when none of them exists. Names keep their
/// first-seen order and appear once.
#[tracing::instrument(skip(runtime))]
pub fn collect_libs<R: Runtime>(
    runtime: &R,
    package_folder: &Path,
    libdirs: &[String],
) -> Result<Vec<String>> {
    let dirs = existing_libdirs(runtime, package_folder, libdirs);
    if dirs.is_empty() && !libdirs.is_empty() {
        warn!(
            "Lib folder doesn't exist, can't collect libraries: {}",
            libdirs
                .iter()
                .map(|d| package_folder.join(d).display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    let mut libs: Vec<String> = Vec::new();

    for dir in dirs {
        let mut entries = runtime.read_dir(&dir)?;
        entries.sort();

        for entry in entries {
            if runtime.is_dir(&entry) {
                continue;
            }
            let Some(name) = entry
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(library_name)
            else {
                continue;
            };

            match probe_format(runtime, &entry) {
                Some(format) => debug!("Found {} library {}", format, entry.display()),
                None => debug!(
                    "{} is named like a library but is not a recognized binary",
                    entry.display()
                ),
            }

            if !libs.contains(&name) {
                libs.push(name);
            }
        }
    }

    Ok(libs)
}
