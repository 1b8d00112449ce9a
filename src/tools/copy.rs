use anyhow::{Context, Result, bail};
use glob::Pattern;
use log::{debug, trace};
use std::path::{Path, PathBuf};

use crate::runtime::{Runtime, is_path_under, normalize_path, relative_to};

/// Options for [`copy`].
#[derive(Debug, Clone)]
pub struct CopyOptions {
    /// Glob patterns (relative to the source folder) that are never copied.
    pub excludes: Vec<String>,
    /// Keep the relative directory structure; otherwise files are flattened
    /// into the destination root.
    pub keep_path: bool,
    /// Recreate symlinks as symlinks instead of copying what they point to.
    /// Absolute links into `src` are rewritten relative when `keep_path` is set.
    pub links: bool,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            excludes: Vec::new(),
            keep_path: true,
            links: false,
        }
    }
}

/// Include and exclude patterns, compiled once per copy.
struct Selection {
    /// `None` when the pattern is a bare `*`, which selects every path.
    include: Option<Pattern>,
    excludes: Vec<Pattern>,
}

impl Selection {
    fn new(pattern: &str, excludes: &[String]) -> Result<Self> {
        let include = if pattern == "*" {
            None
        } else {
            Some(
                Pattern::new(pattern)
                    .with_context(|| format!("Invalid copy pattern '{}'", pattern))?,
            )
        };
        let excludes = excludes
            .iter()
            .map(|e| Pattern::new(e).with_context(|| format!("Invalid exclude pattern '{}'", e)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { include, excludes })
    }

    fn matches(&self, rel: &Path) -> Result<bool> {
        if self.include.is_none() && self.excludes.is_empty() {
            return Ok(true);
        }

        // glob only matches text, and silently rejects anything else
        let Some(text) = rel.to_str() else {
            bail!(
                "Cannot match path {} against copy patterns: not valid UTF-8",
                rel.display()
            );
        };
        let included = self.include.as_ref().is_none_or(|p| p.matches(text));
        Ok(included && !self.excludes.iter().any(|e| e.matches(text)))
    }
}

/// Copy every file under `src` whose relative path matches `pattern` into `dst`.
///
/// `*` also matches `/`, so `"*"` selects the whole tree. Symlinks are
/// followed and their content copied, including symlinked directories,
/// unless `options.links` asks for them to be recreated. Whatever already
/// sits at a destination path is replaced. When `dst` lies inside `src` its
/// subtree is left out of the walk.
///
/// Returns the destination paths written, sorted.
#[tracing::instrument(skip(runtime, options))]
pub fn copy<R: Runtime>(
    runtime: &R,
    pattern: &str,
    src: &Path,
    dst: &Path,
    options: &CopyOptions,
) -> Result<Vec<PathBuf>> {
    if !runtime.is_dir(src) {
        bail!("Build folder does not exist: {}", src.display());
    }

    let selection = Selection::new(pattern, &options.excludes)?;

    runtime.create_dir_all(dst)?;
    let src_real = real_path(runtime, src);
    let dst_real = real_path(runtime, dst);
    if src_real == dst_real {
        bail!(
            "Package folder must differ from the build folder: {}",
            src_real.display()
        );
    }

    let mut copied = Vec::new();
    // Each pending directory carries the resolved directories above it, so a
    // symlink back to one of them is not walked again.
    let mut pending = vec![(PathBuf::new(), vec![src_real.clone()])];

    while let Some((rel_dir, ancestors)) = pending.pop() {
        let mut entries = runtime.read_dir(&src.join(&rel_dir))?;
        entries.sort();

        for entry in entries {
            let Some(name) = entry.file_name() else {
                continue;
            };
            let rel = rel_dir.join(name);

            let is_link = options.links && runtime.is_symlink(&entry);
            if !is_link && runtime.is_dir(&entry) {
                let real = real_path(runtime, &entry);
                if real == dst_real {
                    debug!("Skipping package folder {} inside build folder", entry.display());
                } else if ancestors.contains(&real) {
                    debug!("Skipping symlink loop {} -> {}", entry.display(), real.display());
                } else {
                    let mut ancestors = ancestors.clone();
                    ancestors.push(real);
                    pending.push((rel, ancestors));
                }
                continue;
            }

            if !selection.matches(&rel)? {
                trace!("Not copying {}", rel.display());
                continue;
            }

            let target = if options.keep_path {
                dst.join(&rel)
            } else {
                dst.join(name)
            };
            prepare_parent(runtime, dst, &target)?;

            if is_link {
                let mut original = runtime.read_link(&entry)?;
                if options.keep_path
                    && original.is_absolute()
                    && is_path_under(&original, &src_real)
                {
                    if let Some(relative) = relative_to(&original, &src_real.join(&rel_dir)) {
                        original = relative;
                    }
                }
                copy_symlink(runtime, &original, &target)?;
            } else {
                clear_target(runtime, &target)?;
                runtime.copy(&entry, &target)?;
            }
            trace!("Copied {} -> {}", entry.display(), target.display());
            copied.push(target);
        }
    }

    copied.sort();
    Ok(copied)
}

fn real_path<R: Runtime>(runtime: &R, path: &Path) -> PathBuf {
    runtime
        .canonicalize(path)
        .unwrap_or_else(|_| normalize_path(path))
}

/// Make every directory between `dst` and `target` a real directory.
///
/// A stale symlink there would send the write outside the package folder,
/// and a stale file would make directory creation fail.
fn prepare_parent<R: Runtime>(runtime: &R, dst: &Path, target: &Path) -> Result<()> {
    let Some(parent) = target.parent() else {
        return Ok(());
    };

    if let Ok(rel) = parent.strip_prefix(dst) {
        let mut current = dst.to_path_buf();
        for component in rel.components() {
            current.push(component);
            if runtime.is_symlink(&current) {
                runtime.remove_symlink(&current)?;
            } else if runtime.exists(&current) && !runtime.is_dir(&current) {
                runtime.remove_file(&current)?;
            }
        }
    }

    runtime.create_dir_all(parent)
}

/// Remove a symlink or directory at `target` so a file write lands there
/// and nowhere else.
fn clear_target<R: Runtime>(runtime: &R, target: &Path) -> Result<()> {
    if runtime.is_symlink(target) {
        debug!("Replacing symlink {}", target.display());
        runtime.remove_symlink(target)
    } else if runtime.is_dir(target) {
        debug!("Replacing directory {}", target.display());
        runtime.remove_dir_all(target)
    } else {
        Ok(())
    }
}

fn copy_symlink<R: Runtime>(runtime: &R, original: &Path, target: &Path) -> Result<()> {
    clear_target(runtime, target)?;
    if runtime.exists(target) {
        runtime.remove_file(target)?;
    }
    runtime.symlink(original, target)
}
