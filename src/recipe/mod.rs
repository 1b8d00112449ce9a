//! Package recipes.
//!
//! A recipe declares package identity and implements two lifecycle hooks that
//! the host calls once per build, in order: [`Recipe::package`] stages the
//! build output, then [`Recipe::package_info`] publishes the link interface.

mod ddos_detector;
mod metadata;

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::info::PackageInfo;
use crate::runtime::Runtime;
use crate::tools::{self, CopyOptions};

pub use ddos_detector::DDoSDetectorRecipe;
pub use metadata::Metadata;

/// Plugin contract between a recipe and the host.
pub trait Recipe {
    fn metadata(&self) -> &Metadata;

    /// Stage build outputs into the package folder.
    fn package<R: Runtime>(&self, ctx: &PackageContext<'_, R>) -> Result<()>;

    /// Fill in the info record consumers link against.
    fn package_info<R: Runtime>(
        &self,
        ctx: &PackageContext<'_, R>,
        info: &mut PackageInfo,
    ) -> Result<()>;
}

/// Folders and tools the host hands to a recipe hook.
pub struct PackageContext<'a, R: Runtime> {
    runtime: &'a R,
    build_folder: &'a Path,
    package_folder: &'a Path,
}

impl<'a, R: Runtime> PackageContext<'a, R> {
    pub fn new(runtime: &'a R, build_folder: &'a Path, package_folder: &'a Path) -> Self {
        Self {
            runtime,
            build_folder,
            package_folder,
        }
    }

    /// Copy files matching `pattern` from the build folder into the package folder.
    pub fn copy(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        self.copy_with(pattern, &CopyOptions::default())
    }

    pub fn copy_with(&self, pattern: &str, options: &CopyOptions) -> Result<Vec<PathBuf>> {
        tools::copy(
            self.runtime,
            pattern,
            self.build_folder,
            self.package_folder,
            options,
        )
    }

    /// Library names found in the libdirs of `info`.
    pub fn collect_libs(&self, info: &PackageInfo) -> Result<Vec<String>> {
        tools::collect_libs(self.runtime, self.package_folder, &info.libdirs)
    }
}
