//! Host side of the recipe contract.
//!
//! The host owns the folder layout and drives a recipe through its lifecycle:
//! stage first, then report. Everything runs synchronously on the caller's
//! thread and errors are returned as they come.

use anyhow::{Context, Result};
use log::{debug, info};
use std::path::PathBuf;

use crate::info::{PackageInfo, PackageManifest};
use crate::recipe::{PackageContext, Recipe};
use crate::runtime::Runtime;

/// Where the build output lives and where the package is assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub build_folder: PathBuf,
    pub package_folder: PathBuf,
}

impl Layout {
    pub fn new(build_folder: impl Into<PathBuf>, package_folder: impl Into<PathBuf>) -> Self {
        Self {
            build_folder: build_folder.into(),
            package_folder: package_folder.into(),
        }
    }
}

/// Result of a full export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOutcome {
    pub manifest: PackageManifest,
    pub manifest_path: PathBuf,
}

pub struct Host<R: Runtime> {
    runtime: R,
    layout: Layout,
}

impl<R: Runtime> Host<R> {
    pub fn new(runtime: R, layout: Layout) -> Self {
        Self { runtime, layout }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    fn context(&self) -> PackageContext<'_, R> {
        PackageContext::new(
            &self.runtime,
            &self.layout.build_folder,
            &self.layout.package_folder,
        )
    }

    /// Run the recipe's `package` hook into a freshly created package folder.
    #[tracing::instrument(skip(self, recipe))]
    pub fn stage<T: Recipe>(&self, recipe: &T) -> Result<()> {
        let reference = recipe.metadata().reference()?;
        info!(
            "Packaging {} from {} into {}",
            reference,
            self.layout.build_folder.display(),
            self.layout.package_folder.display()
        );

        self.runtime
            .create_dir_all(&self.layout.package_folder)
            .with_context(|| format!("Cannot prepare package folder for {}", reference))?;
        recipe.package(&self.context())
    }

    /// Run the recipe's `package_info` hook over the package folder.
    #[tracing::instrument(skip(self, recipe))]
    pub fn report<T: Recipe>(&self, recipe: &T) -> Result<PackageInfo> {
        let mut info = PackageInfo::new(self.layout.package_folder.clone());
        recipe.package_info(&self.context(), &mut info)?;
        debug!("{} exports libs {:?}", recipe.metadata().name, info.libs);
        Ok(info)
    }

    /// Stage, report, and write the package manifest.
    #[tracing::instrument(skip(self, recipe))]
    pub fn export<T: Recipe>(&self, recipe: &T) -> Result<ExportOutcome> {
        self.stage(recipe)?;
        let info = self.report(recipe)?;

        let manifest = PackageManifest {
            reference: recipe.metadata().reference()?,
            metadata: recipe.metadata().clone(),
            info,
        };
        let manifest_path = manifest.save(&self.runtime, &self.layout.package_folder)?;
        info!("Wrote {}", manifest_path.display());

        Ok(ExportOutcome {
            manifest,
            manifest_path,
        })
    }
}
