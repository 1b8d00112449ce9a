//! The info record a recipe fills in for downstream consumers.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::recipe::Metadata;
use crate::runtime::Runtime;

/// Name of the manifest the host writes into the package folder.
pub const PACKAGE_INFO_FILE: &str = "package_info.json";

/// Link interface of a staged package.
///
/// Directory fields are relative to `rootpath`; `.` is the package root itself.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PackageInfo {
    pub rootpath: PathBuf,
    pub libs: Vec<String>,
    pub libdirs: Vec<String>,
    pub includedirs: Vec<String>,
    pub bindirs: Vec<String>,
}

impl PackageInfo {
    pub fn new(rootpath: impl Into<PathBuf>) -> Self {
        Self {
            rootpath: rootpath.into(),
            libs: Vec::new(),
            libdirs: vec![".".to_string(), "lib".to_string()],
            includedirs: vec!["include".to_string()],
            bindirs: vec!["bin".to_string()],
        }
    }
}

/// What the host publishes next to the staged files.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PackageManifest {
    pub reference: String,
    pub metadata: Metadata,
    pub info: PackageInfo,
}

impl PackageManifest {
    #[tracing::instrument(skip(runtime, self))]
    pub fn save<R: Runtime>(&self, runtime: &R, package_folder: &Path) -> Result<PathBuf> {
        let path = package_folder.join(PACKAGE_INFO_FILE);
        let json = serde_json::to_string_pretty(self)?;
        runtime.write(&path, json.as_bytes())?;
        Ok(path)
    }

    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        let content = runtime.read_to_string(path)?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid package manifest {}", path.display()))
    }
}
