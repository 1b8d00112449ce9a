use anyhow::Result;
use log::debug;

use super::{Metadata, PackageContext, Recipe};
use crate::info::PackageInfo;
use crate::runtime::Runtime;

/// Recipe for the DDoSDetector package.
///
/// Ships whatever the build produced, untouched, and exports every library
/// found in the package as its link interface.
#[derive(Debug, Clone)]
pub struct DDoSDetectorRecipe {
    metadata: Metadata,
}

impl Default for DDoSDetectorRecipe {
    fn default() -> Self {
        Self::new()
    }
}

impl DDoSDetectorRecipe {
    pub fn new() -> Self {
        let mut metadata = Metadata::new("DDoSDetector", "0.1");
        metadata.description = Some("DDoS Detector".to_string());
        Self { metadata }
    }
}

impl Recipe for DDoSDetectorRecipe {
    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    #[tracing::instrument(skip(self, ctx))]
    fn package<R: Runtime>(&self, ctx: &PackageContext<'_, R>) -> Result<()> {
        let copied = ctx.copy("*")?;
        debug!("Staged {} file(s) for {}", copied.len(), self.metadata.name);
        Ok(())
    }

    #[tracing::instrument(skip(self, ctx, info))]
    fn package_info<R: Runtime>(
        &self,
        ctx: &PackageContext<'_, R>,
        info: &mut PackageInfo,
    ) -> Result<()> {
        info.libs = ctx.collect_libs(info)?;
        Ok(())
    }
}
