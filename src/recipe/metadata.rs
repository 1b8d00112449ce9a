use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a package as seen by consumers.
///
/// Unset advisory fields are `None`; only `name` and `version` are needed to
/// resolve the package.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub name: String,
    pub version: String,
    pub description: Option<String>,
    pub license: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub topics: Option<Vec<String>>,
    pub settings: Option<Vec<String>>,
}

impl Metadata {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: None,
            license: None,
            author: None,
            url: None,
            topics: None,
            settings: None,
        }
    }

    /// `name/version`, the key consumers resolve the package by.
    pub fn reference(&self) -> Result<String> {
        if self.name.trim().is_empty() {
            bail!("Package name is not set");
        }
        if self.version.trim().is_empty() {
            bail!("Package version of '{}' is not set", self.name);
        }
        Ok(format!("{}/{}", self.name, self.version))
    }
}

fn or_none(value: Option<&str>) -> &str {
    value.unwrap_or("None")
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "name: {}", self.name)?;
        writeln!(f, "version: {}", self.version)?;
        writeln!(f, "description: {}", or_none(self.description.as_deref()))?;
        writeln!(f, "license: {}", or_none(self.license.as_deref()))?;
        writeln!(f, "author: {}", or_none(self.author.as_deref()))?;
        writeln!(f, "url: {}", or_none(self.url.as_deref()))?;
        match &self.topics {
            Some(topics) => writeln!(f, "topics: {}", topics.join(", "))?,
            None => writeln!(f, "topics: None")?,
        }
        match &self.settings {
            Some(settings) => write!(f, "settings: {}", settings.join(", ")),
            None => write!(f, "settings: None"),
        }
    }
}
