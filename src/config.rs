//! Configuration types and defaults for AnnoCore
//!
//! Everything here is plain data: the namespace root the application IRIs
//! hang off, and the prefixes used when deriving css and category names.

use serde::{Deserialize, Serialize};

use crate::error::{AnnoError, Result};
use crate::ld::ns::{Namespaces, DEFAULT_ROOT};

// =============================================================================
// Main Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnnoConfig {
    /// Root IRI of the application namespaces. Default: `http://localhost:8000/`
    pub namespace_root: String,
    /// Middle part of css names of ontology classes (`is-<prefix>-<label>`). Default: `readit`
    pub css_prefix: String,
    /// Prefix of the filter tags. Default: `category-`
    pub category_prefix: String,
    /// Preferred label languages, most preferred first. Labels in other
    /// languages are used only when none of these is present. Default: `["en"]`
    pub languages: Vec<String>,
}

impl Default for AnnoConfig {
    fn default() -> Self {
        Self {
            namespace_root: DEFAULT_ROOT.to_string(),
            css_prefix: "readit".to_string(),
            category_prefix: "category-".to_string(),
            languages: vec!["en".to_string()],
        }
    }
}

impl AnnoConfig {
    /// Configuration for a deployment under `root`.
    pub fn for_root(root: impl Into<String>) -> Self {
        Self {
            namespace_root: root.into(),
            ..Self::default()
        }
    }

    /// Parse a (possibly partial) JSON configuration; missing keys keep
    /// their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.namespace_root.is_empty() {
            return Err(AnnoError::Config("namespaceRoot must not be empty".into()));
        }
        if !self.namespace_root.ends_with('/') && !self.namespace_root.ends_with('#') {
            return Err(AnnoError::Config(format!(
                "namespaceRoot must end with '/' or '#', got {:?}",
                self.namespace_root
            )));
        }
        if self.css_prefix.is_empty() {
            return Err(AnnoError::Config("cssPrefix must not be empty".into()));
        }
        Ok(())
    }

    pub fn namespaces(&self) -> Namespaces {
        Namespaces::from_root(&self.namespace_root)
    }
}
