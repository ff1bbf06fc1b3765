//! Component catalog.
//!
//! Describes the design-system components available to generated code so the
//! generator can be told what exists and where to import it from. Loaded
//! from a TOML file alongside the config.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// One catalog component.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    /// Exported component name.
    pub name: String,
    /// One-line description of what it renders.
    pub description: String,
    /// Module path to import it from.
    pub import_path: String,
    /// Prop names worth mentioning to the generator.
    #[serde(default)]
    pub props: Vec<String>,
}

/// The set of components generated code may build on.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComponentCatalog {
    /// All known components.
    #[serde(default, rename = "component")]
    pub components: Vec<CatalogEntry>,
}

impl ComponentCatalog {
    /// Load a catalog from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog file {}", path.display()))?;
        Self::from_toml(&contents)
    }

    /// Parse a catalog from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error on invalid TOML.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).context("failed to parse catalog TOML")
    }

    /// Render the catalog as prompt context, or `None` when empty.
    pub fn render_context(&self) -> Option<String> {
        if self.components.is_empty() {
            return None;
        }
        let mut out = String::from("Available components:\n");
        for entry in &self.components {
            out.push_str(&format!(
                "- {} (import from '{}'): {}",
                entry.name, entry.import_path, entry.description
            ));
            if !entry.props.is_empty() {
                out.push_str(&format!(" Props: {}.", entry.props.join(", ")));
            }
            out.push('\n');
        }
        Some(out)
    }
}
