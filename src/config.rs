//! Configuration loading and management.
//!
//! Loads configuration from `./tessier.toml` (or `$TESSIER_CONFIG_PATH`).
//! Environment variables override file values; file values override defaults.
//!
//! Precedence: env vars > config file > defaults.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::validator::ImportPolicy;

// ── Top-level config ────────────────────────────────────────────

/// Top-level configuration loaded from TOML.
///
/// Path: `./tessier.toml` or `$TESSIER_CONFIG_PATH`.
/// Env vars override file values; file values override defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TessierConfig {
    /// Pipeline retry and workspace settings (`[pipeline]`).
    pub pipeline: PipelineConfig,
    /// Import policy for generated code (`[policy]`).
    pub policy: ImportPolicy,
    /// Generator settings (`[generator]`).
    pub generator: GeneratorConfig,
    /// Compiler settings (`[compiler]`).
    pub compiler: CompilerConfig,
}

impl TessierConfig {
    /// Load configuration with precedence: env vars > TOML file > defaults.
    ///
    /// Config file path: `$TESSIER_CONFIG_PATH` or `./tessier.toml`.
    /// If the file does not exist, returns defaults.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from_file()?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load from TOML file only, no env overrides.
    fn load_from_file() -> Result<Self> {
        let path = Self::config_path_with(|key| std::env::var(key).ok());
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                tracing::info!(path = %path.display(), "loading config from file");
                let config: TessierConfig =
                    toml::from_str(&contents).context("failed to parse config TOML")?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("no config file found, using defaults");
                Ok(TessierConfig::default())
            }
            Err(e) => Err(anyhow::anyhow!("failed to read config file: {e}")),
        }
    }

    /// Resolve config path using a custom env resolver (for testing).
    fn config_path_with(env: impl Fn(&str) -> Option<String>) -> PathBuf {
        match env("TESSIER_CONFIG_PATH") {
            Some(p) => PathBuf::from(p),
            None => PathBuf::from("tessier.toml"),
        }
    }

    /// Apply environment variable overrides (env > config > defaults).
    ///
    /// Takes a resolver function for testability (avoids unsafe `set_var` in tests).
    fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        // Pipeline.
        if let Some(v) = env("TESSIER_MAX_VALIDATION_RETRIES") {
            match v.parse() {
                Ok(n) => self.pipeline.max_validation_retries = n,
                Err(_) => tracing::warn!(
                    var = "TESSIER_MAX_VALIDATION_RETRIES",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }
        if let Some(v) = env("TESSIER_MAX_COMPILE_RETRIES") {
            match v.parse() {
                Ok(n) => self.pipeline.max_compile_retries = n,
                Err(_) => tracing::warn!(
                    var = "TESSIER_MAX_COMPILE_RETRIES",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }

        // Generator (env var presence sets the key).
        if let Some(v) = env("TESSIER_ANTHROPIC_API_KEY") {
            self.generator.api_key = Some(v);
        }
        if let Some(v) = env("TESSIER_MODEL") {
            self.generator.model = v;
        }

        // Compiler.
        if let Some(v) = env("TESSIER_WORKDIR") {
            self.compiler.workdir = v;
        }
        if let Some(v) = env("TESSIER_BUILD_COMMAND") {
            self.compiler.build_command = v;
        }
    }

    /// Parse a TOML string into config (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: TessierConfig =
            toml::from_str(toml_str).context("failed to parse config TOML")?;
        Ok(config)
    }
}

// ── Pipeline config ─────────────────────────────────────────────

/// Pipeline retry and workspace settings (`[pipeline]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Tracing log level filter.
    pub log_level: String,
    /// Validation-driven regeneration budget (clamped to the hard ceiling).
    pub max_validation_retries: u32,
    /// Compile-driven regeneration budget (clamped to the hard ceiling).
    pub max_compile_retries: u32,
    /// Path to the catalog TOML, if one should be loaded.
    pub catalog_path: Option<String>,
    /// Directory for rotated JSON log files.
    pub logs_dir: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            max_validation_retries: 2,
            max_compile_retries: 2,
            catalog_path: None,
            logs_dir: "logs".to_string(),
        }
    }
}

// ── Generator config ────────────────────────────────────────────

/// Generator settings (`[generator]`).
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Model name.
    pub model: String,
    /// API key; usually supplied via `TESSIER_ANTHROPIC_API_KEY`.
    pub api_key: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-20250514".to_string(),
            api_key: None,
        }
    }
}

impl std::fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "__REDACTED__"))
            .finish()
    }
}

// ── Compiler config ─────────────────────────────────────────────

/// Compiler settings (`[compiler]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Working directory the build runs in.
    pub workdir: String,
    /// Entry file the candidate source is written to, relative to workdir.
    pub entry_file: String,
    /// Shell command that builds the project.
    pub build_command: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            workdir: ".".to_string(),
            entry_file: "src/Generated.tsx".to_string(),
            build_command: "npx tsc --noEmit".to_string(),
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────
