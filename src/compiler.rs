//! Compilation stage.
//!
//! [`Compiler`] turns validated component source into a deployable artifact.
//! The shipped implementation writes the source to an entry file inside a
//! sandboxed working directory and runs a configured build command over it;
//! stderr of a failing build becomes the diagnostic the pipeline feeds back
//! to the generator.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::process::Command;
use uuid::Uuid;

/// Errors returned by compiler implementations.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The build tool rejected the source.
    #[error("compilation failed: {0}")]
    Diagnostic(String),
    /// The build could not be run at all.
    #[error("compiler io error: {0}")]
    Io(#[from] std::io::Error),
    /// The requested paths escape the sandbox.
    #[error("forbidden: {0}")]
    Forbidden(String),
}

/// Metadata attached to a successful compilation.
#[derive(Debug, Clone)]
pub struct ArtifactMetadata {
    /// Unique id assigned to the artifact.
    pub artifact_id: Uuid,
    /// When the artifact was produced.
    pub compiled_at: DateTime<Utc>,
    /// The command line that produced it.
    pub build_command: String,
}

/// A compiled component ready for deployment.
#[derive(Debug, Clone)]
pub struct CompiledArtifact {
    /// The source that compiled, byte-for-byte as submitted.
    pub source: String,
    /// Provenance for the build.
    pub metadata: ArtifactMetadata,
}

/// Compiles component source into an artifact.
///
/// [`CompileError::Diagnostic`] rejects the source and its message feeds the
/// pipeline's regeneration loop. [`CompileError::Io`] and
/// [`CompileError::Forbidden`] mean the build environment itself is broken —
/// no regenerated candidate can repair that, so the pipeline aborts instead
/// of retrying.
#[async_trait]
pub trait Compiler: Send + Sync {
    /// Compile the given source.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::Diagnostic`] with the tool's output when the
    /// source does not compile, [`CompileError::Io`] when the build cannot
    /// run.
    async fn compile(&self, source: &str) -> Result<CompiledArtifact, CompileError>;
}

// ---------------------------------------------------------------------------
// Command-based implementation
// ---------------------------------------------------------------------------

const MAX_DIAGNOSTIC_CHARS: usize = 4000;

/// Compiler that shells out to a project build command.
#[derive(Debug, Clone)]
pub struct CommandCompiler {
    workdir: PathBuf,
    entry_file: PathBuf,
    build_command: String,
}

impl CommandCompiler {
    /// Create a command compiler rooted at `workdir`.
    ///
    /// `entry_file` is where the candidate source is written before the
    /// build runs, relative to `workdir`.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::Forbidden`] when `entry_file` resolves
    /// outside `workdir`.
    pub fn new(
        workdir: PathBuf,
        entry_file: PathBuf,
        build_command: String,
    ) -> Result<Self, CompileError> {
        let entry_file = resolve_entry_file(&workdir, &entry_file)?;
        Ok(Self {
            workdir,
            entry_file,
            build_command,
        })
    }
}

/// Resolve the entry file relative to the working directory, with path
/// traversal protection.
///
/// # Errors
///
/// Returns `CompileError::Forbidden` when the requested path would escape
/// the working directory.
#[doc(hidden)]
pub fn resolve_entry_file(workdir: &Path, requested: &Path) -> Result<PathBuf, CompileError> {
    let resolved = if requested.is_absolute() {
        requested.to_path_buf()
    } else {
        workdir.join(requested)
    };

    // Canonicalize would require the path to exist. Instead, check
    // that the normalized path starts with the working directory.
    let normalized = normalize_path(&resolved);
    let workdir_normalized = normalize_path(workdir);

    if !normalized.starts_with(&workdir_normalized) {
        return Err(CompileError::Forbidden(format!(
            "entry file '{}' escapes working directory '{}'",
            requested.display(),
            workdir.display()
        )));
    }

    Ok(normalized)
}

/// Normalize a path by resolving `.` and `..` components without filesystem access.
fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            std::path::Component::ParentDir => {
                components.pop();
            }
            std::path::Component::CurDir => {}
            other => components.push(other),
        }
    }
    components.iter().collect()
}

fn truncate_diagnostic(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.chars().count() <= MAX_DIAGNOSTIC_CHARS {
        return trimmed.to_owned();
    }
    let shortened = trimmed.chars().take(MAX_DIAGNOSTIC_CHARS).collect::<String>();
    format!("{shortened}...[truncated]")
}

#[async_trait]
impl Compiler for CommandCompiler {
    async fn compile(&self, source: &str) -> Result<CompiledArtifact, CompileError> {
        tokio::fs::write(&self.entry_file, source).await?;

        let output = Command::new("sh")
            .arg("-c")
            .arg(&self.build_command)
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let diagnostic = if stderr.trim().is_empty() {
                String::from_utf8_lossy(&output.stdout).into_owned()
            } else {
                stderr.into_owned()
            };
            return Err(CompileError::Diagnostic(truncate_diagnostic(&diagnostic)));
        }

        Ok(CompiledArtifact {
            source: source.to_owned(),
            metadata: ArtifactMetadata {
                artifact_id: Uuid::new_v4(),
                compiled_at: Utc::now(),
                build_command: self.build_command.clone(),
            },
        })
    }
}
