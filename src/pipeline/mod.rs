//! Self-healing generation pipeline.
//!
//! Orchestrates generate -> autofix -> validate -> compile with bounded,
//! feedback-driven retries:
//! - a rejected candidate is regenerated with the validation errors attached,
//! - a compile failure is regenerated with the compiler diagnostic attached
//!   and the new candidate is revalidated before recompiling,
//! - a candidate that fails revalidation after a compile retry is fatal,
//!   since the generator is moving backwards.
//!
//! Both retry loops are independently capped; every attempt is recorded so
//! callers can see the full trail.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::compiler::{CompileError, CompiledArtifact, Compiler};
use crate::fixer;
use crate::generator::{Generator, GeneratorError};
use crate::validator::{ValidationReport, Validator};

pub mod feedback;

/// Hard ceiling on validation-driven regenerations, regardless of config.
pub const MAX_VALIDATION_RETRIES: u32 = 2;
/// Hard ceiling on compile-driven regenerations, regardless of config.
pub const MAX_COMPILE_RETRIES: u32 = 2;

// ---------------------------------------------------------------------------
// Attempt trail
// ---------------------------------------------------------------------------

/// Which pipeline stage an attempt or failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Static validation of a generated candidate.
    Validation,
    /// Compilation of an accepted candidate.
    Compile,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Compile => write!(f, "compile"),
        }
    }
}

/// Whether an attempt passed its stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The candidate passed the stage.
    Accepted,
    /// The candidate was rejected with the recorded errors.
    Rejected,
}

/// One recorded pipeline attempt.
#[derive(Debug, Clone)]
pub struct Attempt {
    /// The stage the attempt ran in.
    pub stage: Stage,
    /// Zero-based attempt index within that stage.
    pub index: u32,
    /// Whether the attempt passed.
    pub outcome: AttemptOutcome,
    /// Error messages for rejected attempts; empty when accepted.
    pub errors: Vec<String>,
}

// ---------------------------------------------------------------------------
// Request / result types
// ---------------------------------------------------------------------------

/// A request to generate one component.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// What the component should do, in natural language.
    pub instruction: String,
    /// Rendered catalog context to append to the instruction, if any.
    pub catalog_context: Option<String>,
}

impl GenerationRequest {
    fn render_instruction(&self) -> String {
        match &self.catalog_context {
            Some(context) => format!("{}\n\n{context}", self.instruction),
            None => self.instruction.clone(),
        }
    }
}

/// A successfully generated, validated, and compiled component.
#[derive(Debug, Clone)]
pub struct PipelineSuccess {
    /// The accepted source, after auto-fixing.
    pub source: String,
    /// The compiled artifact.
    pub artifact: CompiledArtifact,
    /// Non-blocking validation warnings on the accepted source.
    pub warnings: Vec<String>,
    /// Every attempt made, in order.
    pub attempts: Vec<Attempt>,
}

/// Pipeline failure.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The generator itself failed; no retry can help.
    #[error(transparent)]
    Generation(#[from] GeneratorError),
    /// The compiler could not be run at all.
    #[error(transparent)]
    Compile(#[from] CompileError),
    /// A retry budget ran out, or a revalidation regression made further
    /// retries pointless.
    #[error("{stage} retries exhausted after {} attempts", attempts.len())]
    RetryExhausted {
        /// The stage whose budget ran out.
        stage: Stage,
        /// Accumulated error messages across the failed attempts.
        errors: Vec<String>,
        /// Every attempt made, in order.
        attempts: Vec<Attempt>,
    },
}

// ---------------------------------------------------------------------------
// Retry budget
// ---------------------------------------------------------------------------

/// Configured retry counts, clamped to the hard ceilings at use.
#[derive(Debug, Clone, Copy)]
pub struct RetryBudget {
    /// Requested validation-driven regenerations.
    pub validation_retries: u32,
    /// Requested compile-driven regenerations.
    pub compile_retries: u32,
}

impl Default for RetryBudget {
    fn default() -> Self {
        Self {
            validation_retries: MAX_VALIDATION_RETRIES,
            compile_retries: MAX_COMPILE_RETRIES,
        }
    }
}

impl RetryBudget {
    /// Effective validation retry cap.
    pub fn validation_cap(&self) -> u32 {
        self.validation_retries.min(MAX_VALIDATION_RETRIES)
    }

    /// Effective compile retry cap.
    pub fn compile_cap(&self) -> u32 {
        self.compile_retries.min(MAX_COMPILE_RETRIES)
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// The self-healing generation pipeline.
///
/// Holds its collaborators behind trait objects so tests can script the
/// generator and compiler.
pub struct SelfHealingPipeline {
    generator: Arc<dyn Generator>,
    compiler: Arc<dyn Compiler>,
    validator: Validator,
    budget: RetryBudget,
}

impl SelfHealingPipeline {
    /// Create a pipeline over the given collaborators.
    pub fn new(
        generator: Arc<dyn Generator>,
        compiler: Arc<dyn Compiler>,
        validator: Validator,
        budget: RetryBudget,
    ) -> Self {
        Self {
            generator,
            compiler,
            validator,
            budget,
        }
    }

    /// Run one request through the full pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::RetryExhausted`] when a stage's budget runs
    /// out or a compile-retry candidate regresses at revalidation,
    /// [`PipelineError::Generation`] / [`PipelineError::Compile`] when a
    /// collaborator fails outright.
    pub async fn run(&self, request: &GenerationRequest) -> Result<PipelineSuccess, PipelineError> {
        let instruction = request.render_instruction();
        let mut attempts: Vec<Attempt> = Vec::new();

        // Validation loop: one initial attempt plus capped regenerations.
        let strategies = feedback::plan(self.budget.validation_cap());
        let mut accumulated: Vec<String> = Vec::new();
        let mut index: u32 = 0;

        let mut source = self.produce(&instruction).await?;
        let mut report = self.validator.validate(&source);
        record(&mut attempts, Stage::Validation, index, &report);

        let mut used: usize = 0;
        while !report.is_valid() {
            accumulated.extend(report.errors());
            let Some(strategy) = strategies.get(used) else {
                warn!(stage = %Stage::Validation, attempts = attempts.len(), "retry budget exhausted");
                return Err(PipelineError::RetryExhausted {
                    stage: Stage::Validation,
                    errors: accumulated,
                    attempts,
                });
            };
            info!(attempt = index, strategy = %strategy, "regenerating after validation rejection");
            let prompt =
                feedback::compose_validation(&instruction, &source, &report.errors(), *strategy);
            source = self.produce(&prompt).await?;
            report = self.validator.validate(&source);
            index = index.saturating_add(1);
            used = used.saturating_add(1);
            record(&mut attempts, Stage::Validation, index, &report);
        }

        let mut warnings = report.warnings();
        for warning in &warnings {
            warn!(%warning, "accepted with validation warning");
        }

        // Compile loop: each diagnostic buys one regenerate-and-revalidate
        // cycle, up to the cap. A revalidation failure here is fatal.
        let strategies = feedback::plan(self.budget.compile_cap());
        let mut accumulated: Vec<String> = Vec::new();
        let mut compile_index: u32 = 0;
        let mut used: usize = 0;

        loop {
            match self.compiler.compile(&source).await {
                Ok(artifact) => {
                    attempts.push(Attempt {
                        stage: Stage::Compile,
                        index: compile_index,
                        outcome: AttemptOutcome::Accepted,
                        errors: Vec::new(),
                    });
                    info!(attempts = attempts.len(), "component compiled");
                    return Ok(PipelineSuccess {
                        source,
                        artifact,
                        warnings,
                        attempts,
                    });
                }
                Err(CompileError::Diagnostic(diagnostic)) => {
                    attempts.push(Attempt {
                        stage: Stage::Compile,
                        index: compile_index,
                        outcome: AttemptOutcome::Rejected,
                        errors: vec![diagnostic.clone()],
                    });
                    accumulated.push(diagnostic.clone());
                    let Some(strategy) = strategies.get(used) else {
                        warn!(stage = %Stage::Compile, attempts = attempts.len(), "retry budget exhausted");
                        return Err(PipelineError::RetryExhausted {
                            stage: Stage::Compile,
                            errors: accumulated,
                            attempts,
                        });
                    };
                    info!(attempt = compile_index, strategy = %strategy, "regenerating after compile failure");
                    let prompt =
                        feedback::compose_compile(&instruction, &source, &diagnostic, *strategy);
                    source = self.produce(&prompt).await?;
                    report = self.validator.validate(&source);
                    index = index.saturating_add(1);
                    record(&mut attempts, Stage::Validation, index, &report);
                    if !report.is_valid() {
                        warn!("compile-retry candidate failed revalidation, aborting");
                        accumulated.extend(report.errors());
                        return Err(PipelineError::RetryExhausted {
                            stage: Stage::Compile,
                            errors: accumulated,
                            attempts,
                        });
                    }
                    warnings = report.warnings();
                    compile_index = compile_index.saturating_add(1);
                    used = used.saturating_add(1);
                }
                // Io/Forbidden mean the build cannot run at all; no
                // regenerated candidate fixes that.
                Err(other) => return Err(PipelineError::Compile(other)),
            }
        }
    }

    /// Generate one candidate and run the auto-fixer over it.
    async fn produce(&self, prompt: &str) -> Result<String, PipelineError> {
        let raw = self.generator.generate(prompt).await?;
        let fixed = fixer::autofix(&raw);
        for fix in &fixed.fixes {
            info!(%fix, "auto-fix applied");
        }
        Ok(fixed.code)
    }
}

fn record(attempts: &mut Vec<Attempt>, stage: Stage, index: u32, report: &ValidationReport) {
    let outcome = if report.is_valid() {
        AttemptOutcome::Accepted
    } else {
        AttemptOutcome::Rejected
    };
    attempts.push(Attempt {
        stage,
        index,
        outcome,
        errors: report.errors(),
    });
}
