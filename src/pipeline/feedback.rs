//! Regeneration feedback composition.
//!
//! When a candidate is rejected, the next generation request carries the
//! rejection details plus an escalating repair strategy: early retries ask
//! for a targeted fix of the previous source, the final retry asks for a
//! minimal rewrite that drops everything inessential.

use std::fmt;

/// How the generator should approach a regeneration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackStrategy {
    /// Patch the previous source, changing only what the errors name.
    TargetedFix,
    /// Start over with the smallest component that satisfies the request.
    MinimalRewrite,
}

impl fmt::Display for FeedbackStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetedFix => write!(f, "targeted-fix"),
            Self::MinimalRewrite => write!(f, "minimal-rewrite"),
        }
    }
}

/// The strategy for each retry slot under a cap of `retries`.
///
/// The last slot always escalates to a rewrite; everything before it asks
/// for targeted fixes. With a single retry the only attempt is the rewrite.
pub fn plan(retries: u32) -> Vec<FeedbackStrategy> {
    let mut strategies = Vec::new();
    for _ in 1..retries {
        strategies.push(FeedbackStrategy::TargetedFix);
    }
    if retries > 0 {
        strategies.push(FeedbackStrategy::MinimalRewrite);
    }
    strategies
}

/// Compose a regeneration instruction after a validation rejection.
pub fn compose_validation(
    instruction: &str,
    previous_source: &str,
    errors: &[String],
    strategy: FeedbackStrategy,
) -> String {
    let error_list = bulleted(errors);
    match strategy {
        FeedbackStrategy::TargetedFix => format!(
            "{instruction}\n\n\
             Your previous attempt was rejected by static validation.\n\n\
             Previous source:\n{previous_source}\n\n\
             Validation errors:\n{error_list}\n\
             Fix exactly these issues. Keep everything else unchanged."
        ),
        FeedbackStrategy::MinimalRewrite => format!(
            "{instruction}\n\n\
             Previous attempts kept failing static validation with errors \
             such as:\n{error_list}\n\
             Discard the previous code. Write the smallest component that \
             satisfies the request without triggering these errors."
        ),
    }
}

/// Compose a regeneration instruction after a compilation failure.
pub fn compose_compile(
    instruction: &str,
    previous_source: &str,
    diagnostic: &str,
    strategy: FeedbackStrategy,
) -> String {
    match strategy {
        FeedbackStrategy::TargetedFix => format!(
            "{instruction}\n\n\
             Your previous attempt failed to compile.\n\n\
             Previous source:\n{previous_source}\n\n\
             Compiler output:\n{diagnostic}\n\n\
             Fix exactly what the compiler reports. Keep everything else \
             unchanged."
        ),
        FeedbackStrategy::MinimalRewrite => format!(
            "{instruction}\n\n\
             Previous attempts kept failing compilation. Last compiler \
             output:\n{diagnostic}\n\n\
             Discard the previous code. Write the smallest component that \
             satisfies the request and compiles cleanly."
        ),
    }
}

fn bulleted(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}\n"))
        .collect::<String>()
}
