//! Validation-driven self-healing behavior.

use tessier::pipeline::{AttemptOutcome, PipelineError, RetryBudget, Stage};

use crate::stubs::{pipeline, request, ScriptedCompiler, ScriptedGenerator, INVALID_SOURCE, VALID_SOURCE};

#[tokio::test]
async fn valid_first_candidate_needs_no_regeneration() {
    let generator = ScriptedGenerator::new(&[VALID_SOURCE]);
    let compiler = ScriptedCompiler::failing(0);
    let p = pipeline(generator.clone(), compiler, RetryBudget::default());

    let success = p.run(&request()).await.expect("should succeed");
    assert_eq!(generator.call_count(), 1);
    assert_eq!(success.source, VALID_SOURCE);
    assert!(success.warnings.is_empty());
}

#[tokio::test]
async fn rejected_candidate_is_regenerated_with_targeted_feedback() {
    let generator = ScriptedGenerator::new(&[INVALID_SOURCE, VALID_SOURCE]);
    let compiler = ScriptedCompiler::failing(0);
    let p = pipeline(generator.clone(), compiler, RetryBudget::default());

    let success = p.run(&request()).await.expect("should succeed");
    assert_eq!(generator.call_count(), 2);

    // The first regeneration carries the prior source, its errors, and asks
    // for a targeted fix.
    let retry_prompt = generator.prompt(1);
    assert!(retry_prompt.contains("Build a greeting button"));
    assert!(retry_prompt.contains("fetch()"));
    assert!(retry_prompt.contains("export const Leak"));
    assert!(retry_prompt.contains("Keep everything else unchanged"));

    let validation_attempts: Vec<_> = success
        .attempts
        .iter()
        .filter(|a| a.stage == Stage::Validation)
        .collect();
    assert_eq!(validation_attempts.len(), 2);
    assert_eq!(validation_attempts[0].outcome, AttemptOutcome::Rejected);
    assert!(validation_attempts[0].errors.iter().any(|e| e.contains("fetch()")));
    assert_eq!(validation_attempts[1].outcome, AttemptOutcome::Accepted);
}

#[tokio::test]
async fn exhaustion_with_cap_one_reports_both_attempts() {
    let generator = ScriptedGenerator::new(&[INVALID_SOURCE]);
    let compiler = ScriptedCompiler::failing(0);
    let budget = RetryBudget {
        validation_retries: 1,
        compile_retries: 2,
    };
    let p = pipeline(generator.clone(), compiler.clone(), budget);

    let err = p.run(&request()).await.expect_err("should exhaust");
    // Initial attempt plus exactly one regeneration; nothing ever compiled.
    assert_eq!(generator.call_count(), 2);
    assert_eq!(compiler.call_count(), 0);

    // With a single retry the one regeneration must be the rewrite.
    assert!(generator.prompt(1).contains("Discard the previous code"));

    match err {
        PipelineError::RetryExhausted {
            stage,
            errors,
            attempts,
        } => {
            assert_eq!(stage, Stage::Validation);
            assert_eq!(errors.len(), 2, "both attempts' errors listed: {errors:?}");
            assert_eq!(attempts.len(), 2);
            assert!(attempts
                .iter()
                .all(|a| a.outcome == AttemptOutcome::Rejected));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn default_budget_allows_two_regenerations_then_stops() {
    let generator = ScriptedGenerator::new(&[INVALID_SOURCE]);
    let compiler = ScriptedCompiler::failing(0);
    let p = pipeline(generator.clone(), compiler, RetryBudget::default());

    let err = p.run(&request()).await.expect_err("should exhaust");
    assert_eq!(generator.call_count(), 3);
    // Escalation: targeted fix first, rewrite last.
    assert!(generator.prompt(1).contains("Keep everything else unchanged"));
    assert!(generator.prompt(2).contains("Discard the previous code"));
    assert!(matches!(
        err,
        PipelineError::RetryExhausted {
            stage: Stage::Validation,
            ..
        }
    ));
}

#[tokio::test]
async fn generated_source_is_autofixed_before_validation() {
    // Missing react import plus a lowercase handler: both are fixer
    // territory, so validation must accept the repaired candidate.
    let unfixed =
        "export const Save = ({ go }) => {\n  return <button onclick={go}>save</button>;\n};";
    let generator = ScriptedGenerator::new(&[unfixed]);
    let compiler = ScriptedCompiler::failing(0);
    let p = pipeline(generator.clone(), compiler, RetryBudget::default());

    let success = p.run(&request()).await.expect("should succeed");
    assert_eq!(generator.call_count(), 1);
    assert!(success.source.starts_with("import React from 'react';"));
    assert!(success.source.contains("onClick={go}"));
}

#[tokio::test]
async fn warnings_surface_without_blocking() {
    let with_warning = "import React from 'react';\n\nexport const Pic = () => {\n  return <img src=\"cat.png\" />;\n};";
    let generator = ScriptedGenerator::new(&[with_warning]);
    let compiler = ScriptedCompiler::failing(0);
    let p = pipeline(generator, compiler, RetryBudget::default());

    let success = p.run(&request()).await.expect("warnings must not block");
    assert_eq!(success.warnings.len(), 1);
    assert!(success.warnings[0].contains("alternative text"));
}
