//! Compile-driven retry behavior.

use tessier::pipeline::{AttemptOutcome, PipelineError, RetryBudget, Stage};

use crate::stubs::{pipeline, request, ScriptedCompiler, ScriptedGenerator, INVALID_SOURCE, VALID_SOURCE};

#[tokio::test]
async fn diagnostic_feeds_the_regeneration_prompt() {
    let generator = ScriptedGenerator::new(&[VALID_SOURCE, VALID_SOURCE]);
    let compiler = ScriptedCompiler::failing(1);
    let p = pipeline(generator.clone(), compiler.clone(), RetryBudget::default());

    let success = p.run(&request()).await.expect("should succeed");
    assert_eq!(compiler.call_count(), 2);

    let retry_prompt = generator.prompt(1);
    assert!(retry_prompt.contains("TS2339"));
    assert!(retry_prompt.contains("failed to compile"));

    // The regenerated candidate was revalidated before the second compile.
    let stages: Vec<Stage> = success.attempts.iter().map(|a| a.stage).collect();
    assert_eq!(
        stages,
        vec![Stage::Validation, Stage::Compile, Stage::Validation, Stage::Compile]
    );
}

#[tokio::test]
async fn two_compile_failures_use_both_budget_slots() {
    let generator = ScriptedGenerator::new(&[VALID_SOURCE]);
    let compiler = ScriptedCompiler::failing(2);
    let p = pipeline(generator.clone(), compiler.clone(), RetryBudget::default());

    let success = p.run(&request()).await.expect("should succeed");
    assert_eq!(compiler.call_count(), 3);
    assert_eq!(generator.call_count(), 3);
    // Escalation mirrors the validation loop: targeted fix, then rewrite.
    assert!(generator.prompt(1).contains("Keep everything else"));
    assert!(generator.prompt(2).contains("Discard the previous code"));
    assert_eq!(
        success
            .attempts
            .iter()
            .filter(|a| a.stage == Stage::Compile && a.outcome == AttemptOutcome::Rejected)
            .count(),
        2
    );
}

#[tokio::test]
async fn compile_exhaustion_collects_every_diagnostic() {
    let generator = ScriptedGenerator::new(&[VALID_SOURCE]);
    let compiler = ScriptedCompiler::failing(usize::MAX);
    let p = pipeline(generator, compiler.clone(), RetryBudget::default());

    let err = p.run(&request()).await.expect_err("should exhaust");
    assert_eq!(compiler.call_count(), 3);
    match err {
        PipelineError::RetryExhausted {
            stage,
            errors,
            attempts,
        } => {
            assert_eq!(stage, Stage::Compile);
            assert_eq!(errors.len(), 3);
            assert!(errors.iter().all(|e| e.contains("TS2339")));
            assert_eq!(
                attempts
                    .iter()
                    .filter(|a| a.stage == Stage::Compile)
                    .count(),
                3
            );
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn compile_budget_of_one_allows_a_single_cycle() {
    let generator = ScriptedGenerator::new(&[VALID_SOURCE]);
    let compiler = ScriptedCompiler::failing(usize::MAX);
    let budget = RetryBudget {
        validation_retries: 2,
        compile_retries: 1,
    };
    let p = pipeline(generator.clone(), compiler.clone(), budget);

    let err = p.run(&request()).await.expect_err("should exhaust");
    assert_eq!(compiler.call_count(), 2);
    assert_eq!(generator.call_count(), 2);
    assert!(matches!(
        err,
        PipelineError::RetryExhausted {
            stage: Stage::Compile,
            ..
        }
    ));
}

#[tokio::test]
async fn regressing_candidate_fails_fast_instead_of_recompiling() {
    let generator = ScriptedGenerator::new(&[VALID_SOURCE, INVALID_SOURCE]);
    let compiler = ScriptedCompiler::failing(1);
    let p = pipeline(generator.clone(), compiler.clone(), RetryBudget::default());

    let err = p.run(&request()).await.expect_err("should fail fast");
    // The regressed candidate never reached the compiler.
    assert_eq!(compiler.call_count(), 1);
    assert_eq!(generator.call_count(), 2);
    match err {
        PipelineError::RetryExhausted { stage, errors, .. } => {
            assert_eq!(stage, Stage::Compile);
            assert!(errors.iter().any(|e| e.contains("TS2339")));
            assert!(errors.iter().any(|e| e.contains("fetch()")));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn validation_and_compile_budgets_do_not_share_slots() {
    // Two validation regenerations, then two compile regenerations: four
    // generator calls in total, all within the independent caps.
    let generator = ScriptedGenerator::new(&[
        INVALID_SOURCE,
        INVALID_SOURCE,
        VALID_SOURCE,
    ]);
    let compiler = ScriptedCompiler::failing(2);
    let p = pipeline(generator.clone(), compiler.clone(), RetryBudget::default());

    let success = p.run(&request()).await.expect("should succeed");
    assert_eq!(generator.call_count(), 5);
    assert_eq!(compiler.call_count(), 3);
    assert!(success
        .attempts
        .iter()
        .any(|a| a.stage == Stage::Compile && a.outcome == AttemptOutcome::Accepted));
}
