//! Tessier CLI — generate, validate, and fix UI component source.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use tessier::catalog::ComponentCatalog;
use tessier::compiler::CommandCompiler;
use tessier::config::TessierConfig;
use tessier::fixer;
use tessier::generator::anthropic::AnthropicGenerator;
use tessier::logging;
use tessier::pipeline::{GenerationRequest, RetryBudget, SelfHealingPipeline};
use tessier::validator::{Severity, Validator};

#[derive(Parser)]
#[command(name = "tessier", version, about = "Self-healing UI component generation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a component through the full self-healing pipeline.
    Generate {
        /// What the component should do, in natural language.
        instruction: String,
        /// Write the accepted source here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Statically validate an existing source file.
    Validate {
        /// The source file to check.
        file: PathBuf,
    },
    /// Run the deterministic auto-fixer over an existing source file.
    Fix {
        /// The source file to fix.
        file: PathBuf,
        /// Rewrite the file in place instead of printing to stdout.
        #[arg(long)]
        write: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = TessierConfig::load().context("failed to load configuration")?;

    match cli.command {
        Commands::Generate {
            instruction,
            output,
        } => {
            let _guard = logging::init_production(
                Path::new(&config.pipeline.logs_dir),
                &config.pipeline.log_level,
            )
            .context("failed to initialise logging")?;
            generate(&config, &instruction, output.as_deref()).await
        }
        Commands::Validate { file } => {
            logging::init_cli(&config.pipeline.log_level);
            validate(&config, &file)
        }
        Commands::Fix { file, write } => {
            logging::init_cli(&config.pipeline.log_level);
            fix(&file, write)
        }
    }
}

async fn generate(
    config: &TessierConfig,
    instruction: &str,
    output: Option<&Path>,
) -> Result<()> {
    let api_key = config
        .generator
        .api_key
        .clone()
        .context("no API key configured; set TESSIER_ANTHROPIC_API_KEY or [generator].api_key")?;

    let generator = Arc::new(AnthropicGenerator::new(
        config.generator.model.clone(),
        api_key,
    ));
    let compiler = Arc::new(CommandCompiler::new(
        PathBuf::from(&config.compiler.workdir),
        PathBuf::from(&config.compiler.entry_file),
        config.compiler.build_command.clone(),
    )?);
    let validator = Validator::new(config.policy.clone());
    let budget = RetryBudget {
        validation_retries: config.pipeline.max_validation_retries,
        compile_retries: config.pipeline.max_compile_retries,
    };
    let pipeline = SelfHealingPipeline::new(generator, compiler, validator, budget);

    let catalog_context = match &config.pipeline.catalog_path {
        Some(path) => ComponentCatalog::load(Path::new(path))?.render_context(),
        None => None,
    };

    let request = GenerationRequest {
        instruction: instruction.to_owned(),
        catalog_context,
    };

    info!(model = %config.generator.model, "starting generation");
    let success = pipeline.run(&request).await?;

    info!(attempts = success.attempts.len(), "component accepted");
    for warning in &success.warnings {
        warn!(%warning, "accepted with warning");
    }

    match output {
        Some(path) => {
            std::fs::write(path, &success.source)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "source written");
        }
        None => print!("{}", success.source),
    }
    Ok(())
}

fn validate(config: &TessierConfig, file: &Path) -> Result<()> {
    let source = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let report = Validator::new(config.policy.clone()).validate(&source);

    for finding in report.findings() {
        let label = match finding.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        println!("{label}: {}", finding.message);
    }
    if !report.is_valid() {
        bail!("{} validation error(s)", report.errors().len());
    }
    info!(warnings = report.warnings().len(), "source is valid");
    Ok(())
}

fn fix(file: &Path, write: bool) -> Result<()> {
    let source = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let result = fixer::autofix(&source);

    for fix in &result.fixes {
        info!(%fix, "applied");
    }
    if write {
        std::fs::write(file, &result.code)
            .with_context(|| format!("failed to write {}", file.display()))?;
        info!(path = %file.display(), fixes = result.fixes.len(), "file rewritten");
    } else {
        print!("{}", result.code);
    }
    Ok(())
}
