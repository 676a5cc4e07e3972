use async_trait::async_trait;
use clap::{Parser, Subcommand};
use multi_prompt::{
    Answers, DefaultValuePrompter, FlowDocument, FlowError, FlowHooks, HookName, PromptOptions,
    QuestionSpec, ResolvedConfig, Section, TerminalPrompter, check_flow, load_answers,
    multi_prompt,
};
use serde_json::Value;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Sectioned questionnaire runner",
    long_about = "Runs multi-section questionnaires described by a flow document, skipping questions whose answers are already known"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ask every section of a flow document and print the merged answers.
    Run {
        /// Path to the flow document JSON.
        #[arg(long, value_name = "SPEC")]
        spec: PathBuf,
        /// Optional JSON file with answers that are already known.
        #[arg(long, value_name = "ANSWERS")]
        answers: Option<PathBuf>,
        /// Answer every question with its default instead of asking.
        #[arg(long)]
        defaults: bool,
        /// Emit flow diagnostics to stderr.
        #[arg(long, alias = "debug")]
        log: bool,
        /// Pretty-print the resulting answers.
        #[arg(long)]
        pretty: bool,
    },
    /// Check that every flow entry names a section with questions.
    Validate {
        /// Path to the flow document JSON.
        #[arg(long, value_name = "SPEC")]
        spec: PathBuf,
    },
    /// Print the JSON schema of flow documents.
    Schema,
}

/// Prints each section's label before it is asked.
struct SectionBanner;

#[async_trait]
impl FlowHooks for SectionBanner {
    async fn section_created(
        &self,
        section: &Section,
        _prompts: &[QuestionSpec],
        _config: &ResolvedConfig,
    ) -> Result<(), FlowError> {
        eprintln!("== {}", section.display_label());
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Command::Run {
            spec,
            answers,
            defaults,
            log,
            pretty,
        } => {
            init_tracing(log);
            run_flow(spec, answers, defaults, log, pretty).await
        }
        Command::Validate { spec } => {
            init_tracing(false);
            run_validate(spec)
        }
        Command::Schema => run_schema(),
    }
}

fn init_tracing(verbose: bool) {
    let directive = if verbose {
        "multi_prompt=debug"
    } else {
        "multi_prompt=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn known_answers(path: Option<PathBuf>) -> CliResult<Answers> {
    match path {
        Some(path) => Ok(load_answers(path)?),
        None => Ok(Answers::new()),
    }
}

async fn run_flow(
    spec_path: PathBuf,
    answers_path: Option<PathBuf>,
    defaults: bool,
    log: bool,
    pretty: bool,
) -> CliResult<()> {
    let def = FlowDocument::load(&spec_path)?.into_prompts_def();
    let known_answers = known_answers(answers_path)?;

    let mut options = PromptOptions::new()
        .with_known_answers(known_answers)
        .log_on(log);
    options = if defaults {
        options.with_prompter(DefaultValuePrompter::new())
    } else {
        options
            .with_prompter(TerminalPrompter::new())
            .with_hook(HookName::SectionCreated, SectionBanner)
    };

    let answers = multi_prompt(&def, options).await?;
    let value = Value::Object(answers);
    let rendered = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    println!("{}", rendered);
    Ok(())
}

fn run_validate(spec_path: PathBuf) -> CliResult<()> {
    let def = FlowDocument::load(&spec_path)?.into_prompts_def();
    let problems = check_flow(&def);
    if problems.is_empty() {
        println!("Flow is valid: {}", def.flow.join(" -> "));
        return Ok(());
    }
    println!("Flow is invalid:");
    for problem in &problems {
        println!("  {}", problem);
    }
    Err(format!("{} problem(s) found", problems.len()).into())
}

fn run_schema() -> CliResult<()> {
    let schema = FlowDocument::json_schema()?;
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
