use std::ops::Range;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ygg_agent::{JournalEntry, LlmPerception, Orchestrator, read_journal};
use ygg_core::persistence::ResultsReader;
use ygg_core::{YggConfig, YggError, bias};

const DEFAULT_CONFIG: &str = "ygg.toml";

#[derive(Parser)]
#[command(name = "ygg", about = "Episodic emotional memory with contradiction-driven learning")]
struct Cli {
    /// Configuration file (defaults to ./ygg.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Results directory, overriding `run.results_dir`
    #[arg(long, global = true)]
    results_dir: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed memory from a journal, learn from later entries, export results
    Run {
        /// Plain-text journal
        journal: PathBuf,
    },

    /// Show the bias shift report for one concept
    Report {
        /// Concept (first sensory feature of an event)
        concept: String,
    },

    /// Print the bias and contradiction digest
    Bias {
        /// Concept to focus on
        concept: Option<String>,

        /// Focused lines of each kind
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },

    /// List the strongest attachments
    Attach {
        /// Number of entities to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

fn load_config(cli: &Cli) -> Result<YggConfig> {
    match &cli.config {
        Some(path) => YggConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None if Path::new(DEFAULT_CONFIG).exists() => {
            YggConfig::from_file(Path::new(DEFAULT_CONFIG)).context("failed to load ygg.toml")
        }
        None => Ok(YggConfig::default()),
    }
}

fn results_dir(cli: &Cli, config: &YggConfig) -> PathBuf {
    cli.results_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.run.results_dir))
}

fn init_tracing(verbose: bool, default_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_tracing(cli.verbose, &config.general.log_level);

    match &cli.command {
        Commands::Run { journal } => cmd_run(&cli, &config, journal).await,
        Commands::Report { concept } => cmd_report(&cli, &config, concept),
        Commands::Bias { concept, limit } => cmd_bias(&cli, &config, concept.as_deref(), *limit),
        Commands::Attach { limit } => cmd_attach(&cli, &config, *limit),
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

async fn cmd_run(cli: &Cli, config: &YggConfig, journal: &Path) -> Result<()> {
    let entries = read_journal(journal)
        .with_context(|| format!("failed to read journal {}", journal.display()))?;
    tracing::info!(entries = entries.len(), "journal loaded");

    let perception =
        LlmPerception::from_config(&config.llm).context("failed to set up the LLM collaborator")?;
    let mut orchestrator = Orchestrator::new(perception, config);

    orchestrator.seed(select(&entries, &config.run.seed_entries)).await;
    orchestrator.log_summary("seeding", 5);

    orchestrator.learn(select(&entries, &config.run.learn_entries)).await;
    orchestrator.log_summary("learning", config.run.report_attachments);

    let dir = results_dir(cli, config);
    let written = orchestrator
        .export(&dir)
        .with_context(|| format!("failed to export results to {}", dir.display()))?;

    let stats = orchestrator.stats();
    println!("Events processed:   {}", stats.total_events);
    println!("Contradictions:     {}", stats.contradictions);
    println!("New memories:       {}", stats.new_memories_added);
    println!("Average error:      {:.3}", stats.average_error());
    println!("Shifted concepts:   {:?}", stats.shifted_concepts);
    println!("Final memory count: {}", orchestrator.mind().store.len());
    for path in written {
        println!("  wrote {}", path.display());
    }
    Ok(())
}

fn cmd_report(cli: &Cli, config: &YggConfig, concept: &str) -> Result<()> {
    let reader = ResultsReader::open(results_dir(cli, config));
    let timeline = reader.timeline().context("failed to load the emotional timeline")?;

    match bias::report(&timeline, concept, config.bias.recent_window) {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Err(YggError::UnknownConcept(_)) => {
            println!("no data for '{concept}'");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn cmd_bias(cli: &Cli, config: &YggConfig, concept: Option<&str>, limit: usize) -> Result<()> {
    let reader = ResultsReader::open(results_dir(cli, config));
    let meter = reader.bias_meter().context("failed to load the bias meter")?;
    let log = reader
        .contradictions()
        .context("failed to load the contradiction log")?;

    let (biases, contradictions) =
        bias::summarize(&meter, &log, concept, limit, &config.bias, &mut rand::thread_rng());

    println!("Biases:");
    for line in &biases {
        println!("{line}");
    }
    println!("Contradictions:");
    for line in &contradictions {
        println!("{line}");
    }
    Ok(())
}

fn cmd_attach(cli: &Cli, config: &YggConfig, limit: usize) -> Result<()> {
    let reader = ResultsReader::open(results_dir(cli, config));
    let graph = reader
        .attachment_graph()
        .context("failed to load the attachment graph")?;

    if graph.is_empty() {
        println!("no attachments");
        return Ok(());
    }
    for edge in graph.strongest(limit) {
        let last = edge
            .history
            .last()
            .map_or("-", |adjustment| adjustment.emotion.label());
        println!(
            "{:<24} {:+.3}  ({} events, last {last})",
            edge.entity,
            edge.weight,
            edge.history.len()
        );
    }
    Ok(())
}

/// The entries in `range`, clamped to what the journal holds.
fn select<'a>(entries: &'a [JournalEntry], range: &Range<usize>) -> &'a [JournalEntry] {
    let end = range.end.min(entries.len());
    let start = range.start.min(end);
    &entries[start..end]
}
