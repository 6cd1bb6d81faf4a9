use anyhow::Result;
use clap::{Parser, Subcommand};
use engine::persist::{try_load_knowledge_base, DEFAULT_KB_PATH};
use engine::{FaqIndex, SharedIndex};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "faqctl")]
#[command(about = "Query and validate an FAQ knowledge base", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a single message against the knowledge base
    Ask {
        /// Knowledge base JSON file
        #[arg(long, default_value = DEFAULT_KB_PATH)]
        kb: String,
        /// Seed for the greeting/fallback choice
        #[arg(long)]
        seed: Option<u64>,
        /// Message to answer
        #[arg(required = true)]
        message: Vec<String>,
    },
    /// Load the knowledge base strictly and report what was indexed
    Check {
        /// Knowledge base JSON file
        #[arg(long, default_value = DEFAULT_KB_PATH)]
        kb: String,
    },
}

#[derive(Serialize)]
struct CheckReport {
    path: String,
    categories: Vec<(String, usize)>,
    entries: usize,
    skipped: usize,
    vocabulary: usize,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Ask { kb, seed, message } => ask(&kb, seed, &message.join(" ")),
        Commands::Check { kb } => check(&kb),
    }
}

fn ask(kb: &str, seed: Option<u64>, message: &str) -> Result<()> {
    let generator = SharedIndex::load(kb).generator();
    let response = match seed {
        Some(seed) => generator.generate_response_with(message, &mut StdRng::seed_from_u64(seed)),
        None => generator.generate_response(message),
    };
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn check(kb: &str) -> Result<()> {
    let report = build_check_report(kb)?;
    if report.skipped > 0 {
        tracing::warn!(skipped = report.skipped, "some entries were rejected");
    }
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn build_check_report(kb: &str) -> Result<CheckReport> {
    let (knowledge, load) = try_load_knowledge_base(kb)?;
    let categories = knowledge.categories().iter().map(|c| (c.name.clone(), c.entries.len())).collect();
    let index = FaqIndex::build(knowledge);
    Ok(CheckReport {
        path: kb.to_string(),
        categories,
        entries: load.entries,
        skipped: load.skipped,
        vocabulary: index.weights().vocabulary_len(),
    })
}
