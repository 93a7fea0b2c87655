mod config;
mod interactive;
mod items;
mod output;
mod parse;
mod prompt;

use clap::Parser;
use pairsort_core::{worst_case_comparisons, RankingSession};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::interactive::{run_session, Outcome};

pub fn bail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "pairsort", version, about = "Rank statements by pairwise comparison and score their categories")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Rank the statements interactively, then show category scores
    Rank(RankArgs),
    /// List the statements that would be ranked
    Questions(QuestionsArgs),
    /// Create a default config file at ~/.config/pairsort/config.toml
    Init,
}

#[derive(Parser)]
struct RankArgs {
    /// Item file: JSON array of {id, text, category}, or TOML with [[items]].
    /// Defaults to the built-in work-motivation questionnaire.
    #[arg(long)]
    items: Option<PathBuf>,

    /// Shuffle seed for a reproducible presentation order
    #[arg(long)]
    seed: Option<u64>,

    /// Output JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Write ranking_details.csv and category_scores.csv into this directory
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Log debug details to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Path to config file (default: ~/.config/pairsort/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser)]
struct QuestionsArgs {
    /// Item file (defaults to the built-in questionnaire)
    #[arg(long)]
    items: Option<PathBuf>,

    /// Path to config file (default: ~/.config/pairsort/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Stderr logging. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Rank(args) => {
            init_tracing(args.verbose);
            run_rank(args);
        }
        Commands::Questions(args) => {
            init_tracing(false);
            list_questions(args);
        }
        Commands::Init => {
            init_tracing(false);
            let path = config::create_default_config();
            println!("Created config at {}", path.display());
            println!("Edit it to set your item file, seed, export directory.");
        }
    }
}

fn list_questions(args: QuestionsArgs) {
    let config_path = args.config.clone().unwrap_or_else(config::config_path);
    let cfg = config::load_config(&config_path);
    let items_path = args.items.or_else(|| cfg.items.map(PathBuf::from));

    let items = items::load_items(items_path.as_deref());
    let listing = items::format_question_list(&items)
        .unwrap_or_else(|e| bail(format!("Invalid item set: {e}")));
    print!("{listing}");
}

fn run_rank(args: RankArgs) {
    // Load config file, merge with CLI args (CLI wins)
    let config_path = args.config.clone().unwrap_or_else(config::config_path);
    let cfg = config::load_config(&config_path);

    let items_path = args.items.clone().or_else(|| cfg.items.map(PathBuf::from));
    let seed = args.seed.or(cfg.seed);
    let export_dir = args.export_dir.clone().or_else(|| cfg.export_dir.map(PathBuf::from));

    let items = items::load_items(items_path.as_deref());
    let mut session = RankingSession::initialize(&items, seed)
        .unwrap_or_else(|e| bail(format!("Cannot start ranking: {e}")));

    if !args.json {
        println!(
            "Ranking {} statements, two at a time. Pick the one that matters more to you.",
            items.len()
        );
        println!(
            "This takes at most {} comparisons. Type ? for help.",
            worst_case_comparisons(items.len())
        );
    }

    // Questions go to stderr in JSON mode so stdout stays machine-readable.
    let stdin = io::stdin();
    let outcome = if args.json {
        run_session(&mut session, &mut stdin.lock(), &mut io::stderr(), seed)
    } else {
        run_session(&mut session, &mut stdin.lock(), &mut io::stdout(), seed)
    };
    let outcome = outcome.unwrap_or_else(|e| bail(format!("Interactive session failed: {e}")));

    if outcome == Outcome::Quit {
        eprintln!(
            "Stopped after {} comparisons ({} of {} placed). No results.",
            session.comparisons_count(),
            session.sorted_len(),
            session.num_items(),
        );
        std::process::exit(1);
    }

    let result = session
        .results()
        .unwrap_or_else(|e| bail(format!("Failed to score ranking: {e}")));
    let comparisons = session.comparisons_count();

    if args.json {
        output::print_json(&result, comparisons);
    } else {
        println!("\nRanking complete!\n");
        output::print_table(&result, comparisons);
        if !result.is_empty() {
            println!("\n{}", output::method_text(&result));
        }
    }

    if let Some(dir) = export_dir {
        let (details, categories) = output::write_exports(&dir, &result)
            .unwrap_or_else(|e| bail(format!("Failed to export CSV to {}: {e}", dir.display())));
        eprintln!("Exported {} and {}", details.display(), categories.display());
    }
}
