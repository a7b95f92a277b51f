//! RTT Analyzer command-line front end

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand};
use rtt_core::ledger::DEFAULT_RECENT_LIMIT;
use rtt_core::loader::DEFAULT_COLUMN;
use rtt_core::reporter::OutputFormat;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "rtt", version, about = "Analyze RTT captures and curate run history")]
struct Cli {
    /// Directory holding comparisons.csv and config.json
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a capture file and record it in the history
    Analyze(AnalyzeArgs),
    /// Show recorded runs
    History(HistoryArgs),
    /// Average two or more runs into a single row
    Merge {
        /// Row indices as shown by `history`
        #[arg(required = true, num_args = 2..)]
        indices: Vec<usize>,
    },
    /// Delete runs from the history
    Delete {
        /// Row indices as shown by `history`
        #[arg(required = true, num_args = 1..)]
        indices: Vec<usize>,
    },
    /// Remove the whole history
    Clear,
    /// Show or update saved directories
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Capture file with one RTT sample (seconds) per row
    file: PathBuf,

    /// Directory to create `<name>_results` in (defaults to the saved setting)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Column holding the samples
    #[arg(short, long, default_value = DEFAULT_COLUMN)]
    column: String,

    /// Output format: console, json, json-pretty
    #[arg(short, long, default_value = "console")]
    format: OutputFormat,
}

#[derive(Args, Debug)]
struct HistoryArgs {
    /// Number of recent rows to show
    #[arg(short, long, default_value_t = DEFAULT_RECENT_LIMIT)]
    limit: usize,

    /// Show every row instead of the most recent ones
    #[arg(short, long)]
    all: bool,

    /// Output format: console, json, json-pretty
    #[arg(short, long, default_value = "console")]
    format: OutputFormat,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Print the saved configuration
    Show,
    /// Update saved directories
    Set {
        #[arg(long)]
        input_dir: Option<String>,
        #[arg(long)]
        output_dir: Option<String>,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rtt_core={default_level},rtt={default_level}")));

    // stdout carries reports; logs go to stderr
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = match commands::Context::open(cli.data_dir.as_deref()) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("error: {e:#}");
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Analyze(args) => {
            commands::analyze(&ctx, &args.file, args.output_dir.as_deref(), &args.column, args.format)
        }
        Commands::History(args) => commands::history(&ctx, args.limit, args.all, args.format),
        Commands::Merge { indices } => commands::merge(&ctx, &indices),
        Commands::Delete { indices } => commands::delete(&ctx, &indices),
        Commands::Clear => commands::clear(&ctx),
        Commands::Config(ConfigCommand::Show) => commands::config_show(&ctx),
        Commands::Config(ConfigCommand::Set {
            input_dir,
            output_dir,
        }) => commands::config_set(&ctx, input_dir, output_dir),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
