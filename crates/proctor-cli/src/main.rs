//! proctor CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "proctor", version, about = "Assessment authoring and test-taking")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate test definition TOML files
    Validate {
        /// Path to a test definition file or directory
        #[arg(long)]
        test: PathBuf,
    },

    /// List test definitions in a directory
    List {
        /// Directory of test definition files
        #[arg(long, default_value = "./test-bank")]
        dir: PathBuf,
    },

    /// Take a test by replaying an answers file
    Take {
        /// Path to the test definition
        #[arg(long)]
        test: PathBuf,

        /// Path to the answers TOML file
        #[arg(long)]
        answers: PathBuf,

        /// Where to save the JSON attempt report
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: text, markdown, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Create a starter test definition and answers file
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("proctor=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { test } => commands::validate::execute(test),
        Commands::List { dir } => commands::list::execute(dir),
        Commands::Take {
            test,
            answers,
            output,
            format,
        } => commands::take::execute(test, answers, output, format).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
