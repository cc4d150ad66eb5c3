//! quizforge CLI: the terminal quiz front end.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quizforge", version, about = "Quiz yourself on any topic with LLM-generated questions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play an interactive quiz
    Play {
        /// Topic to start with (skips the topic picker for the first quiz)
        #[arg(long)]
        topic: Option<String>,

        /// Provider to generate with (e.g. "openai", "huggingface")
        #[arg(long)]
        provider: Option<String>,

        /// Never call a provider; use the question bank only
        #[arg(long)]
        offline: bool,

        /// Loading delay before fallback questions show, in milliseconds
        #[arg(long)]
        fallback_delay_ms: Option<u64>,

        /// Extra question bank TOML file
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List topics in the question bank
    Topics {
        /// Extra question bank TOML file
        #[arg(long)]
        bank: Option<PathBuf>,
    },

    /// Validate a question bank TOML file
    Validate {
        /// Path to the bank file
        #[arg(long)]
        bank: PathBuf,
    },

    /// Create starter config and example question bank
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizforge=warn".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            topic,
            provider,
            offline,
            fallback_delay_ms,
            bank,
            config,
        } => {
            commands::play::execute(commands::play::PlayOptions {
                topic,
                provider,
                offline,
                fallback_delay_ms,
                bank,
                config,
            })
            .await
        }
        Commands::Topics { bank } => commands::topics::execute(bank),
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
