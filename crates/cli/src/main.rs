//! Lu-Gang Connect CLI: the main entry point.
//!
//! Commands:
//! - `serve`     Start the HTTP API server
//! - `ask`       Answer one question through the full pipeline
//! - `classify`  Show which upstream a question routes to
//! - `search`    Show the knowledge context for a question
//! - `knowledge` Print the knowledge table
//! - `status`    Show configuration and provider status
//! - `doctor`    Diagnose setup problems
//! - `onboard`   Create the config directory and file
//! - `config`    Show, locate or validate the config file

use clap::{Parser, Subcommand};
use lugang_core::{Language, Scope, UserType};

mod commands;

#[derive(Parser)]
#[command(
    name = "lugang",
    about = "Lu-Gang Connect: Hong Kong ⇄ Shandong knowledge assistant",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Override the bind host
        #[arg(long)]
        host: Option<String>,

        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Ask a question and print the JSON response
    Ask {
        question: String,

        /// Knowledge scope: northbound, southbound or both
        #[arg(short, long, default_value = "both")]
        scope: Scope,

        /// Caller role: visitor, business, investor or student
        #[arg(short, long, default_value = "visitor")]
        user_type: UserType,

        /// Answer language: zh, en or zh-hk
        #[arg(short, long, default_value = "zh")]
        language: Language,
    },

    /// Show which provider and model a question routes to
    Classify { question: String },

    /// Show the knowledge context a question would receive
    Search {
        question: String,

        #[arg(short, long, default_value = "both")]
        scope: Scope,
    },

    /// Print the knowledge table
    Knowledge {
        /// northbound, southbound or both
        #[arg(default_value = "both")]
        scope: Scope,
    },

    /// Show configuration and provider status
    Status,

    /// Diagnose setup problems
    Doctor,

    /// Create the config directory and a starter config file
    Onboard,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration (keys redacted)
    Show,
    /// Print the config file path
    Path,
    /// Validate the config file
    Validate,
}

fn init_logging(verbose: bool, json: bool) {
    let filter = if verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    match cli.command {
        Commands::Serve { host, port } => commands::serve::run(host, port).await?,
        Commands::Ask {
            question,
            scope,
            user_type,
            language,
        } => commands::ask::run(question, scope, user_type, language).await?,
        Commands::Classify { question } => commands::classify::run(&question)?,
        Commands::Search { question, scope } => commands::search::run(&question, scope)?,
        Commands::Knowledge { scope } => commands::knowledge::run(scope)?,
        Commands::Status => commands::status::run()?,
        Commands::Doctor => commands::doctor::run()?,
        Commands::Onboard => commands::onboard::run()?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show()?,
            ConfigAction::Path => commands::config_cmd::path()?,
            ConfigAction::Validate => commands::config_cmd::validate()?,
        },
    }

    Ok(())
}
