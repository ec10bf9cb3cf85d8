use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use molstudio_telemetry::{LogFormat, TracingOptions, init_tracing};
use std::path::PathBuf;

mod commands;

use commands::context::CommandContext;

#[derive(Parser)]
#[command(name = "molstudio")]
#[command(about = "molstudio - prompt-driven molecule generation from the terminal", long_about = None)]
struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Config file (default: <config dir>/molstudio/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL, overrides the config file and environment
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// Log filter directives (RUST_LOG takes precedence)
    #[arg(long, global = true, default_value = "warn")]
    log: String,

    /// Log line format on stderr: pretty or json
    #[arg(long, global = true, default_value = "pretty")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate molecules from a text prompt
    Generate {
        prompt: String,
        /// Model to dispatch to; repeat for several (default: from config)
        #[arg(short, long = "model")]
        models: Vec<String>,
        /// Record the run under this experiment
        #[arg(long)]
        experiment: Option<String>,
    },
    /// Run an existing record's prompt again as a new record
    Regenerate {
        record_id: String,
        #[arg(short, long = "model")]
        models: Vec<String>,
    },
    /// List generation history, most recent first
    History {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Change the prompt text of a record
    Describe { record_id: String, prompt: String },
    /// Fetch 3-D coordinates (SDF) for a SMILES
    Structure {
        smiles: String,
        /// Write the SDF here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Manage experiments
    Experiments {
        #[command(subcommand)]
        action: ExperimentsAction,
    },
    /// Ask the knowledge assistant
    Chat {
        query: String,
        /// Continue an earlier conversation
        #[arg(long)]
        session: Option<String>,
    },
    /// Describe a structure in natural language
    Explain {
        smiles: String,
        #[arg(long)]
        info: Option<String>,
    },
    /// Dock a ligand into a known target
    Dock { smiles: String, target: String },
    /// List the available generative models
    Models,
    /// List the docking targets
    Targets,
}

#[derive(Subcommand)]
enum ExperimentsAction {
    /// List experiments
    List,
    /// Create an experiment
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// List the runs of an experiment
    Runs { experiment_id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut warnings = init_tracing(&TracingOptions {
        filter: cli.log.clone(),
        format: cli.log_format,
        forward: Some(tracing::Level::WARN),
    })?;

    let ctx = CommandContext::load(cli.config.as_deref(), cli.backend_url.as_deref(), cli.json)
        .await?;

    let result = match cli.command {
        Commands::Generate {
            prompt,
            models,
            experiment,
        } => commands::generate::generate(&ctx, &prompt, models, experiment.as_deref()).await,
        Commands::Regenerate { record_id, models } => {
            commands::generate::regenerate(&ctx, &record_id, models).await
        }
        Commands::History { limit } => commands::history::list(&ctx, limit).await,
        Commands::Describe { record_id, prompt } => {
            commands::generate::describe(&ctx, &record_id, &prompt).await
        }
        Commands::Structure { smiles, out } => {
            commands::structure::fetch(&ctx, &smiles, out.as_deref()).await
        }
        Commands::Experiments { action } => match action {
            ExperimentsAction::List => commands::experiments::list(&ctx).await,
            ExperimentsAction::Create { name, description } => {
                commands::experiments::create(&ctx, &name, description.as_deref()).await
            }
            ExperimentsAction::Runs { experiment_id } => {
                commands::experiments::runs(&ctx, &experiment_id).await
            }
        },
        Commands::Chat { query, session } => {
            commands::chat::ask(&ctx, &query, session.as_deref()).await
        }
        Commands::Explain { smiles, info } => {
            commands::chat::explain(&ctx, &smiles, info.as_deref()).await
        }
        Commands::Dock { smiles, target } => commands::dock::run(&ctx, &smiles, &target).await,
        Commands::Models => commands::models::models(&ctx),
        Commands::Targets => commands::models::targets(&ctx),
    };

    if let Some(receiver) = warnings.as_mut()
        && !ctx.output.is_json()
    {
        let mut count = 0;
        while receiver.try_recv().is_ok() {
            count += 1;
        }
        if count > 0 {
            eprintln!("{}", format!("{} warning(s) logged", count).yellow());
        }
    }

    result
}
