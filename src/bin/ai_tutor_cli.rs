//! AI-Tutor CLI 命令行宿主：提问、生成学习内容、查看提供者状态
//!
//! Usage:
//!   ai-tutor-cli ask <MESSAGE...>
//!   ai-tutor-cli generate --kind lesson --topic "Ownership" [--domain Rust] [--save ownership]
//!   ai-tutor-cli providers

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ai_tutor_rust::{
    ChainSettings, ContentKind, ContentRequest, ContentWriter, ResolutionStats, TutorSession,
};

#[derive(Debug, Parser)]
#[command(name = "ai-tutor-cli", version, about = "Learning assistant with multi-provider fallback")]
struct Cli {
    /// YAML settings file (environment overrides still apply)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print resolution stats as JSON to stderr
    #[arg(long, global = true)]
    stats: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Ask a free-form question
    Ask {
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
    /// Generate an outline, lesson, exercise, quiz or summary
    Generate {
        #[arg(long)]
        kind: ContentKind,
        #[arg(long)]
        topic: String,
        #[arg(long)]
        domain: Option<String>,
        /// Extra instructions for the generator
        #[arg(long)]
        notes: Option<String>,
        /// Save the result under <root>/generated/<FILE>
        #[arg(long)]
        save: Option<String>,
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
    /// List providers in priority order
    Providers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => ChainSettings::from_yaml_file(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => ChainSettings::from_env().context("loading settings from environment")?,
    };

    match cli.command {
        Command::Ask { message } => {
            let mut session = TutorSession::from_settings(&settings)?;
            let request = ContentRequest::chat(message.join(" "));
            let (text, stats) = session.generate_with_stats(&request).await?;
            println!("{}", text);
            report_stats(cli.stats, &stats)?;
        }
        Command::Generate {
            kind,
            topic,
            domain,
            notes,
            save,
            root,
        } => {
            let mut session =
                TutorSession::from_settings(&settings)?.with_writer(ContentWriter::new(root));
            let mut request = ContentRequest::new(kind, topic);
            if let Some(domain) = domain {
                request = request.with_domain(domain);
            }
            if let Some(notes) = notes {
                request = request.with_message(notes);
            }

            let (text, stats) = session.generate_with_stats(&request).await?;
            println!("{}", text);
            report_stats(cli.stats, &stats)?;

            if let Some(filename) = save {
                let path = session.save(&filename, &text).await?;
                eprintln!("saved to {}", path.display());
            }
        }
        Command::Providers => {
            let session = TutorSession::from_settings(&settings)?;
            for (idx, provider) in session.chain().providers().iter().enumerate() {
                let state = if provider.is_configured() {
                    "configured"
                } else {
                    "missing credential"
                };
                println!("{}. {:<10} {}", idx + 1, provider.name(), state);
            }
            println!("{}. {:<10} always available", session.chain().providers().len() + 1, "offline");
        }
    }

    Ok(())
}

fn report_stats(enabled: bool, stats: &ResolutionStats) -> anyhow::Result<()> {
    if enabled {
        eprintln!("{}", serde_json::to_string_pretty(stats)?);
    }
    Ok(())
}
