//! CommentGuard CLI
//!
//! Reads comments from stdin, one per line, screens each through the
//! moderation pipeline, and prints what a user would be told.

use anyhow::Result;
use clap::Parser;
use commentguard_session::{AppConfig, CommentBoard, ConfigOverrides, Notice, Orchestrator};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "commentguard")]
#[command(about = "Screen comments for toxicity before posting", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "commentguard.yaml")]
    config: String,

    /// Blocking threshold (0.0-1.0)
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Backend endpoint or base URL
    #[arg(short, long)]
    backend_url: Option<String>,

    /// API key for the completion backend
    #[arg(long, env = "COMMENTGUARD_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let overrides = ConfigOverrides {
        threshold: cli.threshold,
        backend_url: cli.backend_url.clone(),
        api_key: cli.api_key.clone(),
    };
    let config = AppConfig::load(&cli.config, &overrides)?;
    info!("Configuration loaded successfully");
    info!("Threshold: {}", config.policy.threshold.value());
    info!("Timeout: {}ms", config.timeout_ms);

    let board = CommentBoard::new(Orchestrator::from_config(&config)?);
    info!("Backend: {}", board.orchestrator().backend_name());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let notice = board.post(&line).await;
        render(&notice);
    }

    println!();
    if board.is_empty() {
        println!("No comments yet. Be the first!");
    } else {
        println!("Comments ({}):", board.len());
        for comment in board.comments() {
            println!("  - {}", comment);
        }
    }

    Ok(())
}

fn render(notice: &Notice) {
    match notice {
        Notice::Posted => println!("[posted] {}", notice),
        Notice::Blocked { reasons, scores } => {
            println!("[blocked] {} ({})", notice, reasons.join(", "));
            for (category, score) in scores.iter() {
                println!("    {:<15} {:>5.1}%", category.label(), score * 100.0);
            }
        }
        Notice::Failed { detail, .. } => {
            println!("[error] {}", notice);
            tracing::debug!("Failure detail: {}", detail);
        }
        Notice::EmptyComment | Notice::Busy | Notice::Discarded => {
            println!("[skipped] {}", notice)
        }
    }
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("commentguard=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("commentguard=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
