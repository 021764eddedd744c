use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use inquire::Text;

use crate::config::BotConfig;
use crate::handlers::discord::reply_for;
use crate::models::task::InboundMessage;
use crate::runtime;
use crate::service::deadline;
use crate::service::dispatcher::DispatchOutcome;

#[derive(Parser)]
#[command(about = "Relay chat messages into TickTick tasks due tonight")]
pub struct Cli {
    /// KEY=VALUE config file; falls back to CONFIG_FILE, then plain environment
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to Discord and relay messages
    Run,
    /// Create a single task from the terminal
    Add { text: Option<String> },
    /// Print the deadline a message received at `--at` would get
    Deadline {
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
}

pub async fn cli() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.or_else(|| std::env::var("CONFIG_FILE").ok());
    let config = BotConfig::load(config_path.as_deref()).context("failed to load configuration")?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => runtime::run_bot(config).await?,
        Commands::Add { text } => add_task(&config, text).await?,
        Commands::Deadline { at } => {
            let received = at.unwrap_or_else(Utc::now);
            let due = deadline::deadline_in(received, &config.dispatcher.timezone);
            println!("{}", deadline::format_due_date(&due));
        }
    }
    Ok(())
}

async fn add_task(config: &BotConfig, text: Option<String>) -> Result<()> {
    let text = match text {
        Some(text) => text,
        None => specify_prompt()?,
    };
    let dispatcher = runtime::build_dispatcher(config)?;
    let inbound = InboundMessage::new("cli", &text, Utc::now());
    let (outcome, pending) = dispatcher.dispatch_tracked(inbound).await;
    if let Some(reply) = reply_for(&outcome) {
        println!("{}", reply);
    }
    // The runtime stops when this returns, so give the echo its own send window.
    if let Some(pending) = pending {
        pending.wait(config.task_api.request_timeout).await;
    }
    if let DispatchOutcome::Task { result, .. } = &outcome {
        if !result.success {
            bail!(
                "task creation failed: {}",
                result.error_detail.as_deref().unwrap_or("unknown error")
            );
        }
    }
    Ok(())
}

fn specify_prompt() -> Result<String> {
    Ok(Text::new("Enter the task.").prompt()?)
}
