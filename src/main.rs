use anyhow::Context;
use clap::{Parser, Subcommand};
use sqm_core::config::Settings;
use sqm_server::{handlers, BotContext};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "sqm-bot", about = "SQM ticket bot — Telegram webhook and hourly report")]
struct Cli {
    /// TOML file layered between the built-in defaults and the environment.
    #[arg(long, env = "SQM_BOT_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Subcommand)]
enum Cmd {
    /// Serve the webhook and cron routes (default).
    Serve {
        /// Listen address; overrides BIND_ADDR.
        #[arg(long)]
        bind: Option<String>,
    },
    /// Build and send the report once, then exit.
    Report,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    sqm_bot::init_logging(if cli.debug { "debug" } else { "info" });

    let settings = Settings::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Err(err) = settings.validate() {
        tracing::warn!(error = %err, "configuration incomplete; affected operations will fail");
    }

    let ctx = Arc::new(BotContext::initialize(settings));
    match cli.command.unwrap_or(Cmd::Serve { bind: None }) {
        Cmd::Serve { bind } => {
            let addr = bind.unwrap_or_else(|| ctx.settings.bind_addr.clone());
            sqm_server::serve(ctx, &addr).await
        }
        Cmd::Report => {
            handlers::invoke("report command", handlers::handle_scheduled_report(&ctx)).await;
            Ok(())
        }
    }
}
