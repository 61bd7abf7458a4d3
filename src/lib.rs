//! sqm-bot — SQM ticket bot
//!
//! Telegram bot that reads the SQM ticket log from Google Sheets, answers
//! ticket lookups and posts an hourly report of young open tickets. This
//! crate re-exports the workspace crates so integration tests and benches can
//! import them from one place.
//!
//! # Architecture
//!
//! ```text
//! webhook / cron tick ──► sqm-server ──► sqm-core pipeline ──► sqm-clients
//!                                         (filter, format,      (Sheets, Telegram)
//!                                          chunk, notify)
//! ```

pub use sqm_clients;
pub use sqm_core;
pub use sqm_server;

/// Install the global `tracing` subscriber. `RUST_LOG` wins over `default`.
pub fn init_logging(default: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_target(false)
        .init();
}
