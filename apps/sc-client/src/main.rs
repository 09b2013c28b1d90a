//! # sc-client
//!
//! Command-line client for sc-memory servers.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                apps/sc-client (THE CLIENT)               │
//! │                                                          │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐  │
//! │  │    CLI      │───▶│  ScClient   │───▶│ WsTransport │──┼──▶ server
//! │  │   (clap)    │    │  (facade)   │    │ (tungstenite)│  │
//! │  └─────────────┘    └──────┬──────┘    └─────────────┘  │
//! │                            ▼                             │
//! │                    ┌───────────────┐                     │
//! │                    │    sc-core    │                     │
//! │                    │ (THE PROTOCOL)│                     │
//! │                    └───────────────┘                     │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! sc-client --url ws://localhost:8090 info
//! sc-client resolve nrel_main_idtf concept_apple
//! sc-client search --file template.json --param _apple=42
//! sc-client content set 512 "hello" --kind string
//! sc-client watch 42 --event sc_event_after_generate_outgoing_arc
//! ```

mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Initialize tracing - SC_CLIENT_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("SC_CLIENT_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sc_client=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Banner goes to stderr so --json-mode output stays clean
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the startup banner.
fn print_banner() {
    eprintln!("sc-client v{}", env!("CARGO_PKG_VERSION"));
}
