//! # sc-client CLI Module
//!
//! ## Available Commands
//!
//! - `info` - Show connection info
//! - `check` - Show the types of elements
//! - `erase` - Erase elements
//! - `resolve` - Find (or create) keynodes by identifier
//! - `search` / `generate` - Run a template
//! - `scs` - Load SCs texts
//! - `content` - Get, set or search link contents
//! - `watch` - Print events for an element until interrupted
//! - `types` - List named element types (offline)

mod commands;

use clap::{Args, Parser, Subcommand};
use sc_client::ClientConfig;
use sc_core::ScError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// sc-client - command-line access to an sc-memory server
#[derive(Parser, Debug)]
#[command(name = "sc-client")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Server URL (overrides config file and SC_CLIENT_URL)
    #[arg(short, long, global = true)]
    pub url: Option<String>,

    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Keynode cache capacity
    #[arg(long, global = true)]
    pub keynode_cache_size: Option<usize>,

    /// Connection timeout in milliseconds
    #[arg(long, global = true)]
    pub connect_timeout_ms: Option<u64>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Config file and environment, overridden by flags.
    pub fn client_config(&self) -> Result<ClientConfig, ScError> {
        let mut config = ClientConfig::load(self.config.as_deref())?;
        if let Some(url) = &self.url {
            config.url.clone_from(url);
        }
        if let Some(size) = self.keynode_cache_size {
            config.keynode_cache_size = size;
        }
        if let Some(timeout) = self.connect_timeout_ms {
            config.connect_timeout_ms = timeout;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show connection info
    Info,

    /// Show the types of elements
    Check {
        /// Element addresses
        #[arg(required = true)]
        addrs: Vec<u64>,
    },

    /// Erase elements
    Erase {
        /// Element addresses
        #[arg(required = true)]
        addrs: Vec<u64>,
    },

    /// Find keynodes by identifier, creating them when a type is given
    Resolve {
        /// System identifiers
        #[arg(required = true)]
        idtfs: Vec<String>,

        /// Type to create missing keynodes with (e.g. ConstNodeClass)
        #[arg(short = 't', long)]
        sc_type: Option<String>,
    },

    /// Search by template
    Search {
        #[command(flatten)]
        template: TemplateArgs,
    },

    /// Generate by template
    Generate {
        #[command(flatten)]
        template: TemplateArgs,
    },

    /// Load SCs texts into the knowledge base
    Scs {
        /// SCs texts
        texts: Vec<String>,

        /// Read one more text from a file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Structure to add the generated elements to
        #[arg(short, long)]
        output_structure: Option<u64>,
    },

    /// Link contents
    Content {
        #[command(subcommand)]
        command: ContentCommands,
    },

    /// Print events for an element until interrupted
    Watch {
        /// Element address
        addr: u64,

        /// Event type (e.g. sc_event_after_generate_outgoing_arc)
        #[arg(short, long, default_value = "sc_event_after_generate_outgoing_arc")]
        event: String,

        /// Stop after this many events
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// List named element types
    Types {
        /// Only names containing this text
        filter: Option<String>,
    },
}

/// Where a template comes from. Exactly one source is required.
#[derive(Args, Debug)]
pub struct TemplateArgs {
    /// JSON file with template rows
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// SCs text or the system identifier of a stored template
    #[arg(short, long)]
    pub text: Option<String>,

    /// Address of a stored template
    #[arg(short, long)]
    pub addr: Option<u64>,

    /// Alias substitution, `alias=value` (numbers are addresses)
    #[arg(short, long = "param")]
    pub params: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum ContentCommands {
    /// Print link contents
    Get {
        /// Link addresses
        #[arg(required = true)]
        addrs: Vec<u64>,
    },

    /// Set the content of a link
    Set {
        /// Link address
        addr: u64,

        /// New content
        value: String,

        /// Content type (int, float, string, binary)
        #[arg(short = 't', long, default_value = "string")]
        kind: String,
    },

    /// Find links by content
    Find {
        /// Content to look for
        value: String,

        /// Match contents containing the value
        #[arg(short, long)]
        substring: bool,

        /// Print matching contents instead of links
        #[arg(long)]
        strings: bool,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), ScError> {
    let json_mode = cli.json_mode;

    if let Some(Commands::Types { filter }) = &cli.command {
        return cmd_types(json_mode, filter.as_deref());
    }

    let config = cli.client_config()?;
    let client = sc_client::ScClient::connect(&config).await?;

    match cli.command {
        Some(Commands::Info) | None => cmd_info(&client, json_mode).await,
        Some(Commands::Check { addrs }) => cmd_check(&client, json_mode, &addrs).await,
        Some(Commands::Erase { addrs }) => cmd_erase(&client, json_mode, &addrs).await,
        Some(Commands::Resolve { idtfs, sc_type }) => {
            cmd_resolve(&client, json_mode, &idtfs, sc_type.as_deref()).await
        }
        Some(Commands::Search { template }) => cmd_search(&client, json_mode, &template).await,
        Some(Commands::Generate { template }) => {
            cmd_generate(&client, json_mode, &template).await
        }
        Some(Commands::Scs {
            texts,
            file,
            output_structure,
        }) => cmd_scs(&client, json_mode, texts, file.as_deref(), output_structure).await,
        Some(Commands::Content { command }) => match command {
            ContentCommands::Get { addrs } => cmd_content_get(&client, json_mode, &addrs).await,
            ContentCommands::Set { addr, value, kind } => {
                cmd_content_set(&client, json_mode, addr, &value, &kind).await
            }
            ContentCommands::Find {
                value,
                substring,
                strings,
            } => cmd_content_find(&client, json_mode, &value, substring, strings).await,
        },
        Some(Commands::Watch { addr, event, count }) => {
            cmd_watch(&client, json_mode, addr, &event, count).await
        }
        Some(Commands::Types { filter }) => cmd_types(json_mode, filter.as_deref()),
    }
}
