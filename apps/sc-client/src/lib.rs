//! # sc-client
//!
//! Async client for sc-memory servers - THE CLIENT.
//!
//! - `transport` - the request/response seam and its WebSocket implementation
//! - `client` - `ScClient`, one method per server action
//! - `config` - connection settings from file, environment and flags
//!
//! Every payload is built and every response is judged by `sc-core`; this
//! crate only moves messages and keeps per-connection state (pending
//! requests, subscriptions, the keynode cache).
//!
//! ## Example
//!
//! ```no_run
//! use sc_client::{ClientConfig, ScClient};
//! use sc_core::{ScTemplate, ScType};
//!
//! # async fn run() -> Result<(), sc_core::ScError> {
//! let client = ScClient::connect(&ClientConfig::default()).await?;
//! let keynodes = client.search_keynodes(&["nrel_main_idtf"]).await?;
//!
//! let mut template = ScTemplate::new();
//! if let Some(relation) = keynodes.get("nrel_main_idtf") {
//!     template.quintuple(
//!         (ScType::VAR_NODE, "_node"),
//!         ScType::VAR_COMMON_ARC,
//!         (ScType::VAR_NODE_LINK, "_idtf"),
//!         ScType::VAR_PERM_POS_ARC,
//!         relation,
//!     )?;
//! }
//! let results = client.search_by_template(&template, &Default::default()).await?;
//! println!("{} matches", results.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod transport;

pub use client::{ScClient, ScEventSubscription};
pub use config::ClientConfig;
pub use transport::{EventRouter, ResponseHook, Transport, WsTransport};
