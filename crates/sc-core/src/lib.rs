//! # sc-core
//!
//! The protocol layer of the sc-memory client - THE PROTOCOL.
//!
//! This crate describes everything a client exchanges with an sc-memory
//! server without ever touching a socket:
//! - `sc_type` - the packed bitmask type algebra used on the wire verbatim
//! - `construction` - batched element creation with alias bookkeeping
//! - `template` / `template_result` - the pattern DSL for search/generate
//! - `protocol` - request envelopes, per-action payloads, response decoding
//! - `keynodes` / `events` - identifier cache and push-notification decoding
//!
//! ## Architectural Constraints
//!
//! - Has NO async, NO network dependencies (pure Rust)
//! - Every wire shape is produced by exactly one encoder in `protocol`
//! - The bit layout lives in `sc_type::layout` and nowhere else

// =============================================================================
// MODULES
// =============================================================================

pub mod construction;
pub mod events;
pub mod keynodes;
pub mod link_content;
pub mod primitives;
pub mod protocol;
pub mod sc_type;
pub mod template;
pub mod template_result;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{ScAddr, ScError};

// =============================================================================
// RE-EXPORTS: Type Algebra & Builders
// =============================================================================

pub use construction::{ElementRef, ScConstruction, ScConstructionCommand};
pub use link_content::{LinkData, ScLinkContent, ScLinkContentType};
pub use sc_type::ScType;
pub use template::{
    ScTemplate, ScTemplateSource, ScTemplateTriple, TemplateItem, TemplateParam, TemplateValue,
};
pub use template_result::{ScTemplateResult, TemplateKey};

// =============================================================================
// RE-EXPORTS: Keynodes & Events
// =============================================================================

pub use events::{EventNotification, ScEventSubscriptionParams, ScEventType};
pub use keynodes::{KeynodeCache, KeynodeRequest, Keynodes, snake_to_camel_case};

// =============================================================================
// RE-EXPORTS: Protocol (from protocol module)
// =============================================================================

pub use protocol::{
    Action, ConnectionInfo, Request, Response, ScsText, ServerErrors, TemplateParamValue,
    TemplateParams,
};
