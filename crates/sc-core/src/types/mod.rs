//! # Core Type Definitions
//!
//! This module contains the types shared by every layer of the client:
//! - Element address (`ScAddr`)
//! - Error types (`ScError`)
//!
//! ## Wire Guarantees
//!
//! `ScAddr` serializes as its bare number, exactly as the server sends it.
//! Error messages coming from the server are kept verbatim.

use crate::sc_type::ScType;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// ELEMENT ADDRESS
// =============================================================================

/// Opaque handle of an element stored in sc-memory.
///
/// The value `0` is the sentinel "invalid address". The server returns it
/// for lookups that found nothing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct ScAddr(pub u64);

impl ScAddr {
    /// The invalid address.
    pub const INVALID: Self = Self(0);

    /// Create an address from its raw value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw address value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Check if the address refers to an element (is non-zero).
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl From<u64> for ScAddr {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for ScAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur while talking to sc-memory.
///
/// - No silent failures
/// - Use `Result<T, ScError>` for fallible operations
/// - Builder misuse is reported before anything goes on the wire
#[derive(Debug, Error)]
pub enum ScError {
    /// A builder or template method received an argument of the wrong kind,
    /// or an alias could not be resolved.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Two types with incompatible bit groups were merged.
    #[error("Type conflict: cannot merge {left} with {right}")]
    TypeConflict {
        /// Receiver of the merge.
        left: ScType,
        /// Argument of the merge.
        right: ScType,
    },

    /// The server answered with a non-empty `errors` field.
    #[error("Server error: {}", .0.join("; "))]
    Server(Vec<String>),

    /// The server answered with a payload of an unexpected shape.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Request/response bookkeeping is broken (id collision, unmatched id).
    #[error("Consistency violation: {0}")]
    Consistency(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The transport could not deliver a request.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The connection was closed before the response arrived.
    #[error("Connection closed")]
    ConnectionClosed,

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),
}

impl ScError {
    /// Messages reported by the server, if this is a server error.
    #[must_use]
    pub fn server_messages(&self) -> Option<&[String]> {
        match self {
            Self::Server(messages) => Some(messages),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ScError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

// =============================================================================
// TESTS
// =============================================================================
