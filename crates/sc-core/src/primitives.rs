//! # Protocol Primitives
//!
//! Fixed constants of the sc-memory client protocol.
//!
//! These values are compiled into the binary. Configuration may override
//! the defaults, never the protocol constants.

/// Default server endpoint.
pub const DEFAULT_SERVER_URL: &str = "ws://localhost:8090";

/// Default capacity of the keynode cache.
///
/// - When full, the least-recently-inserted identifier is evicted.
pub const DEFAULT_KEYNODE_CACHE_SIZE: usize = 5000;

/// Default connection timeout in milliseconds (CLI only; the facade
/// itself never times out a request).
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5000;

/// Prefix of aliases synthesized for quintuple connectors.
///
/// User-declared aliases starting with this prefix are rejected so that
/// generated names never collide.
pub const GENERATED_ALIAS_PREFIX: &str = "_connector_";

/// Number of addresses per triple in a template result.
pub const TRIPLE_ARITY: usize = 3;

/// Element count of an event notification payload: `(addr, connector, other)`.
pub const EVENT_PAYLOAD_LEN: usize = 3;

/// Element count of an event notification payload that echoes the
/// subscription id as a fourth element.
pub const EVENT_PAYLOAD_LEN_WITH_ID: usize = 4;
