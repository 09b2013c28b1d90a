//! # Keynodes
//!
//! Symbolic identifiers resolved to addresses.
//!
//! - `KeynodeRequest` - one entry of a `keynodes` action
//! - `KeynodeCache` - bounded cache keyed by the raw identifier
//! - `Keynodes` - lookup result presented with camelCase keys
//!
//! The camelCase spelling is presentation only; wire payloads always carry
//! the original snake_case identifiers.

use crate::primitives::DEFAULT_KEYNODE_CACHE_SIZE;
use crate::{ScAddr, ScType};
use std::collections::{BTreeMap, VecDeque};

// =============================================================================
// REQUESTS
// =============================================================================

/// One identifier to look up.
///
/// With a valid `sc_type` the server creates the element when it is
/// missing (`resolve`); with `ScType::UNKNOWN` it only searches (`find`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeynodeRequest {
    pub idtf: String,
    pub sc_type: ScType,
}

impl KeynodeRequest {
    pub fn find(idtf: impl Into<String>) -> Self {
        Self {
            idtf: idtf.into(),
            sc_type: ScType::UNKNOWN,
        }
    }

    pub fn resolve(idtf: impl Into<String>, sc_type: ScType) -> Self {
        Self {
            idtf: idtf.into(),
            sc_type,
        }
    }

    #[must_use]
    pub fn is_resolve(&self) -> bool {
        self.sc_type.is_valid()
    }
}

// =============================================================================
// CACHE
// =============================================================================

/// Bounded identifier cache with insertion-order eviction.
///
/// Lookups do not refresh an entry; the oldest insertion is evicted first.
#[derive(Debug, Clone)]
pub struct KeynodeCache {
    capacity: usize,
    entries: BTreeMap<String, ScAddr>,
    order: VecDeque<String>,
}

impl Default for KeynodeCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_KEYNODE_CACHE_SIZE)
    }
}

impl KeynodeCache {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            entries: BTreeMap::new(),
            order: VecDeque::new(),
        }
    }

    #[must_use]
    pub fn get(&self, idtf: &str) -> Option<ScAddr> {
        self.entries.get(idtf).copied()
    }

    /// Cache `addr` under `idtf`.
    ///
    /// Invalid addresses are not cached, so a later lookup asks the server
    /// again. Returns the evicted identifier, if any.
    pub fn insert(&mut self, idtf: &str, addr: ScAddr) -> Option<String> {
        if !addr.is_valid() || self.capacity == 0 {
            return None;
        }
        if let Some(existing) = self.entries.get_mut(idtf) {
            *existing = addr;
            return None;
        }

        let evicted = if self.entries.len() >= self.capacity {
            self.order.pop_front().inspect(|oldest| {
                self.entries.remove(oldest);
            })
        } else {
            None
        };

        self.entries.insert(idtf.to_string(), addr);
        self.order.push_back(idtf.to_string());
        evicted
    }

    #[must_use]
    pub fn contains(&self, idtf: &str) -> bool {
        self.entries.contains_key(idtf)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

// =============================================================================
// PRESENTATION
// =============================================================================

/// `nrel_main_idtf` -> `nrelMainIdtf`.
#[must_use]
pub fn snake_to_camel_case(idtf: &str) -> String {
    let mut out = String::with_capacity(idtf.len());
    let mut chars = idtf.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('_', Some(next)) => {
                out.extend(next.to_uppercase());
                chars.next();
            }
            _ => out.push(c),
        }
    }
    out
}

/// Keynode addresses keyed by camelCase identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keynodes {
    by_name: BTreeMap<String, ScAddr>,
}

impl Keynodes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `addr` for the snake_case identifier `idtf`.
    pub fn insert(&mut self, idtf: &str, addr: ScAddr) {
        self.by_name.insert(snake_to_camel_case(idtf), addr);
    }

    /// Look up by either the camelCase or the original identifier.
    #[must_use]
    pub fn get(&self, idtf: &str) -> Option<ScAddr> {
        self.by_name
            .get(idtf)
            .or_else(|| self.by_name.get(&snake_to_camel_case(idtf)))
            .copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ScAddr)> {
        self.by_name.iter().map(|(k, v)| (k.as_str(), *v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
