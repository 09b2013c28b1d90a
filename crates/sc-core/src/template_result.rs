//! # Template Result
//!
//! One match of a template: a flat address sequence, three addresses per
//! triple in template order, plus the alias map shared by every match of
//! the same response.

use crate::primitives::TRIPLE_ARITY;
use crate::{ScAddr, ScError};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Key accepted by `ScTemplateResult::get`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKey<'a> {
    Alias(&'a str),
    Index(usize),
}

impl<'a> From<&'a str> for TemplateKey<'a> {
    fn from(alias: &'a str) -> Self {
        Self::Alias(alias)
    }
}

impl<'a> From<&'a String> for TemplateKey<'a> {
    fn from(alias: &'a String) -> Self {
        Self::Alias(alias.as_str())
    }
}

impl From<usize> for TemplateKey<'_> {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScTemplateResult {
    addrs: Vec<ScAddr>,
    aliases: Arc<BTreeMap<String, usize>>,
}

impl ScTemplateResult {
    /// Build a result, checking that every alias points inside `addrs`.
    pub fn new(aliases: Arc<BTreeMap<String, usize>>, addrs: Vec<ScAddr>) -> Result<Self, ScError> {
        if let Some((alias, index)) = aliases.iter().find(|(_, i)| **i >= addrs.len()) {
            return Err(ScError::Protocol(format!(
                "alias '{alias}' points at index {index}, result has {} addresses",
                addrs.len()
            )));
        }
        Ok(Self { addrs, aliases })
    }

    /// Like `new`, additionally requiring whole triples.
    pub fn from_triples(
        aliases: Arc<BTreeMap<String, usize>>,
        addrs: Vec<ScAddr>,
    ) -> Result<Self, ScError> {
        if addrs.len() % TRIPLE_ARITY != 0 {
            return Err(ScError::Protocol(format!(
                "search result has {} addresses, not a multiple of {TRIPLE_ARITY}",
                addrs.len()
            )));
        }
        Self::new(aliases, addrs)
    }

    /// Address bound to an alias or found at a position.
    pub fn get<'a>(&self, key: impl Into<TemplateKey<'a>>) -> Option<ScAddr> {
        let index = match key.into() {
            TemplateKey::Alias(alias) => *self.aliases.get(alias)?,
            TemplateKey::Index(index) => index,
        };
        self.addrs.get(index).copied()
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.addrs.len()
    }

    #[must_use]
    pub fn addrs(&self) -> &[ScAddr] {
        &self.addrs
    }

    #[must_use]
    pub fn aliases(&self) -> &BTreeMap<String, usize> {
        &self.aliases
    }

    /// `(source, connector, target)` triples in template order.
    /// A trailing partial triple is skipped.
    pub fn triples(&self) -> impl Iterator<Item = (ScAddr, ScAddr, ScAddr)> + '_ {
        self.addrs
            .chunks_exact(TRIPLE_ARITY)
            .map(|t| (t[0], t[1], t[2]))
    }

    pub fn for_each_triple(&self, mut f: impl FnMut(ScAddr, ScAddr, ScAddr)) {
        for (src, connector, trg) in self.triples() {
            f(src, connector, trg);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
