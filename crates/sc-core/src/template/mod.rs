//! # Template DSL
//!
//! Patterns for the `search_template` and `generate_template` actions.
//!
//! A template is an ordered list of triples `(source, connector, target)`.
//! Each slot holds an address, a type pattern, or a reference to an alias
//! declared on another slot, and may declare an alias of its own.
//!
//! ```text
//! template.triple(addr, ScType::VAR_PERM_POS_ARC, (ScType::VAR_NODE, "_x"))?;
//! template.triple("_x", ScType::VAR_PERM_POS_ARC, ScType::VAR_NODE)?;
//! ```
//!
//! ## Quintuples
//!
//! `quintuple(src, conn, trg, rel_conn, rel)` expands into two triples that
//! share the connector alias:
//!
//! ```text
//! (src, [conn, alias], trg)
//! (rel, rel_conn, alias)
//! ```
//!
//! Generated aliases start with `_connector_`; user aliases may not.
//!
//! The server is the final arbiter of unresolved alias references.

mod parse;

use crate::primitives::GENERATED_ALIAS_PREFIX;
use crate::{ScAddr, ScError, ScType};

// =============================================================================
// SLOTS
// =============================================================================

/// Content of one template slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateValue {
    Addr(ScAddr),
    Type(ScType),
    /// Reference to an alias declared on another slot.
    Alias(String),
}

impl From<ScAddr> for TemplateValue {
    fn from(addr: ScAddr) -> Self {
        Self::Addr(addr)
    }
}

impl From<ScType> for TemplateValue {
    fn from(sc_type: ScType) -> Self {
        Self::Type(sc_type)
    }
}

impl From<&str> for TemplateValue {
    fn from(alias: &str) -> Self {
        Self::Alias(alias.to_string())
    }
}

impl From<String> for TemplateValue {
    fn from(alias: String) -> Self {
        Self::Alias(alias)
    }
}

/// A validated slot: its value and the alias it declares, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateItem {
    pub value: TemplateValue,
    pub alias: Option<String>,
}

/// Argument of `triple`/`quintuple`: a bare value or a `(value, alias)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateParam {
    Value(TemplateValue),
    Aliased(TemplateValue, String),
}

impl From<TemplateValue> for TemplateParam {
    fn from(value: TemplateValue) -> Self {
        Self::Value(value)
    }
}

impl From<ScAddr> for TemplateParam {
    fn from(addr: ScAddr) -> Self {
        Self::Value(TemplateValue::Addr(addr))
    }
}

impl From<ScType> for TemplateParam {
    fn from(sc_type: ScType) -> Self {
        Self::Value(TemplateValue::Type(sc_type))
    }
}

impl From<&str> for TemplateParam {
    fn from(reference: &str) -> Self {
        Self::Value(TemplateValue::Alias(reference.to_string()))
    }
}

impl From<String> for TemplateParam {
    fn from(reference: String) -> Self {
        Self::Value(TemplateValue::Alias(reference))
    }
}

impl From<(ScAddr, &str)> for TemplateParam {
    fn from((addr, alias): (ScAddr, &str)) -> Self {
        Self::Aliased(TemplateValue::Addr(addr), alias.to_string())
    }
}

impl From<(ScType, &str)> for TemplateParam {
    fn from((sc_type, alias): (ScType, &str)) -> Self {
        Self::Aliased(TemplateValue::Type(sc_type), alias.to_string())
    }
}

impl From<(&str, &str)> for TemplateParam {
    fn from((reference, alias): (&str, &str)) -> Self {
        Self::Aliased(TemplateValue::Alias(reference.to_string()), alias.to_string())
    }
}

impl TemplateParam {
    fn into_item(self) -> Result<TemplateItem, ScError> {
        match self {
            Self::Value(value) => Ok(TemplateItem { value, alias: None }),
            Self::Aliased(TemplateValue::Alias(reference), alias) => {
                Err(ScError::InvalidArgument(format!(
                    "aliased slot '{alias}' must hold an address or a type, got alias reference '{reference}'"
                )))
            }
            Self::Aliased(value, alias) => {
                if alias.starts_with(GENERATED_ALIAS_PREFIX) {
                    return Err(ScError::InvalidArgument(format!(
                        "alias '{alias}' uses the reserved prefix '{GENERATED_ALIAS_PREFIX}'"
                    )));
                }
                Ok(TemplateItem {
                    value,
                    alias: Some(alias),
                })
            }
        }
    }
}

// =============================================================================
// TEMPLATE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScTemplateTriple {
    pub source: TemplateItem,
    pub connector: TemplateItem,
    pub target: TemplateItem,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScTemplate {
    triples: Vec<ScTemplateTriple>,
}

impl ScTemplate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one triple.
    ///
    /// Fails with `InvalidArgument` when a pair holds an alias reference
    /// instead of an address or type, or declares a reserved alias. Nothing
    /// is appended on failure.
    pub fn triple(
        &mut self,
        source: impl Into<TemplateParam>,
        connector: impl Into<TemplateParam>,
        target: impl Into<TemplateParam>,
    ) -> Result<&mut Self, ScError> {
        let triple = ScTemplateTriple {
            source: source.into().into_item()?,
            connector: connector.into().into_item()?,
            target: target.into().into_item()?,
        };
        self.triples.push(triple);
        Ok(self)
    }

    /// Append a relation statement as two triples sharing the connector alias.
    ///
    /// The alias is the one given with `connector`, or a generated one.
    pub fn quintuple(
        &mut self,
        source: impl Into<TemplateParam>,
        connector: impl Into<TemplateParam>,
        target: impl Into<TemplateParam>,
        rel_connector: impl Into<TemplateParam>,
        rel_node: impl Into<TemplateParam>,
    ) -> Result<&mut Self, ScError> {
        let mut connector = connector.into().into_item()?;
        if matches!(connector.value, TemplateValue::Alias(_)) {
            return Err(ScError::InvalidArgument(
                "quintuple connector must be an address or a type".to_string(),
            ));
        }
        let alias = match &connector.alias {
            Some(alias) => alias.clone(),
            None => {
                let generated = format!("{GENERATED_ALIAS_PREFIX}{}", self.triples.len());
                connector.alias = Some(generated.clone());
                generated
            }
        };

        let primary = ScTemplateTriple {
            source: source.into().into_item()?,
            connector,
            target: target.into().into_item()?,
        };
        let relation = ScTemplateTriple {
            source: rel_node.into().into_item()?,
            connector: rel_connector.into().into_item()?,
            target: TemplateItem {
                value: TemplateValue::Alias(alias),
                alias: None,
            },
        };

        self.triples.push(primary);
        self.triples.push(relation);
        Ok(self)
    }

    #[must_use]
    pub fn triples(&self) -> &[ScTemplateTriple] {
        &self.triples
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }
}

// =============================================================================
// TEMPLATE SOURCES
// =============================================================================

/// Everything the server accepts as a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScTemplateSource {
    /// Triples built on the client.
    Triples(ScTemplate),
    /// Template text in SCs notation.
    Scs(String),
    /// Template stored on the server as a structure.
    Addr(ScAddr),
    /// Template stored on the server under a system identifier.
    Idtf(String),
}

impl ScTemplateSource {
    /// `Idtf` for a bare system identifier (`[a-z0-9_]+`), `Scs` otherwise.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let is_idtf = !text.is_empty()
            && text
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_');
        if is_idtf {
            Self::Idtf(text)
        } else {
            Self::Scs(text)
        }
    }
}

impl From<ScTemplate> for ScTemplateSource {
    fn from(template: ScTemplate) -> Self {
        Self::Triples(template)
    }
}

impl From<&ScTemplate> for ScTemplateSource {
    fn from(template: &ScTemplate) -> Self {
        Self::Triples(template.clone())
    }
}

impl From<ScAddr> for ScTemplateSource {
    fn from(addr: ScAddr) -> Self {
        Self::Addr(addr)
    }
}

impl From<&str> for ScTemplateSource {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

// =============================================================================
// TESTS
// =============================================================================
