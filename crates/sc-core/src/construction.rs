//! # Construction Builder
//!
//! Batched element creation for the `create_elements` action.
//!
//! - Commands are kept in insertion order; result index *i* is command *i*
//! - Aliases map to the position of the command that declared them
//! - Connectors may reference earlier commands by alias (no forward references)
//!
//! The builder never talks to the server. It is turned into wire records
//! by `protocol::create_elements_payload`.

use crate::{ScAddr, ScError, ScLinkContent, ScType};
use std::collections::BTreeMap;

/// Endpoint of a connector under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementRef {
    /// An element that already exists.
    Addr(ScAddr),
    /// An element created earlier in the same construction.
    Alias(String),
}

impl From<ScAddr> for ElementRef {
    fn from(addr: ScAddr) -> Self {
        Self::Addr(addr)
    }
}

impl From<&str> for ElementRef {
    fn from(alias: &str) -> Self {
        Self::Alias(alias.to_string())
    }
}

impl From<String> for ElementRef {
    fn from(alias: String) -> Self {
        Self::Alias(alias)
    }
}

/// One pending create operation.
#[derive(Debug, Clone, PartialEq)]
pub enum ScConstructionCommand {
    Node {
        sc_type: ScType,
    },
    Connector {
        sc_type: ScType,
        source: ElementRef,
        target: ElementRef,
    },
    Link {
        sc_type: ScType,
        content: ScLinkContent,
    },
}

impl ScConstructionCommand {
    /// Type of the element this command creates.
    #[must_use]
    pub fn sc_type(&self) -> ScType {
        match self {
            Self::Node { sc_type } | Self::Connector { sc_type, .. } | Self::Link { sc_type, .. } => {
                *sc_type
            }
        }
    }
}

/// Ordered list of element-creation commands with alias bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct ScConstruction {
    commands: Vec<ScConstructionCommand>,
    aliases: BTreeMap<String, usize>,
}

impl ScConstruction {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node. The type must be a node type and not a link.
    pub fn add_node(&mut self, sc_type: ScType, alias: Option<&str>) -> Result<usize, ScError> {
        if !sc_type.is_node() || sc_type.is_link() {
            return Err(ScError::InvalidArgument(format!(
                "expected a node type, got {sc_type}"
            )));
        }
        Ok(self.push(ScConstructionCommand::Node { sc_type }, alias))
    }

    /// Append a connector between two existing or earlier-declared elements.
    pub fn add_connector(
        &mut self,
        sc_type: ScType,
        source: impl Into<ElementRef>,
        target: impl Into<ElementRef>,
        alias: Option<&str>,
    ) -> Result<usize, ScError> {
        if !sc_type.is_connector() {
            return Err(ScError::InvalidArgument(format!(
                "expected a connector type, got {sc_type}"
            )));
        }
        let cmd = ScConstructionCommand::Connector {
            sc_type,
            source: source.into(),
            target: target.into(),
        };
        Ok(self.push(cmd, alias))
    }

    /// Append a link carrying `content`.
    pub fn add_link(
        &mut self,
        sc_type: ScType,
        content: ScLinkContent,
        alias: Option<&str>,
    ) -> Result<usize, ScError> {
        if !sc_type.is_link() {
            return Err(ScError::InvalidArgument(format!(
                "expected a link type, got {sc_type}"
            )));
        }
        Ok(self.push(ScConstructionCommand::Link { sc_type, content }, alias))
    }

    /// Position of the command that declared `alias`.
    #[must_use]
    pub fn index_of(&self, alias: &str) -> Option<usize> {
        self.aliases.get(alias).copied()
    }

    #[must_use]
    pub fn commands(&self) -> &[ScConstructionCommand] {
        &self.commands
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn push(&mut self, cmd: ScConstructionCommand, alias: Option<&str>) -> usize {
        let index = self.commands.len();
        if let Some(alias) = alias {
            // A second declaration rebinds the alias.
            self.aliases.insert(alias.to_string(), index);
        }
        self.commands.push(cmd);
        index
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScLinkContentType;

    #[test]
    fn aliases_map_to_insertion_position() {
        let mut c = ScConstruction::new();
        c.add_node(ScType::CONST_NODE, Some("a")).expect("node");
        c.add_node(ScType::CONST_NODE, None).expect("node");
        c.add_node(ScType::CONST_NODE, Some("c")).expect("node");

        assert_eq!(c.index_of("a"), Some(0));
        assert_eq!(c.index_of("c"), Some(2));
        assert_eq!(c.index_of("b"), None);
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn node_rejects_non_node_types() {
        let mut c = ScConstruction::new();
        assert!(matches!(
            c.add_node(ScType::CONST_PERM_POS_ARC, None),
            Err(ScError::InvalidArgument(_))
        ));
        assert!(c.add_node(ScType::CONST_NODE_LINK, None).is_err());
        assert!(c.is_empty());
    }

    #[test]
    fn connector_rejects_node_types() {
        let mut c = ScConstruction::new();
        let result = c.add_connector(ScType::CONST_NODE, ScAddr::new(1), ScAddr::new(2), None);
        assert!(matches!(result, Err(ScError::InvalidArgument(_))));
    }

    #[test]
    fn link_requires_link_type() {
        let mut c = ScConstruction::new();
        let content = ScLinkContent::new("x", ScLinkContentType::String);
        assert!(c.add_link(ScType::CONST_NODE, content.clone(), None).is_err());
        assert_eq!(c.add_link(ScType::CONST_NODE_LINK, content, Some("l")).expect("link"), 0);
    }

    #[test]
    fn redeclared_alias_points_at_newest_command() {
        let mut c = ScConstruction::new();
        c.add_node(ScType::CONST_NODE, Some("x")).expect("node");
        c.add_node(ScType::VAR_NODE, Some("x")).expect("node");
        assert_eq!(c.index_of("x"), Some(1));
    }

    #[test]
    fn command_reports_its_type() {
        let mut c = ScConstruction::new();
        c.add_node(ScType::CONST_NODE, Some("n")).expect("node");
        c.add_connector(ScType::CONST_COMMON_ARC, "n", ScAddr::new(5), None)
            .expect("connector");
        let types: Vec<ScType> = c.commands().iter().map(ScConstructionCommand::sc_type).collect();
        assert_eq!(types, vec![ScType::CONST_NODE, ScType::CONST_COMMON_ARC]);
    }
}
