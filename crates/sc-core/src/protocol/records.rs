//! Payload records of every action.

use crate::{LinkData, ScAddr, ScType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// =============================================================================
// CONNECTION INFO
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionInfo {
    pub connection_id: u64,
    pub user_addr: ScAddr,
}

// =============================================================================
// CREATE ELEMENTS
// =============================================================================

/// Connector endpoint: an existing element or an earlier command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum EndpointRecord {
    Addr(ScAddr),
    Ref(usize),
}

/// One `create_elements` record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "el", rename_all = "lowercase")]
pub enum ElementRecord {
    Node {
        #[serde(rename = "type")]
        kind: ScType,
    },
    #[serde(rename = "edge")]
    Connector {
        #[serde(rename = "type")]
        kind: ScType,
        src: EndpointRecord,
        trg: EndpointRecord,
    },
    Link {
        #[serde(rename = "type")]
        kind: ScType,
        content: LinkData,
        content_type: u8,
    },
}

/// One `create_elements_by_scs` item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScsText {
    /// SCs text loaded into the knowledge base as is.
    Plain(String),
    /// SCs text whose elements are also added to `output_structure`.
    WithOutput {
        scs: String,
        output_structure: ScAddr,
    },
}

impl From<&str> for ScsText {
    fn from(text: &str) -> Self {
        Self::Plain(text.to_string())
    }
}

impl From<String> for ScsText {
    fn from(text: String) -> Self {
        Self::Plain(text)
    }
}

// =============================================================================
// CONTENT
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ContentCommand {
    Set {
        #[serde(rename = "type")]
        kind: String,
        data: LinkData,
        addr: ScAddr,
    },
    Get {
        addr: ScAddr,
    },
    Find {
        data: LinkData,
    },
    FindLinksBySubstr {
        data: LinkData,
    },
    FindStringsBySubstr {
        data: LinkData,
    },
}

/// One entry of a `content get` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    #[serde(default)]
    pub value: Option<LinkData>,
    #[serde(rename = "type", default)]
    pub kind: String,
}

// =============================================================================
// KEYNODES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum KeynodeCommand {
    Find {
        idtf: String,
    },
    Resolve {
        idtf: String,
        #[serde(rename = "elType")]
        el_type: ScType,
    },
}

// =============================================================================
// TEMPLATES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    Addr,
    Type,
    Alias,
}

/// One template slot on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotRecord {
    #[serde(rename = "type")]
    pub kind: SlotKind,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

/// Value substituted for an alias in a search or generate call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemplateParamValue {
    /// Sent as the bare address number.
    Addr(ScAddr),
    /// Sent as is (named-template substitution).
    Text(String),
}

impl From<ScAddr> for TemplateParamValue {
    fn from(addr: ScAddr) -> Self {
        Self::Addr(addr)
    }
}

impl From<&str> for TemplateParamValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for TemplateParamValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Alias -> value substitutions.
pub type TemplateParams = BTreeMap<String, TemplateParamValue>;

/// `search_template` response payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPayload {
    #[serde(default)]
    pub aliases: BTreeMap<String, usize>,
    #[serde(default)]
    pub addrs: Vec<Vec<ScAddr>>,
}

/// `generate_template` response payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratePayload {
    #[serde(default)]
    pub aliases: BTreeMap<String, usize>,
    #[serde(default)]
    pub addrs: Vec<ScAddr>,
}

// =============================================================================
// EVENTS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    #[serde(rename = "type")]
    pub event_type: crate::ScEventType,
    pub addr: ScAddr,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventsCommand {
    Create(Vec<SubscriptionRecord>),
    Delete(Vec<u64>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn element_records_use_original_field_names() {
        let node = ElementRecord::Node {
            kind: ScType::CONST_NODE,
        };
        assert_eq!(
            serde_json::to_value(&node).expect("ser"),
            json!({"el": "node", "type": ScType::CONST_NODE.value()})
        );

        let connector = ElementRecord::Connector {
            kind: ScType::CONST_COMMON_ARC,
            src: EndpointRecord::Addr(ScAddr::new(9)),
            trg: EndpointRecord::Ref(0),
        };
        assert_eq!(
            serde_json::to_value(&connector).expect("ser"),
            json!({
                "el": "edge",
                "type": ScType::CONST_COMMON_ARC.value(),
                "src": {"type": "addr", "value": 9},
                "trg": {"type": "ref", "value": 0}
            })
        );
    }

    #[test]
    fn keynode_commands() {
        let find = KeynodeCommand::Find { idtf: "a".into() };
        assert_eq!(
            serde_json::to_value(&find).expect("ser"),
            json!({"command": "find", "idtf": "a"})
        );
        let resolve = KeynodeCommand::Resolve {
            idtf: "a".into(),
            el_type: ScType::CONST_NODE_CLASS,
        };
        assert_eq!(
            serde_json::to_value(&resolve).expect("ser"),
            json!({"command": "resolve", "idtf": "a", "elType": ScType::CONST_NODE_CLASS.value()})
        );
    }

    #[test]
    fn content_commands() {
        let cmd = ContentCommand::FindLinksBySubstr {
            data: LinkData::String("ab".into()),
        };
        assert_eq!(
            serde_json::to_value(&cmd).expect("ser"),
            json!({"command": "find_links_by_substr", "data": "ab"})
        );
    }

    #[test]
    fn scs_items() {
        let items = vec![
            ScsText::from("a -> b;;"),
            ScsText::WithOutput {
                scs: "c -> d;;".into(),
                output_structure: ScAddr::new(4),
            },
        ];
        assert_eq!(
            serde_json::to_value(&items).expect("ser"),
            json!(["a -> b;;", {"scs": "c -> d;;", "output_structure": 4}])
        );
    }

    #[test]
    fn events_commands() {
        let create = EventsCommand::Create(vec![SubscriptionRecord {
            event_type: crate::ScEventType::BeforeEraseElement,
            addr: ScAddr::new(3),
        }]);
        assert_eq!(
            serde_json::to_value(&create).expect("ser"),
            json!({"create": [{"type": "sc_event_before_erase_element", "addr": 3}]})
        );
        assert_eq!(
            serde_json::to_value(EventsCommand::Delete(vec![1, 2])).expect("ser"),
            json!({"delete": [1, 2]})
        );
    }
}
