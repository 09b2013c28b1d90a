//! # Events
//!
//! Subscription parameters and decoding of server-pushed notifications.
//!
//! A notification arrives with `event: true`; its `id` is the subscription
//! id and its payload is `[addr, connector, other]`, optionally followed by
//! an echo of the subscription id.

use crate::primitives::{EVENT_PAYLOAD_LEN, EVENT_PAYLOAD_LEN_WITH_ID};
use crate::{ScAddr, ScError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScEventType {
    #[serde(rename = "sc_event_after_generate_connector")]
    AfterGenerateConnector,
    #[serde(rename = "sc_event_after_generate_outgoing_arc")]
    AfterGenerateOutgoingArc,
    #[serde(rename = "sc_event_after_generate_incoming_arc")]
    AfterGenerateIncomingArc,
    #[serde(rename = "sc_event_after_generate_edge")]
    AfterGenerateEdge,
    #[serde(rename = "sc_event_before_erase_connector")]
    BeforeEraseConnector,
    #[serde(rename = "sc_event_before_erase_outgoing_arc")]
    BeforeEraseOutgoingArc,
    #[serde(rename = "sc_event_before_erase_incoming_arc")]
    BeforeEraseIncomingArc,
    #[serde(rename = "sc_event_before_erase_edge")]
    BeforeEraseEdge,
    #[serde(rename = "sc_event_before_erase_element")]
    BeforeEraseElement,
    #[serde(rename = "sc_event_before_change_link_content")]
    BeforeChangeLinkContent,
    #[serde(rename = "unknown", other)]
    Unknown,
}

impl ScEventType {
    pub const ALL: [Self; 11] = [
        Self::AfterGenerateConnector,
        Self::AfterGenerateOutgoingArc,
        Self::AfterGenerateIncomingArc,
        Self::AfterGenerateEdge,
        Self::BeforeEraseConnector,
        Self::BeforeEraseOutgoingArc,
        Self::BeforeEraseIncomingArc,
        Self::BeforeEraseEdge,
        Self::BeforeEraseElement,
        Self::BeforeChangeLinkContent,
        Self::Unknown,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AfterGenerateConnector => "sc_event_after_generate_connector",
            Self::AfterGenerateOutgoingArc => "sc_event_after_generate_outgoing_arc",
            Self::AfterGenerateIncomingArc => "sc_event_after_generate_incoming_arc",
            Self::AfterGenerateEdge => "sc_event_after_generate_edge",
            Self::BeforeEraseConnector => "sc_event_before_erase_connector",
            Self::BeforeEraseOutgoingArc => "sc_event_before_erase_outgoing_arc",
            Self::BeforeEraseIncomingArc => "sc_event_before_erase_incoming_arc",
            Self::BeforeEraseEdge => "sc_event_before_erase_edge",
            Self::BeforeEraseElement => "sc_event_before_erase_element",
            Self::BeforeChangeLinkContent => "sc_event_before_change_link_content",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a wire name; unrecognized names map to `Unknown`.
    #[must_use]
    pub fn from_wire(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == name)
            .unwrap_or(Self::Unknown)
    }
}

impl fmt::Display for ScEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScEventSubscriptionParams {
    pub addr: ScAddr,
    pub event_type: ScEventType,
}

impl ScEventSubscriptionParams {
    pub fn new(addr: ScAddr, event_type: ScEventType) -> Self {
        Self { addr, event_type }
    }
}

/// One decoded notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventNotification {
    pub subscription_id: u64,
    /// Element the subscription watches.
    pub addr: ScAddr,
    /// Connector that triggered the event.
    pub connector: ScAddr,
    /// Element at the other end of `connector`.
    pub other: ScAddr,
}

impl EventNotification {
    /// Decode the payload of an `event: true` message.
    pub fn decode(subscription_id: u64, payload: &Value) -> Result<Self, ScError> {
        let items: Vec<u64> = serde_json::from_value(payload.clone()).map_err(|e| {
            ScError::Protocol(format!("event payload must be an array of addresses: {e}"))
        })?;

        match items.as_slice() {
            [addr, connector, other] => Ok(Self::new(subscription_id, *addr, *connector, *other)),
            [addr, connector, other, echo] => {
                if *echo != subscription_id {
                    return Err(ScError::Protocol(format!(
                        "event payload echoes subscription {echo}, message is for {subscription_id}"
                    )));
                }
                Ok(Self::new(subscription_id, *addr, *connector, *other))
            }
            other => Err(ScError::Protocol(format!(
                "event payload must have {EVENT_PAYLOAD_LEN} or {EVENT_PAYLOAD_LEN_WITH_ID} elements, got {}",
                other.len()
            ))),
        }
    }

    fn new(subscription_id: u64, addr: u64, connector: u64, other: u64) -> Self {
        Self {
            subscription_id,
            addr: ScAddr::new(addr),
            connector: ScAddr::new(connector),
            other: ScAddr::new(other),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn event_type_names_round_trip() {
        for t in ScEventType::ALL {
            assert_eq!(ScEventType::from_wire(t.as_str()), t);
            let json = serde_json::to_value(t).expect("serialize");
            assert_eq!(json, json!(t.as_str()));
        }
        assert_eq!(ScEventType::from_wire("sc_event_bogus"), ScEventType::Unknown);
    }

    #[test]
    fn unknown_name_deserializes_to_unknown() {
        let t: ScEventType = serde_json::from_value(json!("sc_event_add_output_arc")).expect("de");
        assert_eq!(t, ScEventType::Unknown);
    }

    #[test]
    fn decodes_three_element_payload() {
        let n = EventNotification::decode(7, &json!([1, 2, 3])).expect("decode");
        assert_eq!(n.subscription_id, 7);
        assert_eq!(n.addr, ScAddr::new(1));
        assert_eq!(n.connector, ScAddr::new(2));
        assert_eq!(n.other, ScAddr::new(3));
    }

    #[test]
    fn decodes_payload_with_id_echo() {
        let n = EventNotification::decode(7, &json!([1, 2, 3, 7])).expect("decode");
        assert_eq!(n.other, ScAddr::new(3));
        assert!(EventNotification::decode(7, &json!([1, 2, 3, 8])).is_err());
    }

    #[test]
    fn rejects_malformed_payloads() {
        assert!(EventNotification::decode(1, &json!([1, 2])).is_err());
        assert!(EventNotification::decode(1, &json!({"addr": 1})).is_err());
        assert!(EventNotification::decode(1, &json!([1, 2, 3, 1, 5])).is_err());
    }
}
