//! # Wire Protocol
//!
//! JSON messages exchanged with an sc-memory server.
//!
//! ```text
//! outbound: {"id": 1, "type": "search_template", "payload": {...}}
//! inbound:  {"id": 1, "status": true, "event": false, "payload": {...}, "errors": [...]}
//! ```
//!
//! - `records` - serde shapes of every action payload
//! - `encode` - domain objects to payloads (one encoder per shape)
//! - `decode` - responses to domain objects, applying the errors policy
//!
//! ## Errors Policy
//!
//! `status` only says whether the server found or produced something.
//! A non-empty `errors` field fails the call, whatever `status` says, and
//! takes precedence over any result decoded from the same response.

pub mod decode;
pub mod encode;
pub mod records;

use crate::ScError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub use records::{
    ConnectionInfo, ContentCommand, ElementRecord, EndpointRecord, KeynodeCommand, ScsText,
    TemplateParamValue, TemplateParams,
};

// =============================================================================
// ACTIONS
// =============================================================================

/// Action names understood by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    ConnectionInfo,
    CheckElements,
    CreateElements,
    CreateElementsByScs,
    DeleteElements,
    Content,
    Keynodes,
    SearchTemplate,
    GenerateTemplate,
    Events,
}

impl Action {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConnectionInfo => "connection_info",
            Self::CheckElements => "check_elements",
            Self::CreateElements => "create_elements",
            Self::CreateElementsByScs => "create_elements_by_scs",
            Self::DeleteElements => "delete_elements",
            Self::Content => "content",
            Self::Keynodes => "keynodes",
            Self::SearchTemplate => "search_template",
            Self::GenerateTemplate => "generate_template",
            Self::Events => "events",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// ENVELOPES
// =============================================================================

/// Outbound message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub id: u64,
    #[serde(rename = "type")]
    pub action: Action,
    pub payload: Value,
}

impl Request {
    pub fn new(id: u64, action: Action, payload: Value) -> Self {
        Self {
            id,
            action,
            payload,
        }
    }
}

/// One structured server error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerErrorItem {
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<i64>,
    pub message: String,
}

/// The `errors` field: a bare message or a list of structured errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServerErrors {
    Message(String),
    Items(Vec<ServerErrorItem>),
}

impl ServerErrors {
    /// Messages as surfaced to callers. Empty when there is no error.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Message(m) if m.is_empty() => Vec::new(),
            Self::Message(m) => vec![m.clone()],
            Self::Items(items) => items.iter().map(|i| i.message.clone()).collect(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Message(m) => m.is_empty(),
            Self::Items(items) => items.is_empty(),
        }
    }
}

/// Inbound message: a response, or an event when `event` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: u64,
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub event: bool,
    #[serde(default)]
    pub payload: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<ServerErrors>,
}

impl Response {
    /// Successful response carrying `payload`.
    pub fn ok(id: u64, payload: Value) -> Self {
        Self {
            id,
            status: true,
            event: false,
            payload,
            errors: None,
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: bool) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_errors(mut self, errors: ServerErrors) -> Self {
        self.errors = Some(errors);
        self
    }

    /// Error messages carried by this response (possibly none).
    #[must_use]
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.as_ref().map(ServerErrors::messages).unwrap_or_default()
    }

    /// Fail with `ScError::Server` when `errors` is non-empty.
    pub fn check_errors(&self) -> Result<(), ScError> {
        match &self.errors {
            Some(errors) if !errors.is_empty() => Err(ScError::Server(errors.messages())),
            _ => Ok(()),
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
    fn action_names_match_serde() {
        let all = [
            Action::ConnectionInfo,
            Action::CheckElements,
            Action::CreateElements,
            Action::CreateElementsByScs,
            Action::DeleteElements,
            Action::Content,
            Action::Keynodes,
            Action::SearchTemplate,
            Action::GenerateTemplate,
            Action::Events,
        ];
        for action in all {
            assert_eq!(serde_json::to_value(action).expect("ser"), json!(action.as_str()));
        }
    }

    #[test]
    fn request_envelope_shape() {
        let req = Request::new(3, Action::DeleteElements, json!([1, 2]));
        assert_eq!(
            serde_json::to_value(&req).expect("ser"),
            json!({"id": 3, "type": "delete_elements", "payload": [1, 2]})
        );
    }

    #[test]
    fn errors_as_bare_string() {
        let resp: Response = serde_json::from_value(json!({
            "id": 1, "status": false, "event": false, "payload": null, "errors": "boom"
        }))
        .expect("de");
        assert_eq!(resp.error_messages(), vec!["boom".to_string()]);
        assert!(matches!(resp.check_errors(), Err(ScError::Server(m)) if m == ["boom"]));
    }

    #[test]
    fn errors_as_structured_list() {
        let resp: Response = serde_json::from_value(json!({
            "id": 1, "status": true, "event": false, "payload": [],
            "errors": [{"ref": 1, "message": "x"}, {"ref": 2, "message": "y"}]
        }))
        .expect("de");
        assert_eq!(resp.error_messages(), vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn empty_or_missing_errors_pass() {
        let missing: Response =
            serde_json::from_value(json!({"id": 1, "status": true, "event": false, "payload": 1}))
                .expect("de");
        assert!(missing.check_errors().is_ok());

        let empty: Response = serde_json::from_value(json!({
            "id": 1, "status": true, "event": false, "payload": 1, "errors": []
        }))
        .expect("de");
        assert!(empty.check_errors().is_ok());

        let null: Response = serde_json::from_value(json!({
            "id": 1, "status": true, "event": false, "payload": 1, "errors": null
        }))
        .expect("de");
        assert!(null.check_errors().is_ok());
    }
}
