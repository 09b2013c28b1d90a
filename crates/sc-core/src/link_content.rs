//! # Link Content
//!
//! Typed payload attached to link elements.
//!
//! The server names content kinds with string tags (`"int"`, `"float"`,
//! `"string"`, `"binary"`) in `content` requests and with numeric codes
//! (`0..=3`) in `create_elements` link records.

use crate::{ScAddr, ScError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of content stored in a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScLinkContentType {
    Int,
    Float,
    #[default]
    String,
    Binary,
}

impl ScLinkContentType {
    /// All kinds, in wire-code order.
    pub const ALL: [Self; 4] = [Self::Int, Self::Float, Self::String, Self::Binary];

    /// String tag used by `content` requests.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Binary => "binary",
        }
    }

    /// Numeric code used by `create_elements` link records.
    #[must_use]
    pub const fn wire_code(self) -> u8 {
        match self {
            Self::Int => 0,
            Self::Float => 1,
            Self::String => 2,
            Self::Binary => 3,
        }
    }

    /// Tag from a `content get` response. Unknown tags are binary.
    #[must_use]
    pub fn from_wire(tag: &str) -> Self {
        tag.parse().unwrap_or(Self::Binary)
    }
}

impl FromStr for ScLinkContentType {
    type Err = ScError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int" => Ok(Self::Int),
            "float" => Ok(Self::Float),
            "string" => Ok(Self::String),
            "binary" => Ok(Self::Binary),
            other => Err(ScError::InvalidArgument(format!(
                "unknown link content type: {other}"
            ))),
        }
    }
}

impl fmt::Display for ScLinkContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw content value as it travels on the wire.
///
/// Integers are tried before floats so `42` stays an integer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LinkData {
    Int(i64),
    Float(f64),
    String(String),
}

impl fmt::Display for LinkData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(v) => f.write_str(v),
        }
    }
}

impl From<i64> for LinkData {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for LinkData {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for LinkData {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for LinkData {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

/// Content of a link, optionally bound to the link that owns it.
///
/// `addr` is required when writing content to an existing link and absent
/// for content that is part of a pending construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ScLinkContent {
    pub data: LinkData,
    pub kind: ScLinkContentType,
    pub addr: Option<ScAddr>,
}

impl ScLinkContent {
    /// Content not yet bound to a link.
    pub fn new(data: impl Into<LinkData>, kind: ScLinkContentType) -> Self {
        Self {
            data: data.into(),
            kind,
            addr: None,
        }
    }

    /// Content targeting an existing link.
    pub fn for_link(data: impl Into<LinkData>, kind: ScLinkContentType, addr: ScAddr) -> Self {
        Self {
            data: data.into(),
            kind,
            addr: Some(addr),
        }
    }

    /// String content, the most common case.
    pub fn string(data: impl Into<String>) -> Self {
        Self::new(LinkData::String(data.into()), ScLinkContentType::String)
    }

    /// Wire tag of this content's kind.
    #[must_use]
    pub fn type_to_str(&self) -> &'static str {
        self.kind.as_str()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip_for_all_kinds() {
        for kind in ScLinkContentType::ALL {
            assert_eq!(kind.as_str().parse::<ScLinkContentType>().expect("parse"), kind);
        }
    }

    #[test]
    fn wire_codes_follow_declaration_order() {
        let codes: Vec<u8> = ScLinkContentType::ALL.iter().map(|k| k.wire_code()).collect();
        assert_eq!(codes, vec![0, 1, 2, 3]);
    }

    #[test]
    fn unknown_tag_is_binary_on_read() {
        assert_eq!(ScLinkContentType::from_wire("blob"), ScLinkContentType::Binary);
        assert!("blob".parse::<ScLinkContentType>().is_err());
    }

    #[test]
    fn type_to_str_uses_kind() {
        let c = ScLinkContent::new(42, ScLinkContentType::Int);
        assert_eq!(c.type_to_str(), "int");
        assert!(c.addr.is_none());
    }

    #[test]
    fn link_data_decodes_untagged() {
        let int: LinkData = serde_json::from_str("42").expect("int");
        assert_eq!(int, LinkData::Int(42));

        let float: LinkData = serde_json::from_str("4.5").expect("float");
        assert_eq!(float, LinkData::Float(4.5));

        let s: LinkData = serde_json::from_str("\"hi\"").expect("string");
        assert_eq!(s, LinkData::String("hi".into()));
    }
}
