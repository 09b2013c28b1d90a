//! JSON template files.
//!
//! ```json
//! [
//!   [{"addr": 42}, {"type": "VarPermPosArc"}, [{"type": "VarNode"}, "_x"]],
//!   ["_x", {"type": 552}, {"type": "VarNode"}],
//!   [{"addr": 1}, {"type": "VarCommonArc"}, {"type": "VarNode"}, {"type": "VarPermPosArc"}, {"addr": 2}]
//! ]
//! ```
//!
//! Three slots make a triple, five a quintuple. A slot is `{"addr": n}`,
//! `{"type": n | "Name"}`, an alias reference `"name"`, or a pair
//! `[slot, "alias"]`.

use super::{ScTemplate, TemplateParam, TemplateValue};
use crate::{ScAddr, ScError, ScType};
use serde_json::Value;

impl ScTemplate {
    /// Parse a template from its JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, ScError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json(&value)
    }

    /// Build a template from an already parsed JSON document.
    pub fn from_json(value: &Value) -> Result<Self, ScError> {
        let rows = value
            .as_array()
            .ok_or_else(|| invalid("template must be an array of triples"))?;

        let mut template = ScTemplate::new();
        for (i, row) in rows.iter().enumerate() {
            let slots = row
                .as_array()
                .ok_or_else(|| invalid(format!("row {i}: expected an array of slots")))?;
            let params = slots
                .iter()
                .map(param_from_json)
                .collect::<Result<Vec<_>, _>>()?;

            match <[TemplateParam; 3]>::try_from(params) {
                Ok([a, b, c]) => {
                    template.triple(a, b, c)?;
                }
                Err(params) => match <[TemplateParam; 5]>::try_from(params) {
                    Ok([a, b, c, d, e]) => {
                        template.quintuple(a, b, c, d, e)?;
                    }
                    Err(params) => {
                        return Err(invalid(format!(
                            "row {i}: expected 3 or 5 slots, got {}",
                            params.len()
                        )));
                    }
                },
            }
        }
        Ok(template)
    }
}

fn invalid(msg: impl Into<String>) -> ScError {
    ScError::InvalidArgument(msg.into())
}

fn param_from_json(slot: &Value) -> Result<TemplateParam, ScError> {
    match slot {
        Value::Array(pair) => {
            if pair.len() != 2 {
                return Err(invalid(format!(
                    "aliased slot must have exactly 2 elements, got {}",
                    pair.len()
                )));
            }
            let alias = pair[1]
                .as_str()
                .ok_or_else(|| invalid("second element of an aliased slot must be a string"))?;
            Ok(TemplateParam::Aliased(value_from_json(&pair[0])?, alias.to_string()))
        }
        other => Ok(TemplateParam::Value(value_from_json(other)?)),
    }
}

fn value_from_json(slot: &Value) -> Result<TemplateValue, ScError> {
    match slot {
        Value::String(reference) => Ok(TemplateValue::Alias(reference.clone())),
        Value::Object(map) => {
            if let Some(addr) = map.get("addr") {
                let raw = addr
                    .as_u64()
                    .ok_or_else(|| invalid(format!("addr must be a non-negative integer, got {addr}")))?;
                return Ok(TemplateValue::Addr(ScAddr::new(raw)));
            }
            if let Some(t) = map.get("type") {
                return type_from_json(t).map(TemplateValue::Type);
            }
            Err(invalid(format!("slot object needs an 'addr' or 'type' key: {slot}")))
        }
        other => Err(invalid(format!("unsupported slot: {other}"))),
    }
}

fn type_from_json(value: &Value) -> Result<ScType, ScError> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .and_then(|raw| u32::try_from(raw).ok())
            .map(ScType::new)
            .ok_or_else(|| invalid(format!("type value out of range: {n}"))),
        Value::String(name) => {
            ScType::from_name(name).ok_or_else(|| invalid(format!("unknown type name: {name}")))
        }
        other => Err(invalid(format!("type must be a number or a name, got {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_triples_and_pairs() {
        let t = ScTemplate::from_json_str(
            r#"[
                [{"addr": 42}, {"type": "VarPermPosArc"}, [{"type": "VarNode"}, "_x"]],
                ["_x", {"type": 552}, {"type": "VarNode"}]
            ]"#,
        )
        .expect("parse");

        assert_eq!(t.len(), 2);
        let first = &t.triples()[0];
        assert_eq!(first.source.value, TemplateValue::Addr(ScAddr::new(42)));
        assert_eq!(first.connector.value, TemplateValue::Type(ScType::VAR_PERM_POS_ARC));
        assert_eq!(first.target.alias.as_deref(), Some("_x"));
        assert_eq!(t.triples()[1].source.value, TemplateValue::Alias("_x".into()));
        assert_eq!(t.triples()[1].connector.value, TemplateValue::Type(ScType::new(552)));
    }

    #[test]
    fn five_slots_make_a_quintuple() {
        let t = ScTemplate::from_json_str(
            r#"[[{"addr": 1}, {"type": "VarCommonArc"}, {"type": "VarNode"}, {"type": "VarPermPosArc"}, {"addr": 2}]]"#,
        )
        .expect("parse");
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn pair_with_wrong_arity_is_rejected() {
        let err = ScTemplate::from_json_str(r#"[[[{"addr": 1}, "_a", "_b"], "_c", "_d"]]"#)
            .expect_err("arity");
        assert!(matches!(err, ScError::InvalidArgument(_)));
    }

    #[test]
    fn pair_with_non_string_alias_is_rejected() {
        let err = ScTemplate::from_json_str(r#"[[[{"addr": 1}, 7], "_c", "_d"]]"#)
            .expect_err("alias type");
        assert!(matches!(err, ScError::InvalidArgument(_)));
    }

    #[test]
    fn row_with_four_slots_is_rejected() {
        assert!(ScTemplate::from_json_str(r#"[["_a", "_b", "_c", "_d"]]"#).is_err());
    }

    #[test]
    fn unknown_type_name_is_rejected() {
        assert!(ScTemplate::from_json_str(r#"[["_a", {"type": "Nope"}, "_c"]]"#).is_err());
    }
}
