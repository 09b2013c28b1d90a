//! Payload encoders.
//!
//! Builder misuse is reported here, before anything goes on the wire.

use super::records::{
    ContentCommand, ElementRecord, EndpointRecord, EventsCommand, KeynodeCommand, ScsText,
    SlotKind, SlotRecord, SubscriptionRecord, TemplateParams,
};
use crate::construction::ScConstructionCommand;
use crate::template::ScTemplateTriple;
use crate::{
    ElementRef, KeynodeRequest, LinkData, ScAddr, ScConstruction, ScError,
    ScEventSubscriptionParams, ScLinkContent, ScTemplateSource, TemplateItem, TemplateValue,
};
use serde_json::{Value, json};

/// Addresses as bare numbers (`check_elements`, `delete_elements`).
pub fn addrs_payload(addrs: &[ScAddr]) -> Value {
    Value::Array(addrs.iter().map(|a| Value::from(a.value())).collect())
}

// =============================================================================
// CREATE ELEMENTS
// =============================================================================

/// Translate a construction to `create_elements` records.
///
/// Alias endpoints resolve to the position of an earlier command; an alias
/// that is unknown or declared at/after the referencing command fails with
/// `InvalidArgument` naming it.
pub fn create_elements_payload(construction: &ScConstruction) -> Result<Value, ScError> {
    let records = create_elements_records(construction)?;
    Ok(serde_json::to_value(records)?)
}

pub fn create_elements_records(
    construction: &ScConstruction,
) -> Result<Vec<ElementRecord>, ScError> {
    construction
        .commands()
        .iter()
        .enumerate()
        .map(|(position, cmd)| element_record(construction, position, cmd))
        .collect()
}

fn element_record(
    construction: &ScConstruction,
    position: usize,
    cmd: &ScConstructionCommand,
) -> Result<ElementRecord, ScError> {
    Ok(match cmd {
        ScConstructionCommand::Node { sc_type } => ElementRecord::Node { kind: *sc_type },
        ScConstructionCommand::Connector {
            sc_type,
            source,
            target,
        } => ElementRecord::Connector {
            kind: *sc_type,
            src: endpoint(construction, position, source)?,
            trg: endpoint(construction, position, target)?,
        },
        ScConstructionCommand::Link { sc_type, content } => ElementRecord::Link {
            kind: *sc_type,
            content: content.data.clone(),
            content_type: content.kind.wire_code(),
        },
    })
}

fn endpoint(
    construction: &ScConstruction,
    position: usize,
    reference: &ElementRef,
) -> Result<EndpointRecord, ScError> {
    match reference {
        ElementRef::Addr(addr) => Ok(EndpointRecord::Addr(*addr)),
        ElementRef::Alias(alias) => match construction.index_of(alias) {
            Some(index) if index < position => Ok(EndpointRecord::Ref(index)),
            Some(_) => Err(ScError::InvalidArgument(format!(
                "alias '{alias}' is referenced before it is declared"
            ))),
            None => Err(ScError::InvalidArgument(format!("unknown alias '{alias}'"))),
        },
    }
}

/// `create_elements_by_scs` items.
pub fn scs_payload(items: &[ScsText]) -> Result<Value, ScError> {
    Ok(serde_json::to_value(items)?)
}

// =============================================================================
// CONTENT
// =============================================================================

/// `content set` commands. Every content must name its link.
pub fn set_contents_payload(contents: &[ScLinkContent]) -> Result<Value, ScError> {
    let commands = contents
        .iter()
        .map(|c| {
            let addr = c.addr.ok_or_else(|| {
                ScError::InvalidArgument("link content to set has no target address".to_string())
            })?;
            Ok(ContentCommand::Set {
                kind: c.type_to_str().to_string(),
                data: c.data.clone(),
                addr,
            })
        })
        .collect::<Result<Vec<_>, ScError>>()?;
    Ok(serde_json::to_value(commands)?)
}

pub fn get_contents_payload(addrs: &[ScAddr]) -> Result<Value, ScError> {
    let commands: Vec<ContentCommand> = addrs
        .iter()
        .map(|addr| ContentCommand::Get { addr: *addr })
        .collect();
    Ok(serde_json::to_value(commands)?)
}

/// Which content search to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSearch {
    /// Links whose content equals the value.
    Links,
    /// Links whose content contains the value.
    LinksBySubstring,
    /// Contents containing the value.
    StringsBySubstring,
}

pub fn search_contents_payload(search: ContentSearch, values: &[LinkData]) -> Result<Value, ScError> {
    let commands: Vec<ContentCommand> = values
        .iter()
        .cloned()
        .map(|data| match search {
            ContentSearch::Links => ContentCommand::Find { data },
            ContentSearch::LinksBySubstring => ContentCommand::FindLinksBySubstr { data },
            ContentSearch::StringsBySubstring => ContentCommand::FindStringsBySubstr { data },
        })
        .collect();
    Ok(serde_json::to_value(commands)?)
}

// =============================================================================
// KEYNODES
// =============================================================================

/// `resolve` for requests with a valid type, `find` otherwise.
pub fn keynodes_payload(requests: &[KeynodeRequest]) -> Result<Value, ScError> {
    let commands: Vec<KeynodeCommand> = requests
        .iter()
        .map(|r| {
            if r.is_resolve() {
                KeynodeCommand::Resolve {
                    idtf: r.idtf.clone(),
                    el_type: r.sc_type,
                }
            } else {
                KeynodeCommand::Find {
                    idtf: r.idtf.clone(),
                }
            }
        })
        .collect();
    Ok(serde_json::to_value(commands)?)
}

// =============================================================================
// TEMPLATES
// =============================================================================

fn slot_record(item: &TemplateItem) -> SlotRecord {
    let (kind, value) = match &item.value {
        TemplateValue::Addr(addr) => (SlotKind::Addr, Value::from(addr.value())),
        TemplateValue::Type(t) => (SlotKind::Type, Value::from(t.value())),
        TemplateValue::Alias(name) => (SlotKind::Alias, Value::from(name.as_str())),
    };
    SlotRecord {
        kind,
        value,
        alias: item.alias.clone(),
    }
}

fn triple_records(triple: &ScTemplateTriple) -> [SlotRecord; 3] {
    [
        slot_record(&triple.source),
        slot_record(&triple.connector),
        slot_record(&triple.target),
    ]
}

/// The `templ` field for each template shape.
pub fn template_value(source: &ScTemplateSource) -> Result<Value, ScError> {
    Ok(match source {
        ScTemplateSource::Triples(template) => {
            let rows: Vec<[SlotRecord; 3]> = template.triples().iter().map(triple_records).collect();
            serde_json::to_value(rows)?
        }
        ScTemplateSource::Scs(text) => Value::from(text.as_str()),
        ScTemplateSource::Addr(addr) => json!({"type": "addr", "value": addr.value()}),
        ScTemplateSource::Idtf(idtf) => json!({"type": "idtf", "value": idtf}),
    })
}

/// `{templ, params}` for `search_template` and `generate_template`.
pub fn template_payload(
    source: &ScTemplateSource,
    params: &TemplateParams,
) -> Result<Value, ScError> {
    Ok(json!({
        "templ": template_value(source)?,
        "params": serde_json::to_value(params)?,
    }))
}

// =============================================================================
// EVENTS
// =============================================================================

pub fn create_subscriptions_payload(params: &[ScEventSubscriptionParams]) -> Result<Value, ScError> {
    let records = params
        .iter()
        .map(|p| SubscriptionRecord {
            event_type: p.event_type,
            addr: p.addr,
        })
        .collect();
    Ok(serde_json::to_value(EventsCommand::Create(records))?)
}

pub fn destroy_subscriptions_payload(ids: &[u64]) -> Result<Value, ScError> {
    Ok(serde_json::to_value(EventsCommand::Delete(ids.to_vec()))?)
}

// =============================================================================
// TESTS
// =============================================================================
