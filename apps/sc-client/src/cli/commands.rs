//! # CLI Command Implementations
//!
//! Each command makes the facade calls it needs and prints either a short
//! human-readable report or, with `--json-mode`, one JSON document.

use super::TemplateArgs;
use sc_client::ScClient;
use sc_core::{
    KeynodeRequest, LinkData, ScAddr, ScError, ScEventSubscriptionParams, ScEventType,
    ScLinkContent, ScLinkContentType, ScTemplate, ScTemplateResult, ScTemplateSource, ScType,
    ScsText, TemplateParamValue, TemplateParams,
};
use serde_json::{Value, json};
use std::path::Path;

// =============================================================================
// HELPERS
// =============================================================================

fn print_json(output: &Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(output).unwrap_or_default()
    );
}

fn to_addrs(values: &[u64]) -> Vec<ScAddr> {
    values.iter().copied().map(ScAddr::new).collect()
}

fn read_text(path: &Path) -> Result<String, ScError> {
    std::fs::read_to_string(path)
        .map_err(|e| ScError::Io(format!("cannot read '{}': {}", path.display(), e)))
}

/// `alias=value` pairs; values that parse as numbers are addresses.
pub fn parse_params(pairs: &[String]) -> Result<TemplateParams, ScError> {
    let mut params = TemplateParams::new();
    for pair in pairs {
        let (alias, value) = pair.split_once('=').ok_or_else(|| {
            ScError::InvalidArgument(format!("parameter '{pair}' is not alias=value"))
        })?;
        let value = match value.parse::<u64>() {
            Ok(addr) => TemplateParamValue::Addr(ScAddr::new(addr)),
            Err(_) => TemplateParamValue::from(value),
        };
        params.insert(alias.to_string(), value);
    }
    Ok(params)
}

/// The single template source named by `args`.
pub fn template_source(args: &TemplateArgs) -> Result<ScTemplateSource, ScError> {
    match (&args.file, &args.text, args.addr) {
        (Some(path), None, None) => {
            let template = ScTemplate::from_json_str(&read_text(path)?)?;
            Ok(ScTemplateSource::from(template))
        }
        (None, Some(text), None) => Ok(ScTemplateSource::from_text(text.as_str())),
        (None, None, Some(addr)) => Ok(ScTemplateSource::from(ScAddr::new(addr))),
        _ => Err(ScError::InvalidArgument(
            "give exactly one of --file, --text or --addr".to_string(),
        )),
    }
}

/// Content typed as requested on the command line.
pub fn parse_content(value: &str, kind: ScLinkContentType) -> Result<LinkData, ScError> {
    let invalid = || ScError::InvalidArgument(format!("'{value}' is not a valid {kind}"));
    match kind {
        ScLinkContentType::Int => value.parse::<i64>().map(LinkData::Int).map_err(|_| invalid()),
        ScLinkContentType::Float => value
            .parse::<f64>()
            .map(LinkData::Float)
            .map_err(|_| invalid()),
        ScLinkContentType::String | ScLinkContentType::Binary => Ok(LinkData::from(value)),
    }
}

/// Integers search as integers, anything else as a string.
fn guess_content(value: &str) -> LinkData {
    value
        .parse::<i64>()
        .map(LinkData::Int)
        .unwrap_or_else(|_| LinkData::from(value))
}

fn result_json(result: &ScTemplateResult) -> Value {
    let aliases: serde_json::Map<String, Value> = result
        .aliases()
        .keys()
        .filter_map(|alias| {
            result
                .get(alias.as_str())
                .map(|addr| (alias.clone(), json!(addr.value())))
        })
        .collect();
    let triples: Vec<[u64; 3]> = result
        .triples()
        .map(|(s, c, t)| [s.value(), c.value(), t.value()])
        .collect();
    json!({ "aliases": aliases, "triples": triples })
}

fn print_result(index: usize, result: &ScTemplateResult) {
    println!("Result {}:", index + 1);
    for alias in result.aliases().keys() {
        if let Some(addr) = result.get(alias.as_str()) {
            println!("  {:<20} {}", alias, addr);
        }
    }
    for (s, c, t) in result.triples() {
        println!("  ({} {} {})", s, c, t);
    }
}

// =============================================================================
// ELEMENT COMMANDS
// =============================================================================

/// Show connection info.
pub async fn cmd_info(client: &ScClient, json_mode: bool) -> Result<(), ScError> {
    let info = client.connection_info().await?;

    if json_mode {
        print_json(&json!({
            "connection_id": info.connection_id,
            "user_addr": info.user_addr.value(),
        }));
        return Ok(());
    }

    println!("Connection");
    println!("==========");
    println!("Connection ID: {}", info.connection_id);
    println!("User:          {}", info.user_addr);
    Ok(())
}

/// Show element types.
pub async fn cmd_check(client: &ScClient, json_mode: bool, addrs: &[u64]) -> Result<(), ScError> {
    let addrs = to_addrs(addrs);
    let types = client.check_elements(&addrs).await?;

    if json_mode {
        let output: Vec<Value> = addrs
            .iter()
            .zip(&types)
            .map(|(addr, t)| json!({"addr": addr.value(), "type": t.value(), "name": t.name()}))
            .collect();
        print_json(&Value::from(output));
        return Ok(());
    }

    for (addr, t) in addrs.iter().zip(&types) {
        if t.is_valid() {
            println!("{:>10}  {}", addr, t);
        } else {
            println!("{:>10}  (not found)", addr);
        }
    }
    Ok(())
}

/// Erase elements.
pub async fn cmd_erase(client: &ScClient, json_mode: bool, addrs: &[u64]) -> Result<(), ScError> {
    let erased = client.erase_elements(&to_addrs(addrs)).await?;

    if json_mode {
        print_json(&json!({ "erased": erased }));
        return Ok(());
    }

    if erased {
        println!("Erased {} elements", addrs.len());
    } else {
        println!("Nothing erased");
    }
    Ok(())
}

/// Find keynodes, or resolve them when a type is given.
pub async fn cmd_resolve(
    client: &ScClient,
    json_mode: bool,
    idtfs: &[String],
    sc_type: Option<&str>,
) -> Result<(), ScError> {
    let found: Vec<(String, ScAddr)> = match sc_type {
        Some(name) => {
            let sc_type = ScType::from_name(name)
                .ok_or_else(|| ScError::InvalidArgument(format!("unknown type '{name}'")))?;
            let requests: Vec<KeynodeRequest> = idtfs
                .iter()
                .map(|idtf| KeynodeRequest::resolve(idtf.as_str(), sc_type))
                .collect();
            client.resolve_keynodes(&requests).await?.into_iter().collect()
        }
        None => {
            let names: Vec<&str> = idtfs.iter().map(String::as_str).collect();
            let keynodes = client.search_keynodes(&names).await?;
            idtfs
                .iter()
                .map(|idtf| (idtf.clone(), keynodes.get(idtf).unwrap_or(ScAddr::INVALID)))
                .collect()
        }
    };

    if json_mode {
        let output: serde_json::Map<String, Value> = found
            .iter()
            .map(|(idtf, addr)| (idtf.clone(), json!(addr.value())))
            .collect();
        print_json(&Value::from(output));
        return Ok(());
    }

    for (idtf, addr) in &found {
        if addr.is_valid() {
            println!("{:<30} {}", idtf, addr);
        } else {
            println!("{:<30} (not found)", idtf);
        }
    }
    Ok(())
}

// =============================================================================
// TEMPLATE COMMANDS
// =============================================================================

/// Search by template.
pub async fn cmd_search(
    client: &ScClient,
    json_mode: bool,
    args: &TemplateArgs,
) -> Result<(), ScError> {
    let source = template_source(args)?;
    let params = parse_params(&args.params)?;
    let results = client.search_by_template(source, &params).await?;

    if json_mode {
        let output: Vec<Value> = results.iter().map(result_json).collect();
        print_json(&Value::from(output));
        return Ok(());
    }

    if results.is_empty() {
        println!("No matches");
        return Ok(());
    }
    for (i, result) in results.iter().enumerate() {
        print_result(i, result);
    }
    Ok(())
}

/// Generate by template.
pub async fn cmd_generate(
    client: &ScClient,
    json_mode: bool,
    args: &TemplateArgs,
) -> Result<(), ScError> {
    let source = template_source(args)?;
    let params = parse_params(&args.params)?;
    let result = client.generate_by_template(source, &params).await?;

    if json_mode {
        print_json(&result.as_ref().map(result_json).unwrap_or(Value::Null));
        return Ok(());
    }

    match result {
        Some(result) => print_result(0, &result),
        None => println!("Nothing generated"),
    }
    Ok(())
}

/// Load SCs texts.
pub async fn cmd_scs(
    client: &ScClient,
    json_mode: bool,
    mut texts: Vec<String>,
    file: Option<&Path>,
    output_structure: Option<u64>,
) -> Result<(), ScError> {
    if let Some(path) = file {
        texts.push(read_text(path)?);
    }
    if texts.is_empty() {
        return Err(ScError::InvalidArgument(
            "no SCs text given".to_string(),
        ));
    }

    let items: Vec<ScsText> = texts
        .into_iter()
        .map(|scs| match output_structure {
            Some(addr) => ScsText::WithOutput {
                scs,
                output_structure: ScAddr::new(addr),
            },
            None => ScsText::Plain(scs),
        })
        .collect();
    let loaded = client.create_elements_by_scs(&items).await?;

    if json_mode {
        print_json(&json!(loaded));
        return Ok(());
    }

    let ok = loaded.iter().filter(|l| **l).count();
    println!("Loaded {}/{} texts", ok, loaded.len());
    Ok(())
}

// =============================================================================
// CONTENT COMMANDS
// =============================================================================

/// Print link contents.
pub async fn cmd_content_get(
    client: &ScClient,
    json_mode: bool,
    addrs: &[u64],
) -> Result<(), ScError> {
    let addrs = to_addrs(addrs);
    let contents = client.get_link_contents(&addrs).await?;

    if json_mode {
        let output: Vec<Value> = addrs
            .iter()
            .zip(&contents)
            .map(|(addr, content)| match content {
                Some(c) => json!({"addr": addr.value(), "type": c.type_to_str(), "value": c.data}),
                None => json!({"addr": addr.value(), "type": Value::Null, "value": Value::Null}),
            })
            .collect();
        print_json(&Value::from(output));
        return Ok(());
    }

    for (addr, content) in addrs.iter().zip(&contents) {
        match content {
            Some(c) => println!("{:>10}  [{}] {}", addr, c.type_to_str(), c.data),
            None => println!("{:>10}  (no content)", addr),
        }
    }
    Ok(())
}

/// Set the content of one link.
pub async fn cmd_content_set(
    client: &ScClient,
    json_mode: bool,
    addr: u64,
    value: &str,
    kind: &str,
) -> Result<(), ScError> {
    let kind: ScLinkContentType = kind.parse()?;
    let content = ScLinkContent::for_link(parse_content(value, kind)?, kind, ScAddr::new(addr));
    let updated = client.set_link_contents(&[content]).await?;
    let ok = updated.first().copied().unwrap_or(false);

    if json_mode {
        print_json(&json!({ "addr": addr, "updated": ok }));
        return Ok(());
    }

    if ok {
        println!("Updated link {}", addr);
    } else {
        println!("Link {} was not updated", addr);
    }
    Ok(())
}

/// Find links (or contents) matching a value.
pub async fn cmd_content_find(
    client: &ScClient,
    json_mode: bool,
    value: &str,
    substring: bool,
    strings: bool,
) -> Result<(), ScError> {
    let data = [guess_content(value)];

    if strings {
        let found = client
            .search_link_contents_by_content_substrings(&data)
            .await?;
        let found = found.into_iter().next().unwrap_or_default();
        if json_mode {
            print_json(&json!(found));
        } else {
            found.iter().for_each(|s| println!("{s}"));
        }
        return Ok(());
    }

    let found = if substring {
        client.search_links_by_content_substrings(&data).await?
    } else {
        client.search_links_by_contents(&data).await?
    };
    let links: Vec<u64> = found
        .into_iter()
        .next()
        .unwrap_or_default()
        .into_iter()
        .map(ScAddr::value)
        .collect();

    if json_mode {
        print_json(&json!(links));
        return Ok(());
    }

    if links.is_empty() {
        println!("No links found");
    }
    links.iter().for_each(|l| println!("{l}"));
    Ok(())
}

// =============================================================================
// EVENTS
// =============================================================================

/// Print events until interrupted or `count` events were seen.
pub async fn cmd_watch(
    client: &ScClient,
    json_mode: bool,
    addr: u64,
    event: &str,
    count: Option<usize>,
) -> Result<(), ScError> {
    let event_type = ScEventType::from_wire(event);
    if event_type == ScEventType::Unknown {
        return Err(ScError::InvalidArgument(format!(
            "unknown event type '{event}'"
        )));
    }

    let params = ScEventSubscriptionParams::new(ScAddr::new(addr), event_type);
    let mut subscriptions = client.create_event_subscriptions(&[params]).await?;
    let Some(mut subscription) = subscriptions.pop() else {
        return Err(ScError::Protocol("no subscription created".to_string()));
    };

    if !json_mode {
        println!("Watching {} for {} (Ctrl+C to stop)", addr, event_type);
    }

    let mut seen = 0usize;
    while count.is_none_or(|limit| seen < limit) {
        tokio::select! {
            notification = subscription.next() => {
                let Some(n) = notification else { break };
                seen += 1;
                if json_mode {
                    println!("{}", json!({
                        "subscription": n.subscription_id,
                        "addr": n.addr.value(),
                        "connector": n.connector.value(),
                        "other": n.other.value(),
                    }));
                } else {
                    println!("{} -[{}]- {}", n.addr, n.connector, n.other);
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    client.destroy_event_subscriptions(&[subscription.id]).await
}

// =============================================================================
// TYPES (offline)
// =============================================================================

/// List named element types.
pub fn cmd_types(json_mode: bool, filter: Option<&str>) -> Result<(), ScError> {
    let filter = filter.map(str::to_lowercase);
    let types: Vec<(&str, ScType)> = ScType::named_types()
        .filter(|(name, _)| {
            filter
                .as_deref()
                .is_none_or(|f| name.to_lowercase().contains(f))
        })
        .collect();

    if json_mode {
        let output: serde_json::Map<String, Value> = types
            .iter()
            .map(|(name, t)| ((*name).to_string(), json!(t.value())))
            .collect();
        print_json(&Value::from(output));
        return Ok(());
    }

    for (name, t) in &types {
        println!("{:<40} {:#07x}", name, t.value());
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
