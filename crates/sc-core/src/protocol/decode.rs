//! Response decoders.
//!
//! Every decoder builds its result first and checks `errors` afterwards:
//! server errors win over both a decoded result and a malformed payload.

use super::Response;
use super::records::{ConnectionInfo, ContentRecord, GeneratePayload, SearchPayload};
use crate::{
    LinkData, ScAddr, ScError, ScLinkContent, ScLinkContentType, ScTemplateResult, ScType,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Decode the payload, treating `null` as the type's default.
fn payload<T: DeserializeOwned + Default>(response: &Response) -> Result<T, ScError> {
    if response.payload.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(response.payload.clone())
        .map_err(|e| ScError::Protocol(format!("unexpected payload: {e}")))
}

/// Apply the errors policy to an already decoded result.
fn finish<T>(response: &Response, result: Result<T, ScError>) -> Result<T, ScError> {
    response.check_errors()?;
    result
}

pub fn connection_info(response: &Response) -> Result<ConnectionInfo, ScError> {
    let info = serde_json::from_value(response.payload.clone())
        .map_err(|e| ScError::Protocol(format!("unexpected connection info: {e}")));
    finish(response, info)
}

pub fn types(response: &Response) -> Result<Vec<ScType>, ScError> {
    finish(response, payload(response))
}

pub fn addrs(response: &Response) -> Result<Vec<ScAddr>, ScError> {
    finish(response, payload(response))
}

pub fn bools(response: &Response) -> Result<Vec<bool>, ScError> {
    finish(response, payload(response))
}

/// Outcome carried by `status` alone (`delete_elements`).
pub fn status(response: &Response) -> Result<bool, ScError> {
    finish(response, Ok(response.status))
}

/// `content get`: `None` for links without content.
pub fn link_contents(
    response: &Response,
    addrs: &[ScAddr],
) -> Result<Vec<Option<ScLinkContent>>, ScError> {
    let records: Result<Vec<ContentRecord>, ScError> = payload(response);
    let contents = records.map(|records| {
        records
            .into_iter()
            .enumerate()
            .map(|(i, r)| {
                let kind = ScLinkContentType::from_wire(&r.kind);
                r.value.map(|data| ScLinkContent {
                    data,
                    kind,
                    addr: addrs.get(i).copied(),
                })
            })
            .collect()
    });
    finish(response, contents)
}

/// `content find` / `find_links_by_substr`.
pub fn link_searches(response: &Response) -> Result<Vec<Vec<ScAddr>>, ScError> {
    finish(response, payload(response))
}

/// `content find_strings_by_substr`.
pub fn string_searches(response: &Response) -> Result<Vec<Vec<String>>, ScError> {
    let lists: Result<Vec<Vec<LinkData>>, ScError> = payload(response);
    let strings = lists.map(|lists| {
        lists
            .into_iter()
            .map(|list| list.into_iter().map(|d| d.to_string()).collect())
            .collect()
    });
    finish(response, strings)
}

/// `search_template`: one result per match; `status: false` is no match.
pub fn search(response: &Response) -> Result<Vec<ScTemplateResult>, ScError> {
    let results = if response.status {
        payload::<SearchPayload>(response).and_then(|p| {
            let aliases = Arc::new(p.aliases);
            p.addrs
                .into_iter()
                .map(|addrs| ScTemplateResult::from_triples(Arc::clone(&aliases), addrs))
                .collect()
        })
    } else {
        Ok(Vec::new())
    };
    finish(response, results)
}

/// `generate_template`: `None` when nothing was generated.
pub fn generate(response: &Response) -> Result<Option<ScTemplateResult>, ScError> {
    let result = if response.status {
        payload::<GeneratePayload>(response)
            .and_then(|p| ScTemplateResult::new(Arc::new(p.aliases), p.addrs))
            .map(Some)
    } else {
        Ok(None)
    };
    finish(response, result)
}

/// Subscription ids returned by `events create`.
pub fn subscription_ids(response: &Response) -> Result<Vec<u64>, ScError> {
    finish(response, payload(response))
}

/// Raw payload, errors policy applied.
pub fn raw(response: &Response) -> Result<Value, ScError> {
    finish(response, Ok(response.payload.clone()))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{ServerErrorItem, ServerErrors};
    use serde_json::json;

    fn errors(messages: &[&str]) -> ServerErrors {
        ServerErrors::Items(
            messages
                .iter()
                .enumerate()
                .map(|(i, m)| ServerErrorItem {
                    reference: Some(i as i64 + 1),
                    message: (*m).to_string(),
                })
                .collect(),
        )
    }

    #[test]
    fn search_without_match_is_empty() {
        let resp = Response::ok(1, json!({"aliases": {}, "addrs": []})).with_status(false);
        assert!(search(&resp).expect("search").is_empty());
    }

    #[test]
    fn search_builds_results_sharing_aliases() {
        let resp = Response::ok(
            1,
            json!({"aliases": {"_x": 2}, "addrs": [[1, 2, 3], [4, 5, 6]]}),
        );
        let results = search(&resp).expect("search");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].get("_x"), Some(ScAddr::new(3)));
        assert_eq!(results[1].get("_x"), Some(ScAddr::new(6)));
    }

    #[test]
    fn search_errors_win_over_results() {
        let resp = Response::ok(1, json!({"aliases": {}, "addrs": [[1, 2, 3]]}))
            .with_errors(errors(&["bad"]));
        assert!(matches!(search(&resp), Err(ScError::Server(m)) if m == ["bad"]));
    }

    #[test]
    fn search_errors_win_over_malformed_payload() {
        let resp = Response::ok(1, json!("garbage")).with_errors(ServerErrors::Message("bad".into()));
        assert!(matches!(search(&resp), Err(ScError::Server(_))));
    }

    #[test]
    fn search_rejects_partial_triples() {
        let resp = Response::ok(1, json!({"aliases": {}, "addrs": [[1, 2]]}));
        assert!(matches!(search(&resp), Err(ScError::Protocol(_))));
    }

    #[test]
    fn generate_without_status_is_none() {
        let resp = Response::ok(1, Value::Null).with_status(false);
        assert!(generate(&resp).expect("generate").is_none());
    }

    #[test]
    fn generate_with_errors_fails_even_with_status() {
        let resp = Response::ok(1, json!({"aliases": {}, "addrs": [1, 2, 3]}))
            .with_errors(errors(&["x"]));
        assert!(matches!(generate(&resp), Err(ScError::Server(m)) if m == ["x"]));
    }

    #[test]
    fn link_contents_default_unknown_type_to_binary() {
        let resp = Response::ok(
            1,
            json!([{"value": "hello", "type": "string"}, {"value": 3, "type": "weird"}, {"value": null, "type": "string"}]),
        );
        let addrs = [ScAddr::new(10), ScAddr::new(11), ScAddr::new(12)];
        let contents = link_contents(&resp, &addrs).expect("contents");

        let first = contents[0].as_ref().expect("content");
        assert_eq!(first.kind, ScLinkContentType::String);
        assert_eq!(first.addr, Some(ScAddr::new(10)));
        assert_eq!(contents[1].as_ref().expect("content").kind, ScLinkContentType::Binary);
        assert!(contents[2].is_none());
    }

    #[test]
    fn string_searches_stringify_values() {
        let resp = Response::ok(1, json!([["abc", 5]]));
        assert_eq!(
            string_searches(&resp).expect("strings"),
            vec![vec!["abc".to_string(), "5".to_string()]]
        );
    }

    #[test]
    fn null_payload_decodes_to_empty() {
        let resp = Response::ok(1, Value::Null);
        assert!(addrs(&resp).expect("addrs").is_empty());
    }

    #[test]
    fn status_reflects_outcome() {
        assert!(status(&Response::ok(1, Value::Null)).expect("status"));
        assert!(!status(&Response::ok(1, Value::Null).with_status(false)).expect("status"));
    }
}
