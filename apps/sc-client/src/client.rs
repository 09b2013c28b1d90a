//! # ScClient
//!
//! One async method per server action. Each call is a single round trip:
//! `sc_core::protocol::encode` builds the payload, the transport carries it,
//! `sc_core::protocol::decode` applies the errors policy to the answer.
//!
//! Per-connection state kept here:
//! - the keynode cache used by `search_keynodes`
//! - the subscription registry shared with the transport

use crate::config::ClientConfig;
use crate::transport::{EventRouter, ResponseHook, Transport, WsTransport};
use sc_core::protocol::{decode, encode, encode::ContentSearch};
use sc_core::{
    Action, ConnectionInfo, EventNotification, KeynodeCache, KeynodeRequest, Keynodes, LinkData,
    Response, ScAddr, ScConstruction, ScError, ScEventSubscriptionParams, ScEventType, ScLinkContent,
    ScTemplateResult, ScTemplateSource, ScType, ScsText, TemplateParams,
};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tracing::debug;

// =============================================================================
// SUBSCRIPTIONS
// =============================================================================

/// A live event subscription and the stream of its notifications.
#[derive(Debug)]
pub struct ScEventSubscription {
    pub id: u64,
    pub params: ScEventSubscriptionParams,
    receiver: mpsc::UnboundedReceiver<EventNotification>,
}

impl ScEventSubscription {
    pub fn event_type(&self) -> ScEventType {
        self.params.event_type
    }

    /// Next notification; `None` once the subscription is destroyed or the
    /// connection is gone.
    pub async fn next(&mut self) -> Option<EventNotification> {
        self.receiver.recv().await
    }

    pub fn try_next(&mut self) -> Option<EventNotification> {
        self.receiver.try_recv().ok()
    }
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct ScClient {
    transport: Arc<dyn Transport>,
    router: Arc<EventRouter>,
    keynodes: Mutex<KeynodeCache>,
}

impl ScClient {
    /// Wrap an existing transport. `router` must be the one the transport
    /// dispatches events to.
    pub fn new(
        transport: Arc<dyn Transport>,
        router: Arc<EventRouter>,
        keynode_cache_size: usize,
    ) -> Self {
        Self {
            transport,
            router,
            keynodes: Mutex::new(KeynodeCache::with_capacity(keynode_cache_size)),
        }
    }

    /// Open a WebSocket connection described by `config`.
    pub async fn connect(config: &ClientConfig) -> Result<Self, ScError> {
        config.validate()?;
        let router = Arc::new(EventRouter::new());
        let transport =
            WsTransport::connect(&config.url, Arc::clone(&router), config.connect_timeout())
                .await?;
        Ok(Self::new(
            Arc::new(transport),
            router,
            config.keynode_cache_size,
        ))
    }

    async fn call(&self, action: Action, payload: Value) -> Result<Response, ScError> {
        let response = self.transport.send_request(action, payload).await?;
        debug!(%action, status = response.status, "call finished");
        Ok(response)
    }

    // -------------------------------------------------------------------------
    // Elements
    // -------------------------------------------------------------------------

    pub async fn connection_info(&self) -> Result<ConnectionInfo, ScError> {
        let response = self.call(Action::ConnectionInfo, Value::Null).await?;
        decode::connection_info(&response)
    }

    /// Types of `addrs`; `ScType::UNKNOWN` for addresses that do not exist.
    pub async fn check_elements(&self, addrs: &[ScAddr]) -> Result<Vec<ScType>, ScError> {
        if addrs.is_empty() {
            return Ok(Vec::new());
        }
        let response = self
            .call(Action::CheckElements, encode::addrs_payload(addrs))
            .await?;
        decode::types(&response)
    }

    /// Addresses of the created elements, in command order.
    pub async fn create_elements(
        &self,
        construction: &ScConstruction,
    ) -> Result<Vec<ScAddr>, ScError> {
        if construction.is_empty() {
            return Ok(Vec::new());
        }
        let payload = encode::create_elements_payload(construction)?;
        let response = self.call(Action::CreateElements, payload).await?;
        decode::addrs(&response)
    }

    /// Per-text success flags. Parse errors reported in `errors` fail the
    /// whole call.
    pub async fn create_elements_by_scs(&self, texts: &[ScsText]) -> Result<Vec<bool>, ScError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let payload = encode::scs_payload(texts)?;
        let response = self.call(Action::CreateElementsByScs, payload).await?;
        decode::bools(&response)
    }

    pub async fn erase_elements(&self, addrs: &[ScAddr]) -> Result<bool, ScError> {
        let response = self
            .call(Action::DeleteElements, encode::addrs_payload(addrs))
            .await?;
        decode::status(&response)
    }

    // -------------------------------------------------------------------------
    // Link contents
    // -------------------------------------------------------------------------

    pub async fn set_link_contents(
        &self,
        contents: &[ScLinkContent],
    ) -> Result<Vec<bool>, ScError> {
        let payload = encode::set_contents_payload(contents)?;
        let response = self.call(Action::Content, payload).await?;
        decode::bools(&response)
    }

    /// `None` for links that have no content.
    pub async fn get_link_contents(
        &self,
        addrs: &[ScAddr],
    ) -> Result<Vec<Option<ScLinkContent>>, ScError> {
        let payload = encode::get_contents_payload(addrs)?;
        let response = self.call(Action::Content, payload).await?;
        decode::link_contents(&response, addrs)
    }

    /// Links whose content equals each value.
    pub async fn search_links_by_contents(
        &self,
        values: &[LinkData],
    ) -> Result<Vec<Vec<ScAddr>>, ScError> {
        let payload = encode::search_contents_payload(ContentSearch::Links, values)?;
        let response = self.call(Action::Content, payload).await?;
        decode::link_searches(&response)
    }

    /// Links whose content contains each value.
    pub async fn search_links_by_content_substrings(
        &self,
        values: &[LinkData],
    ) -> Result<Vec<Vec<ScAddr>>, ScError> {
        let payload = encode::search_contents_payload(ContentSearch::LinksBySubstring, values)?;
        let response = self.call(Action::Content, payload).await?;
        decode::link_searches(&response)
    }

    /// Contents that contain each value.
    pub async fn search_link_contents_by_content_substrings(
        &self,
        values: &[LinkData],
    ) -> Result<Vec<Vec<String>>, ScError> {
        let payload =
            encode::search_contents_payload(ContentSearch::StringsBySubstring, values)?;
        let response = self.call(Action::Content, payload).await?;
        decode::string_searches(&response)
    }

    // -------------------------------------------------------------------------
    // Keynodes
    // -------------------------------------------------------------------------

    /// Look up (or create, for typed requests) each identifier.
    ///
    /// Keyed by the identifier as given. Not cached.
    pub async fn resolve_keynodes(
        &self,
        requests: &[KeynodeRequest],
    ) -> Result<BTreeMap<String, ScAddr>, ScError> {
        if requests.is_empty() {
            return Ok(BTreeMap::new());
        }
        let payload = encode::keynodes_payload(requests)?;
        let response = self.call(Action::Keynodes, payload).await?;
        let addrs = decode::addrs(&response)?;
        if addrs.len() != requests.len() {
            return Err(ScError::Protocol(format!(
                "expected {} keynode addresses, got {}",
                requests.len(),
                addrs.len()
            )));
        }
        Ok(requests
            .iter()
            .zip(addrs)
            .map(|(r, addr)| (r.idtf.clone(), addr))
            .collect())
    }

    /// Cached `find` of each identifier.
    ///
    /// Only identifiers missing from the cache go on the wire. Identifiers
    /// the server does not know come back as `ScAddr::INVALID` and are not
    /// cached.
    pub async fn search_keynodes(&self, idtfs: &[&str]) -> Result<Keynodes, ScError> {
        let mut found = Keynodes::new();
        let mut missing: Vec<&str> = Vec::new();
        {
            let cache = self.keynodes.lock().await;
            for idtf in idtfs {
                match cache.get(idtf) {
                    Some(addr) => found.insert(idtf, addr),
                    None if !missing.contains(idtf) => missing.push(idtf),
                    None => {}
                }
            }
        }
        if missing.is_empty() {
            return Ok(found);
        }

        debug!(count = missing.len(), "keynode cache miss");
        let requests: Vec<KeynodeRequest> =
            missing.iter().map(|idtf| KeynodeRequest::find(*idtf)).collect();
        let resolved = self.resolve_keynodes(&requests).await?;

        let mut cache = self.keynodes.lock().await;
        for idtf in missing {
            let addr = resolved.get(idtf).copied().unwrap_or(ScAddr::INVALID);
            if let Some(evicted) = cache.insert(idtf, addr) {
                debug!(%evicted, "keynode evicted");
            }
            found.insert(idtf, addr);
        }
        Ok(found)
    }

    /// Entries currently held by the keynode cache.
    pub async fn cached_keynodes(&self) -> usize {
        self.keynodes.lock().await.len()
    }

    // -------------------------------------------------------------------------
    // Templates
    // -------------------------------------------------------------------------

    /// Every match of the template. No match is an empty list, not an error.
    pub async fn search_by_template(
        &self,
        template: impl Into<ScTemplateSource>,
        params: &TemplateParams,
    ) -> Result<Vec<ScTemplateResult>, ScError> {
        let payload = encode::template_payload(&template.into(), params)?;
        let response = self.call(Action::SearchTemplate, payload).await?;
        decode::search(&response)
    }

    /// Generate one instance of the template; `None` when the server
    /// generated nothing.
    pub async fn generate_by_template(
        &self,
        template: impl Into<ScTemplateSource>,
        params: &TemplateParams,
    ) -> Result<Option<ScTemplateResult>, ScError> {
        let payload = encode::template_payload(&template.into(), params)?;
        let response = self.call(Action::GenerateTemplate, payload).await?;
        decode::generate(&response)
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    /// Subscribe to each `(addr, event_type)` pair.
    ///
    /// Subscribers are registered before any later message is read, so an
    /// event pushed right after the response is never lost.
    pub async fn create_event_subscriptions(
        &self,
        params: &[ScEventSubscriptionParams],
    ) -> Result<Vec<ScEventSubscription>, ScError> {
        if params.is_empty() {
            return Ok(Vec::new());
        }
        let payload = encode::create_subscriptions_payload(params)?;

        let (tx, mut registered) = mpsc::unbounded_channel();
        let router = Arc::clone(&self.router);
        let hook: ResponseHook = Box::new(move |response: &Response| {
            if let Ok(ids) = decode::subscription_ids(response) {
                for id in ids {
                    let receiver = router.register(id);
                    // Receiving side lives until this call returns.
                    let _ = tx.send((id, receiver));
                }
            }
        });

        let response = self
            .transport
            .send_request_with_hook(Action::Events, payload, Some(hook))
            .await?;

        let mut receivers = BTreeMap::new();
        while let Ok((id, receiver)) = registered.try_recv() {
            receivers.insert(id, receiver);
        }

        let ids = match decode::subscription_ids(&response) {
            Ok(ids) => ids,
            Err(e) => {
                for id in receivers.keys() {
                    self.router.unregister(*id);
                }
                return Err(e);
            }
        };
        if ids.len() != params.len() {
            for id in &ids {
                self.router.unregister(*id);
            }
            return Err(ScError::Protocol(format!(
                "expected {} subscription ids, got {}",
                params.len(),
                ids.len()
            )));
        }

        let mut subscriptions = Vec::with_capacity(ids.len());
        for (id, p) in ids.into_iter().zip(params) {
            let receiver = receivers.remove(&id).ok_or_else(|| {
                ScError::Consistency(format!("subscription {id} was not registered"))
            })?;
            debug!(id, event = %p.event_type, addr = %p.addr, "subscribed");
            subscriptions.push(ScEventSubscription {
                id,
                params: *p,
                receiver,
            });
        }
        Ok(subscriptions)
    }

    /// Destroy subscriptions by id. Their streams end once the server
    /// confirms.
    pub async fn destroy_event_subscriptions(&self, ids: &[u64]) -> Result<(), ScError> {
        if ids.is_empty() {
            return Ok(());
        }
        let payload = encode::destroy_subscriptions_payload(ids)?;
        let response = self.call(Action::Events, payload).await?;
        decode::raw(&response)?;
        for id in ids {
            self.router.unregister(*id);
        }
        Ok(())
    }

    pub fn is_subscribed(&self, id: u64) -> bool {
        self.router.is_registered(id)
    }
}
