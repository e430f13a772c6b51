// ── Console facade ──
//
// One shared transport, four stores.

use std::sync::Arc;

use backoffice_api::{Coupons, CredentialProvider, Faqs, Messages, Reviews, Transport};
use tracing::info;

use crate::config::ConsoleConfig;
use crate::error::CoreError;
use crate::scope::StoreScope;
use crate::store::ResourceStore;

// ── Console ──────────────────────────────────────────────────────

/// The main entry point for UI code.
///
/// Cheaply cloneable via `Arc<ConsoleInner>`. Owns the message, coupon,
/// FAQ, and review stores, all bound to the same transport and
/// credential provider.
#[derive(Clone)]
pub struct Console {
    inner: Arc<ConsoleInner>,
}

struct ConsoleInner {
    transport: Transport,
    messages: Arc<ResourceStore<Messages>>,
    coupons: Arc<ResourceStore<Coupons>>,
    faqs: Arc<ResourceStore<Faqs>>,
    reviews: Arc<ResourceStore<Reviews>>,
}

impl Console {
    /// Build the transport from `config` and create the stores. Does not
    /// touch the network.
    pub fn new(
        config: &ConsoleConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, CoreError> {
        let transport = Transport::new(config.api_url.clone(), &config.transport, credentials)?;
        info!(api_url = %config.api_url, "console configured");
        Self::with_transport(&transport)
    }

    /// Create the stores over an existing transport.
    pub fn with_transport(transport: &Transport) -> Result<Self, CoreError> {
        Ok(Self {
            inner: Arc::new(ConsoleInner {
                transport: transport.clone(),
                messages: Arc::new(ResourceStore::from_transport(transport)?),
                coupons: Arc::new(ResourceStore::from_transport(transport)?),
                faqs: Arc::new(ResourceStore::from_transport(transport)?),
                reviews: Arc::new(ResourceStore::from_transport(transport)?),
            }),
        })
    }

    pub fn transport(&self) -> &Transport {
        &self.inner.transport
    }

    pub fn messages(&self) -> &Arc<ResourceStore<Messages>> {
        &self.inner.messages
    }

    pub fn coupons(&self) -> &Arc<ResourceStore<Coupons>> {
        &self.inner.coupons
    }

    pub fn faqs(&self) -> &Arc<ResourceStore<Faqs>> {
        &self.inner.faqs
    }

    pub fn reviews(&self) -> &Arc<ResourceStore<Reviews>> {
        &self.inner.reviews
    }

    /// A root scope providing all four stores.
    pub fn scope(&self) -> StoreScope {
        StoreScope::root()
            .provide(Arc::clone(&self.inner.messages))
            .provide(Arc::clone(&self.inner.coupons))
            .provide(Arc::clone(&self.inner.faqs))
            .provide(Arc::clone(&self.inner.reviews))
    }
}
