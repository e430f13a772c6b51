// Generic resource client
//
// One `ResourceClient<R>` per resource type, bound to `{base}/{R::PATH}`.
// CRUD lives here; resource-specific verbs are inherent to the concrete
// resource modules via extension traits (`MessageApi`, `CouponApi`).

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;

use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::envelope::{DataEnvelope, Deleted, ListEnvelope, MessageEnvelope, Page, Saved};
use crate::error::Error;
use crate::query::ListQuery;
use crate::resource::{Operation, RecordId, Resource};
use crate::transport::{RawResult, Request, RequestBody, Transport};

/// The fixed CRUD capability every resource exposes.
///
/// `ResourceClient<R>` is the HTTP implementation; stores are generic over
/// this trait so they can be driven by any implementation.
pub trait CrudApi<R: Resource>: Send + Sync + 'static {
    /// `GET /` with filter, sort, and pagination params passed through.
    fn list(
        &self,
        query: &ListQuery,
    ) -> impl Future<Output = Result<Page<R::Record>, Error>> + Send;

    /// `GET /{id}`
    fn get(&self, id: &RecordId) -> impl Future<Output = Result<R::Record, Error>> + Send;

    /// `POST /`
    fn create(
        &self,
        payload: R::Create,
    ) -> impl Future<Output = Result<Saved<R::Record>, Error>> + Send;

    /// `PUT /{id}`
    fn update(
        &self,
        id: &RecordId,
        patch: &R::Update,
    ) -> impl Future<Output = Result<Saved<R::Record>, Error>> + Send;

    /// `DELETE /{id}` (irreversible)
    fn delete(&self, id: &RecordId) -> impl Future<Output = Result<Deleted, Error>> + Send;
}

/// HTTP client for a single resource type.
pub struct ResourceClient<R: Resource> {
    transport: Transport,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> ResourceClient<R> {
    /// Bind a client to `R::PATH` under the transport's base URL.
    pub fn new(transport: &Transport) -> Result<Self, Error> {
        Ok(Self {
            transport: transport.scoped(R::PATH)?,
            _resource: PhantomData,
        })
    }

    /// The resource-scoped transport.
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Start a request for `op`, with its fallback message attached.
    pub(crate) fn request(&self, method: Method, path: &str, op: Operation) -> Request {
        Request::new(method, path).fallback(op.fallback_message::<R>())
    }

    /// Start a request against `/{id}`.
    pub(crate) fn record(&self, method: Method, id: &RecordId, op: Operation) -> Request {
        self.request(method, "", op).segment(id.as_str())
    }

    pub(crate) async fn send<T: DeserializeOwned>(&self, request: Request) -> Result<T, Error> {
        self.transport.fetch(request).await
    }

    pub(crate) async fn send_raw(&self, request: Request) -> Result<RawResult, Error> {
        self.transport.request(request).await
    }

    /// Send a request whose response is a `{ data, message }` envelope.
    pub(crate) async fn send_saved<T: DeserializeOwned>(
        &self,
        request: Request,
    ) -> Result<Saved<T>, Error> {
        let env: DataEnvelope<T> = self.send(request).await?;
        Ok(env.into())
    }
}

impl<R: Resource> Clone for ResourceClient<R> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> fmt::Debug for ResourceClient<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceClient")
            .field("resource", &R::PLURAL)
            .field("base_url", &self.transport.base_url().as_str())
            .finish()
    }
}

impl<R: Resource> CrudApi<R> for ResourceClient<R> {
    async fn list(&self, query: &ListQuery) -> Result<Page<R::Record>, Error> {
        debug!(resource = R::PLURAL, "listing");
        let request = self
            .request(Method::GET, "", Operation::List)
            .query(query.params());
        let env: ListEnvelope<R::Record> = self.send(request).await?;
        Ok(env.into_page(query.limit_value()))
    }

    async fn get(&self, id: &RecordId) -> Result<R::Record, Error> {
        debug!(resource = R::PLURAL, %id, "fetching");
        let request = self.record(Method::GET, id, Operation::Get);
        let env: DataEnvelope<R::Record> = self.send(request).await?;
        Ok(env.data)
    }

    async fn create(&self, payload: R::Create) -> Result<Saved<R::Record>, Error> {
        debug!(resource = R::PLURAL, "creating");
        let body: RequestBody = R::create_body(payload)?;
        let request = self
            .request(Method::POST, "", Operation::Create)
            .body(body);
        self.send_saved(request).await
    }

    async fn update(&self, id: &RecordId, patch: &R::Update) -> Result<Saved<R::Record>, Error> {
        debug!(resource = R::PLURAL, %id, "updating");
        let request = self
            .record(Method::PUT, id, Operation::Update)
            .body(RequestBody::json(patch)?);
        self.send_saved(request).await
    }

    async fn delete(&self, id: &RecordId) -> Result<Deleted, Error> {
        debug!(resource = R::PLURAL, %id, "deleting");
        let request = self.record(Method::DELETE, id, Operation::Delete);
        let env: Option<MessageEnvelope> = self.send(request).await?;
        Ok(env.unwrap_or_default().into())
    }
}
