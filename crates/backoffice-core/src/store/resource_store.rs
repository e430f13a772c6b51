// ── Generic resource store ──
//
// One store per resource type. Every operation runs through `run()`:
// count it in flight, call the client, apply the cache rule, release it.
// Lists also take a sequence number; a page is applied only if no newer
// list was issued in the meantime.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use backoffice_api::{
    CrudApi, Deleted, ListQuery, Operation, Page, RecordId, Resource, ResourceClient, Saved,
    Transport,
};
use tokio::sync::watch;
use tracing::{debug, warn};

use super::state::{StoreState, prepend, remove, replace, replace_page};
use crate::error::CoreError;
use crate::stream::StoreStream;

/// Cached records and bookkeeping for resource `R`, driven by client `C`.
///
/// State is published as `Arc` snapshots; a mutation copies the state only
/// while a subscriber still holds the previous snapshot.
#[derive(Debug)]
pub struct ResourceStore<R: Resource, C = ResourceClient<R>> {
    client: C,
    state: watch::Sender<Arc<StoreState<R::Record>>>,
    /// Sequence number of the most recently issued list.
    list_seq: AtomicU64,
    /// Operations issued and not yet settled or dropped.
    in_flight: AtomicUsize,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> ResourceStore<R> {
    /// Store backed by the HTTP client for `R` under `transport`'s base URL.
    pub fn from_transport(transport: &Transport) -> Result<Self, CoreError> {
        Ok(Self::new(ResourceClient::new(transport)?))
    }
}

impl<R: Resource, C: CrudApi<R>> ResourceStore<R, C> {
    pub fn new(client: C) -> Self {
        let (state, _) = watch::channel(Arc::new(StoreState::default()));
        Self {
            client,
            state,
            list_seq: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
            _resource: PhantomData,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// The current state.
    pub fn snapshot(&self) -> Arc<StoreState<R::Record>> {
        Arc::clone(&self.state.borrow())
    }

    /// Subscribe to state changes. Every bookkeeping or cache change
    /// notifies.
    pub fn subscribe(&self) -> StoreStream<R::Record> {
        StoreStream::new(self.state.subscribe())
    }

    /// Cached record by id. Never touches the network.
    pub fn find(&self, id: &RecordId) -> Option<R::Record> {
        self.state
            .borrow()
            .records
            .iter()
            .find(|r| R::id(r) == id)
            .cloned()
    }

    pub fn clear_error(&self) {
        self.state.send_if_modified(|state| {
            if state.error.is_none() {
                return false;
            }
            Arc::make_mut(state).error = None;
            true
        });
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Fetch a page and replace the cache with it.
    pub async fn list(&self, query: &ListQuery) -> Result<Page<R::Record>, CoreError> {
        self.run(
            Operation::List,
            self.client.list(query),
            |state, page, current| {
                if current {
                    replace_page::<R>(state, page, query);
                } else {
                    debug!(
                        resource = R::PLURAL,
                        "discarding page superseded by a newer list"
                    );
                }
            },
        )
        .await
    }

    /// Re-issue the last applied list query, or the default query.
    pub async fn refresh(&self) -> Result<Page<R::Record>, CoreError> {
        let query = self.state.borrow().last_query.clone().unwrap_or_default();
        self.list(&query).await
    }

    /// Fetch one record. The cache is left alone.
    pub async fn get(&self, id: &RecordId) -> Result<R::Record, CoreError> {
        self.run(Operation::Get, self.client.get(id), |_, _, _| {})
            .await
    }

    /// Create a record and put the server's echo first in the cache.
    ///
    /// If a list that raced ahead already cached a record with the echoed
    /// id, that entry is replaced in place and `total_count` is unchanged.
    pub async fn create(&self, payload: R::Create) -> Result<Saved<R::Record>, CoreError> {
        self.run(
            Operation::Create,
            self.client.create(payload),
            |state, saved: &Saved<R::Record>, _| prepend::<R>(state, &saved.record),
        )
        .await
    }

    pub async fn update(
        &self,
        id: &RecordId,
        patch: &R::Update,
    ) -> Result<Saved<R::Record>, CoreError> {
        self.mutate(Operation::Update, self.client.update(id, patch))
            .await
    }

    /// Permanently delete a record on the server and drop it from the cache.
    pub async fn delete(&self, id: &RecordId) -> Result<Deleted, CoreError> {
        self.run(Operation::Delete, self.client.delete(id), |state, _, _| {
            remove::<R>(state, id);
        })
        .await
    }

    // ── Plumbing ─────────────────────────────────────────────────────

    /// Run an operation whose echo replaces one cached record in place.
    pub(crate) async fn mutate<F>(
        &self,
        op: Operation,
        call: F,
    ) -> Result<Saved<R::Record>, CoreError>
    where
        F: Future<Output = Result<Saved<R::Record>, backoffice_api::Error>> + Send,
    {
        self.run(op, call, |state, saved: &Saved<R::Record>, _| {
            if !replace::<R>(state, &saved.record) {
                debug!(
                    resource = R::PLURAL,
                    id = %R::id(&saved.record),
                    "updated record not cached"
                );
            }
        })
        .await
    }

    /// Shared operation lifecycle.
    ///
    /// `apply` runs on success and receives `false` only for a list that a
    /// newer list has superseded. Such a list's failure is not recorded in
    /// `error`; every other failure is. The result is returned either way.
    pub(crate) async fn run<T, F, A>(
        &self,
        op: Operation,
        call: F,
        apply: A,
    ) -> Result<T, CoreError>
    where
        F: Future<Output = Result<T, backoffice_api::Error>> + Send,
        A: FnOnce(&mut StoreState<R::Record>, &T, bool) + Send,
    {
        let ticket = self.begin(op);
        let guard = InFlight {
            store: self,
            settled: false,
        };

        let result = call.await;
        if let Err(err) = &result {
            warn!(resource = R::PLURAL, op = %op, error = %err, "store operation failed");
        }

        guard.settle(|state| {
            let current = ticket.is_none_or(|t| self.list_seq.load(Ordering::SeqCst) == t);
            match &result {
                Ok(value) => apply(state, value, current),
                Err(err) if current => state.error = Some(err.message()),
                Err(_) => {}
            }
        });

        result.map_err(CoreError::from)
    }

    /// Count the operation in flight, flag loading, clear the last error.
    /// Lists get a sequence number back.
    fn begin(&self, op: Operation) -> Option<u64> {
        let mut ticket = None;
        self.state.send_modify(|state| {
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            if op == Operation::List {
                ticket = Some(self.list_seq.fetch_add(1, Ordering::SeqCst) + 1);
            }
            let state = Arc::make_mut(state);
            state.loading = true;
            state.error = None;
        });
        debug!(resource = R::PLURAL, op = %op, seq = ?ticket, "store operation started");
        ticket
    }

    /// Take the operation out of flight after `update` runs. Loading stays
    /// set while any other operation is still pending.
    fn finish(&self, update: impl FnOnce(&mut StoreState<R::Record>)) {
        self.state.send_modify(|state| {
            let state = Arc::make_mut(state);
            update(state);
            let pending = self.in_flight.fetch_sub(1, Ordering::SeqCst) - 1;
            state.loading = pending > 0;
        });
    }
}

/// One in-flight operation. Settling applies its outcome; dropping it
/// unsettled (the caller abandoned the future) only releases it.
struct InFlight<'a, R: Resource, C: CrudApi<R>> {
    store: &'a ResourceStore<R, C>,
    settled: bool,
}

impl<R: Resource, C: CrudApi<R>> InFlight<'_, R, C> {
    fn settle(mut self, update: impl FnOnce(&mut StoreState<R::Record>)) {
        self.settled = true;
        self.store.finish(update);
    }
}

impl<R: Resource, C: CrudApi<R>> Drop for InFlight<'_, R, C> {
    fn drop(&mut self) {
        if !self.settled {
            self.store.finish(|_| {});
        }
    }
}
