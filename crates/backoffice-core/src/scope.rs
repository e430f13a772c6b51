// ── Scoped store lookup ──
//
// A `StoreScope` maps store types to shared store instances and may have a
// parent. Lookups walk outward to the nearest scope that provides the store.
// A scope becomes ambient for a task through `run()`; `use_store` resolves
// against the ambient scope.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use backoffice_api::{CrudApi, Resource, ResourceClient};

use crate::error::CoreError;
use crate::store::ResourceStore;

tokio::task_local! {
    static CURRENT: StoreScope;
}

#[derive(Clone)]
struct Provided {
    store: Arc<dyn Any + Send + Sync>,
    resource: &'static str,
}

#[derive(Clone, Default)]
struct ScopeInner {
    stores: HashMap<TypeId, Provided>,
    parent: Option<StoreScope>,
}

/// Immutable registry of stores, keyed by store type.
///
/// Cheap to clone. `provide()` is builder-style and never affects clones
/// taken earlier.
#[derive(Clone, Default)]
pub struct StoreScope {
    inner: Arc<ScopeInner>,
}

impl StoreScope {
    /// An empty scope with no parent.
    pub fn root() -> Self {
        Self::default()
    }

    /// Register `store`, shadowing any ancestor's store of the same type.
    pub fn provide<R: Resource, C: CrudApi<R>>(mut self, store: Arc<ResourceStore<R, C>>) -> Self {
        Arc::make_mut(&mut self.inner).stores.insert(
            TypeId::of::<ResourceStore<R, C>>(),
            Provided {
                store,
                resource: R::PLURAL,
            },
        );
        self
    }

    /// A new empty scope nested inside this one.
    pub fn child(&self) -> Self {
        Self {
            inner: Arc::new(ScopeInner {
                stores: HashMap::new(),
                parent: Some(self.clone()),
            }),
        }
    }

    /// The nearest provided store of this type.
    pub fn lookup<R: Resource, C: CrudApi<R>>(&self) -> Result<Arc<ResourceStore<R, C>>, CoreError> {
        let key = TypeId::of::<ResourceStore<R, C>>();
        let mut scope = Some(self);
        while let Some(current) = scope {
            if let Some(provided) = current.inner.stores.get(&key) {
                return Arc::clone(&provided.store)
                    .downcast::<ResourceStore<R, C>>()
                    .map_err(|_| misuse::<R>());
            }
            scope = current.inner.parent.as_ref();
        }
        Err(misuse::<R>())
    }

    pub fn provides<R: Resource, C: CrudApi<R>>(&self) -> bool {
        self.lookup::<R, C>().is_ok()
    }

    /// Run `future` with this scope as the task's ambient scope.
    pub fn run<F: Future>(self, future: F) -> impl Future<Output = F::Output> {
        CURRENT.scope(self, future)
    }

    /// Run `f` synchronously with this scope as the ambient scope.
    pub fn sync_run<T>(self, f: impl FnOnce() -> T) -> T {
        CURRENT.sync_scope(self, f)
    }

    /// The ambient scope, if the current task is running inside one.
    pub fn current() -> Option<Self> {
        CURRENT.try_with(Clone::clone).ok()
    }
}

impl fmt::Debug for StoreScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut provided: Vec<_> = self.inner.stores.values().map(|p| p.resource).collect();
        provided.sort_unstable();
        f.debug_struct("StoreScope")
            .field("provides", &provided)
            .field("parent", &self.inner.parent)
            .finish()
    }
}

fn misuse<R: Resource>() -> CoreError {
    CoreError::ScopeMisuse {
        resource: R::PLURAL.to_owned(),
    }
}

// ── Ambient accessors ──────────────────────────────────────────────

/// The HTTP-backed store for `R` from the ambient scope.
///
/// # Panics
///
/// Outside any scope, or when no enclosing scope provides the store.
pub fn use_store<R: Resource>() -> Arc<ResourceStore<R>> {
    use_store_with::<R, ResourceClient<R>>()
}

/// Like [`use_store`] for stores driven by a custom client.
pub fn use_store_with<R: Resource, C: CrudApi<R>>() -> Arc<ResourceStore<R, C>> {
    match try_use_store_with::<R, C>() {
        Ok(store) => store,
        Err(err) => panic!("{err}"),
    }
}

pub fn try_use_store<R: Resource>() -> Result<Arc<ResourceStore<R>>, CoreError> {
    try_use_store_with::<R, ResourceClient<R>>()
}

pub fn try_use_store_with<R: Resource, C: CrudApi<R>>() -> Result<Arc<ResourceStore<R, C>>, CoreError> {
    StoreScope::current()
        .ok_or_else(misuse::<R>)?
        .lookup::<R, C>()
}
