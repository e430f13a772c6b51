// ── Store state and cache-update rules ──

use backoffice_api::{ListQuery, Page, RecordId, Resource};

/// Everything a UI renders for one resource type.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreState<T> {
    /// Cached records in server order.
    pub records: Vec<T>,
    pub total_count: u64,
    /// At least 1.
    pub total_pages: u32,
    /// True while the most recently issued operation is in flight.
    pub loading: bool,
    /// Message of the most recent failed operation; cleared when the next
    /// operation starts.
    pub error: Option<String>,
    /// Query of the last applied list, reused by `refresh()`.
    pub last_query: Option<ListQuery>,
}

impl<T> Default for StoreState<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            total_count: 0,
            total_pages: 1,
            loading: false,
            error: None,
            last_query: None,
        }
    }
}

impl<T> StoreState<T> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// Cache-update rules. Each is the direct echo of a successful server
// response; nothing here invents, reorders, or expires records.

/// list: replace records and counts wholesale.
pub(crate) fn replace_page<R: Resource>(
    state: &mut StoreState<R::Record>,
    page: &Page<R::Record>,
    query: &ListQuery,
) {
    state.records.clone_from(&page.records);
    state.total_count = page.total_count;
    state.total_pages = page.total_pages.max(1);
    state.last_query = Some(query.clone());
}

/// create: prepend and count. A record already cached under the same id
/// (a list that raced ahead of this create) is replaced instead.
pub(crate) fn prepend<R: Resource>(state: &mut StoreState<R::Record>, record: &R::Record) {
    if replace::<R>(state, record) {
        return;
    }
    state.records.insert(0, record.clone());
    state.total_count += 1;
}

/// update and friends: swap the matching record in place. Returns whether
/// a cached record matched.
pub(crate) fn replace<R: Resource>(state: &mut StoreState<R::Record>, record: &R::Record) -> bool {
    let id = R::id(record);
    match state.records.iter_mut().find(|r| R::id(r) == id) {
        Some(slot) => {
            slot.clone_from(record);
            true
        }
        None => false,
    }
}

/// delete: drop the matching record and count.
pub(crate) fn remove<R: Resource>(state: &mut StoreState<R::Record>, id: &RecordId) {
    state.records.retain(|r| R::id(r) != id);
    state.total_count = state.total_count.saturating_sub(1);
}
