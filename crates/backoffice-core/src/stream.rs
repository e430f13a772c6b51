// ── Store subscriptions ──
//
// A subscription holds the watch receiver for one store. Every state is an
// `Arc` snapshot shared with the store, so reading never copies records.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::store::StoreState;

/// A subscription to one store's state.
///
/// Read the state seen last with [`current()`](Self::current), wait with
/// [`changed()`](Self::changed), or turn it into a `Stream`.
pub struct StoreStream<T: Clone + Send + Sync + 'static> {
    current: Arc<StoreState<T>>,
    receiver: watch::Receiver<Arc<StoreState<T>>>,
}

impl<T: Clone + Send + Sync + 'static> StoreStream<T> {
    pub(crate) fn new(mut receiver: watch::Receiver<Arc<StoreState<T>>>) -> Self {
        let current = Arc::clone(&receiver.borrow_and_update());
        Self { current, receiver }
    }

    /// State as of subscribing, or as of the last `changed()`.
    pub fn current(&self) -> &Arc<StoreState<T>> {
        &self.current
    }

    /// The store's state right now. Does not mark it seen.
    pub fn latest(&self) -> Arc<StoreState<T>> {
        Arc::clone(&self.receiver.borrow())
    }

    /// Wait for the next change. `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<Arc<StoreState<T>>> {
        self.receiver.changed().await.ok()?;
        self.current = Arc::clone(&self.receiver.borrow_and_update());
        Some(Arc::clone(&self.current))
    }

    /// Yields the current state first, then each change.
    pub fn into_stream(self) -> StoreWatchStream<T> {
        StoreWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

pub struct StoreWatchStream<T: Clone + Send + Sync + 'static> {
    inner: WatchStream<Arc<StoreState<T>>>,
}

impl<T: Clone + Send + Sync + 'static> Stream for StoreWatchStream<T> {
    type Item = Arc<StoreState<T>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn channel() -> (
        watch::Sender<Arc<StoreState<u32>>>,
        StoreStream<u32>,
    ) {
        let (tx, rx) = watch::channel(Arc::new(StoreState::default()));
        (tx, StoreStream::new(rx))
    }

    fn push(tx: &watch::Sender<Arc<StoreState<u32>>>, record: u32) {
        tx.send_modify(|state| Arc::make_mut(state).records.push(record));
    }

    #[test]
    fn current_is_fixed_until_changed() {
        let (tx, stream) = channel();
        push(&tx, 7);

        assert!(stream.current().is_empty());
        assert_eq!(stream.latest().records, vec![7]);
    }

    #[test]
    fn latest_shares_the_published_snapshot() {
        let (tx, stream) = channel();
        push(&tx, 1);

        let a = stream.latest();
        let b = stream.latest();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&a, &tx.borrow()));
    }

    #[test]
    fn held_snapshot_survives_later_changes() {
        let (tx, stream) = channel();
        push(&tx, 1);
        let held = stream.latest();
        push(&tx, 2);

        assert_eq!(held.records, vec![1]);
        assert_eq!(stream.latest().records, vec![1, 2]);
    }

    #[tokio::test]
    async fn changed_advances_current() {
        let (tx, mut stream) = channel();
        push(&tx, 3);

        let seen = stream.changed().await.unwrap();
        assert!(Arc::ptr_eq(&seen, stream.current()));
        assert_eq!(stream.current().records, vec![3]);
    }

    #[tokio::test]
    async fn changed_is_none_once_the_store_is_gone() {
        let (tx, mut stream) = channel();
        drop(tx);
        assert!(stream.changed().await.is_none());
    }
}
