//! Read access to the state tree.
//!
//! [`StateSnapshots`] is the read handle effects receive: it can peek at the
//! current snapshot or wait for the first snapshot satisfying a
//! precondition. [`Selection`] is a live projection of state which only
//! emits when the projected value changes.

use futures::Stream;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::watch;

/// Read-only handle over the store's published snapshots
pub struct StateSnapshots<S> {
    rx: watch::Receiver<Arc<S>>,
}

impl<S> Clone for StateSnapshots<S> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
        }
    }
}

impl<S> std::fmt::Debug for StateSnapshots<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateSnapshots").finish_non_exhaustive()
    }
}

impl<S: Send + Sync + 'static> StateSnapshots<S> {
    /// Wrap a snapshot receiver
    #[must_use]
    pub const fn new(rx: watch::Receiver<Arc<S>>) -> Self {
        Self { rx }
    }

    /// The latest published snapshot
    #[must_use]
    pub fn current(&self) -> Arc<S> {
        Arc::clone(&*self.rx.borrow())
    }

    /// Wait for the first snapshot satisfying `predicate`.
    ///
    /// Resolves immediately when the current snapshot already qualifies.
    /// Returns `None` if the store is dropped before that happens.
    pub async fn first_where(&self, mut predicate: impl FnMut(&S) -> bool) -> Option<Arc<S>> {
        let mut rx = self.rx.clone();
        let snapshot = rx.wait_for(|state| predicate(state)).await.ok()?;
        Some(Arc::clone(&*snapshot))
    }

    /// Live projection of the state
    pub fn select<T, F>(&self, projector: F) -> Selection<T>
    where
        T: Clone + PartialEq + Send + 'static,
        F: Fn(&S) -> T + Send + Sync + 'static,
    {
        Selection::new(Projected {
            rx: self.rx.clone(),
            projector,
        })
    }
}

trait Source<T>: Send {
    fn peek(&self) -> T;
    fn take(&mut self) -> T;
    fn changed(&mut self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>>;
}

struct Projected<S, F> {
    rx: watch::Receiver<Arc<S>>,
    projector: F,
}

impl<S, T, F> Source<T> for Projected<S, F>
where
    S: Send + Sync + 'static,
    F: Fn(&S) -> T + Send + Sync,
{
    fn peek(&self) -> T {
        (self.projector)(&self.rx.borrow())
    }

    fn take(&mut self) -> T {
        let snapshot = Arc::clone(&*self.rx.borrow_and_update());
        (self.projector)(&snapshot)
    }

    fn changed(&mut self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        Box::pin(async move { self.rx.changed().await.is_ok() })
    }
}

/// A live, lazily recomputed view over state.
///
/// The first call to [`Selection::next`] yields the current value. Later
/// calls wait for a new snapshot and yield only when the projection is
/// structurally different from the last yielded value.
pub struct Selection<T> {
    source: Box<dyn Source<T>>,
    last: Option<T>,
}

impl<T> std::fmt::Debug for Selection<T>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Selection")
            .field("last", &self.last)
            .finish_non_exhaustive()
    }
}

impl<T> Selection<T>
where
    T: Clone + PartialEq + Send + 'static,
{
    fn new(source: impl Source<T> + 'static) -> Self {
        Self {
            source: Box::new(source),
            last: None,
        }
    }

    /// Project the current snapshot without consuming a change
    #[must_use]
    pub fn get(&self) -> T {
        self.source.peek()
    }

    /// Next distinct value; `None` once the store is gone
    pub async fn next(&mut self) -> Option<T> {
        if self.last.is_none() {
            let value = self.source.take();
            self.last = Some(value.clone());
            return Some(value);
        }

        loop {
            if !self.source.changed().await {
                return None;
            }
            let value = self.source.take();
            if self.last.as_ref() != Some(&value) {
                self.last = Some(value.clone());
                return Some(value);
            }
        }
    }

    /// Convert into a stream of distinct values
    pub fn into_stream(self) -> impl Stream<Item = T> + Send {
        futures::stream::unfold(self, |mut selection| async move {
            let value = selection.next().await?;
            Some((value, selection))
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use futures::StreamExt;
    use std::time::Duration;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Root {
        count: u32,
        label: String,
    }

    fn snapshots() -> (watch::Sender<Arc<Root>>, StateSnapshots<Root>) {
        let (tx, rx) = watch::channel(Arc::new(Root::default()));
        (tx, StateSnapshots::new(rx))
    }

    #[tokio::test]
    async fn test_selection_emits_current_first() {
        let (_tx, snapshots) = snapshots();
        let mut counts = snapshots.select(|root| root.count);

        assert_eq!(counts.next().await, Some(0));
    }

    #[tokio::test]
    async fn test_selection_skips_equal_projections() {
        let (tx, snapshots) = snapshots();
        let mut counts = snapshots.select(|root| root.count);
        assert_eq!(counts.next().await, Some(0));

        tx.send_modify(|root| Arc::make_mut(root).label = "unrelated".into());
        tx.send_modify(|root| Arc::make_mut(root).count = 2);

        assert_eq!(counts.next().await, Some(2));
    }

    #[tokio::test]
    async fn test_selection_ends_with_store() {
        let (tx, snapshots) = snapshots();
        let mut counts = snapshots.select(|root| root.count);
        counts.next().await;
        drop(tx);

        assert_eq!(counts.next().await, None);
    }

    #[tokio::test]
    async fn test_first_where_waits_for_precondition() {
        let (tx, snapshots) = snapshots();
        let waiter = tokio::spawn(async move { snapshots.first_where(|root| root.count >= 3).await });

        for _ in 0..3 {
            tokio::time::sleep(Duration::from_millis(5)).await;
            tx.send_modify(|root| Arc::make_mut(root).count += 1);
        }

        let snapshot = waiter.await.unwrap().unwrap();
        assert_eq!(snapshot.count, 3);
    }

    #[tokio::test]
    async fn test_stream_of_distinct_values() {
        let (tx, snapshots) = snapshots();
        let stream = snapshots.select(|root| root.count > 0).into_stream();
        tx.send_modify(|root| Arc::make_mut(root).count = 5);

        let values: Vec<bool> = stream.take(1).collect().await;
        assert_eq!(values, vec![true]);
    }

    #[test]
    fn test_get_reads_latest_snapshot() {
        let (tx, snapshots) = snapshots();
        let counts = snapshots.select(|root| root.count);
        tx.send_modify(|root| Arc::make_mut(root).count = 9);

        assert_eq!(counts.get(), 9);
        assert_eq!(snapshots.current().count, 9);
    }
}
