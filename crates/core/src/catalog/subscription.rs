//! Publish-on-commit notifications for catalog snapshots.

use std::{
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use parking_lot::RwLock;

use crate::models::GameEntry;

/// Receives a full catalog snapshot after every committed write.
///
/// Observers run on the blocking thread that committed the write while the
/// store is still locked. They must not block or call back into the catalog.
pub trait CatalogObserver: Send + Sync {
    /// Called with the catalog contents as of the latest commit.
    fn catalog_changed(&self, games: &[GameEntry]);
}

impl<F> CatalogObserver for F
where
    F: Fn(&[GameEntry]) + Send + Sync,
{
    fn catalog_changed(&self, games: &[GameEntry]) {
        self(games)
    }
}

/// Handle identifying one registered observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Registry of live observers.
#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: AtomicU64,
    observers: RwLock<Vec<(SubscriptionId, Arc<dyn CatalogObserver>)>>,
}

impl Subscribers {
    pub(crate) fn add(&self, observer: Arc<dyn CatalogObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.observers.write().push((id, observer));
        id
    }

    pub(crate) fn remove(&self, id: SubscriptionId) -> bool {
        let mut observers = self.observers.write();
        let before = observers.len();
        observers.retain(|(existing, _)| *existing != id);
        observers.len() != before
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.observers.read().is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.read().len()
    }

    pub(crate) fn notify(&self, id: SubscriptionId, games: &[GameEntry]) {
        let observer = self
            .observers
            .read()
            .iter()
            .find(|(existing, _)| *existing == id)
            .map(|(_, observer)| Arc::clone(observer));
        if let Some(observer) = observer {
            observer.catalog_changed(games);
        }
    }

    pub(crate) fn publish(&self, games: &[GameEntry]) {
        // Snapshot the list so observers may (un)subscribe from inside the callback.
        let observers: Vec<_> = self
            .observers
            .read()
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();
        for observer in observers {
            observer.catalog_changed(games);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn publish_reaches_every_observer_until_removed() {
        let subscribers = Subscribers::default();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let first_seen = Arc::clone(&seen);
        let first = subscribers.add(Arc::new(move |games: &[GameEntry]| {
            first_seen.lock().push(("first", games.len()));
        }));
        let second_seen = Arc::clone(&seen);
        subscribers.add(Arc::new(move |games: &[GameEntry]| {
            second_seen.lock().push(("second", games.len()));
        }));
        assert_eq!(subscribers.len(), 2);

        subscribers.publish(&[GameEntry::with_id("a")]);
        assert!(subscribers.remove(first));
        assert!(!subscribers.remove(first));
        subscribers.publish(&[]);

        assert_eq!(
            *seen.lock(),
            vec![("first", 1), ("second", 1), ("second", 0)]
        );
    }

    #[test]
    fn notify_targets_a_single_observer() {
        let subscribers = Subscribers::default();
        let hits = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&hits);
        let id = subscribers.add(Arc::new(move |_: &[GameEntry]| *counter.lock() += 1));
        subscribers.add(Arc::new(|_: &[GameEntry]| panic!("should not be notified")));

        subscribers.notify(id, &[]);
        assert_eq!(*hits.lock(), 1);
        assert!(!subscribers.is_empty());
    }
}
