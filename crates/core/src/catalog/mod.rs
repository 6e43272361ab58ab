//! Catalog persistence and the async access layer in front of it.

pub mod row;
pub mod store;
pub mod subscription;

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task;
use tracing::{debug, info};

pub use row::GameRow;
pub use store::{CatalogStore, SqliteCatalogStore, SCHEMA_VERSION};
pub use subscription::{CatalogObserver, SubscriptionId};

use crate::{
    error::CatalogResult,
    filter::FilterCriteria,
    models::GameEntry,
};
use subscription::Subscribers;

/// Async access layer over a [`CatalogStore`].
///
/// Store calls run on the blocking pool so callers never stall the executor.
/// Every committed write publishes a fresh snapshot to all subscribers.
#[derive(Clone)]
pub struct Catalog {
    store: Arc<Mutex<Box<dyn CatalogStore>>>,
    subscribers: Arc<Subscribers>,
}

impl Catalog {
    /// Wrap an opened store.
    pub fn new(store: impl CatalogStore + 'static) -> Self {
        Self {
            store: Arc::new(Mutex::new(Box::new(store))),
            subscribers: Arc::new(Subscribers::default()),
        }
    }

    /// Catalog backed by a throwaway in-memory database.
    pub fn in_memory() -> CatalogResult<Self> {
        Ok(Self::new(SqliteCatalogStore::open_in_memory()?))
    }

    /// Current contents of the catalog.
    pub async fn entries(&self) -> CatalogResult<Vec<GameEntry>> {
        let rows = self.with_store(|store| store.all()).await?;
        Ok(rows.into_iter().map(GameEntry::from).collect())
    }

    /// Register an observer, deliver the current snapshot to it, and keep
    /// it informed of every later commit.
    pub async fn subscribe(
        &self,
        observer: Arc<dyn CatalogObserver>,
    ) -> CatalogResult<SubscriptionId> {
        let subscribers = Arc::clone(&self.subscribers);
        // Registration and the first snapshot happen under the store lock so
        // no commit can slip in between them.
        self.with_store(move |store| {
            let games: Vec<GameEntry> = store.all()?.into_iter().map(GameEntry::from).collect();
            let id = subscribers.add(observer);
            subscribers.notify(id, &games);
            debug!(%id, games = games.len(), "Catalog subscriber registered");
            Ok(id)
        })
        .await
    }

    /// Stop notifying the given observer. Returns whether it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    /// Fetch one entry; fails with `NotFound` when it does not exist.
    pub async fn get(&self, id: &str) -> CatalogResult<GameEntry> {
        let id = id.to_string();
        let row = self.with_store(move |store| store.get(&id)).await?;
        Ok(GameEntry::from(row))
    }

    /// Insert brand new entries.
    pub async fn insert(&self, entries: &[GameEntry]) -> CatalogResult<()> {
        let rows = to_rows(entries);
        let count = rows.len();
        self.write(move |store| store.insert(&rows)).await?;
        info!(count, "Inserted games");
        Ok(())
    }

    /// Insert entries or overwrite the stored versions.
    pub async fn upsert(&self, entries: &[GameEntry]) -> CatalogResult<()> {
        let rows = to_rows(entries);
        let count = rows.len();
        self.write(move |store| store.upsert(&rows)).await?;
        info!(count, "Saved games");
        Ok(())
    }

    /// Overwrite entries that still exist; identifiers that are gone are
    /// skipped. Returns how many rows were updated.
    pub async fn update(&self, entries: &[GameEntry]) -> CatalogResult<usize> {
        let rows = to_rows(entries);
        let updated = self.write(move |store| store.update(&rows)).await?;
        info!(updated, "Updated games");
        Ok(updated)
    }

    /// Delete the given entries.
    pub async fn delete(&self, entries: &[GameEntry]) -> CatalogResult<usize> {
        let rows = to_rows(entries);
        let removed = self.write(move |store| store.delete(&rows)).await?;
        info!(removed, "Deleted games");
        Ok(removed)
    }

    /// Delete every entry whose identifier is listed.
    pub async fn delete_by_ids<I, S>(&self, ids: I) -> CatalogResult<usize>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        if ids.is_empty() {
            return Ok(0);
        }
        let removed = self.write(move |store| store.delete_by_ids(&ids)).await?;
        info!(removed, "Deleted games by id");
        Ok(removed)
    }

    /// Entries eligible under `criteria`, in storage order.
    pub async fn query(&self, criteria: &FilterCriteria) -> CatalogResult<Vec<GameEntry>> {
        let criteria = criteria.clone();
        let rows = self.with_store(move |store| store.query(&criteria)).await?;
        debug!(eligible = rows.len(), "Catalog query finished");
        Ok(rows.into_iter().map(GameEntry::from).collect())
    }

    /// Persist a blank entry and return its identifier.
    pub async fn create_entry(&self) -> CatalogResult<String> {
        let entry = GameEntry::new();
        let id = entry.id.clone();
        self.insert(std::slice::from_ref(&entry)).await?;
        Ok(id)
    }

    /// Number of registered observers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    async fn with_store<T, F>(&self, op: F) -> CatalogResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut dyn CatalogStore) -> CatalogResult<T> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        task::spawn_blocking(move || {
            let mut guard = store.lock();
            op(&mut **guard)
        })
        .await?
    }

    /// Run a write and publish the post-commit snapshot before the store
    /// lock is released, so subscribers see commits in order.
    async fn write<T, F>(&self, op: F) -> CatalogResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut dyn CatalogStore) -> CatalogResult<T> + Send + 'static,
    {
        let subscribers = Arc::clone(&self.subscribers);
        self.with_store(move |store| {
            let result = op(&mut *store)?;
            if !subscribers.is_empty() {
                let games: Vec<GameEntry> =
                    store.all()?.into_iter().map(GameEntry::from).collect();
                subscribers.publish(&games);
            }
            Ok(result)
        })
        .await
    }
}

fn to_rows(entries: &[GameEntry]) -> Vec<GameRow> {
    entries.iter().map(GameRow::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Complexity, Duration};

    fn game(id: &str, min: u8, max: u8) -> GameEntry {
        let mut entry = GameEntry::with_id(id);
        entry.name = id.to_uppercase();
        entry.min_players = min;
        entry.max_players = max;
        entry
    }

    fn recorder() -> (Arc<Mutex<Vec<Vec<String>>>>, Arc<dyn CatalogObserver>) {
        let seen: Arc<Mutex<Vec<Vec<String>>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let observer: Arc<dyn CatalogObserver> = Arc::new(move |games: &[GameEntry]| {
            let ids: Vec<String> = games.iter().map(|game| game.id.clone()).collect();
            sink.lock().push(ids);
        });
        (seen, observer)
    }

    #[tokio::test]
    async fn inserted_entries_round_trip() -> CatalogResult<()> {
        let catalog = Catalog::in_memory()?;
        let mut entry = game("a", 2, 4);
        entry.duration = Some(Duration::Short);
        entry.complexity = Some(Complexity::Simple);
        entry.picture = "content://media/1".to_string();
        catalog.insert(&[entry.clone()]).await?;

        assert_eq!(catalog.get("a").await?, entry);
        Ok(())
    }

    #[tokio::test]
    async fn get_missing_entry_is_not_found() -> CatalogResult<()> {
        let catalog = Catalog::in_memory()?;
        let err = catalog.get("nope").await.unwrap_err();
        assert!(err.is_not_found());
        Ok(())
    }

    #[tokio::test]
    async fn create_entry_persists_defaults() -> CatalogResult<()> {
        let catalog = Catalog::in_memory()?;
        let id = catalog.create_entry().await?;
        let entry = catalog.get(&id).await?;
        assert_eq!(entry, GameEntry::with_id(id));
        Ok(())
    }

    #[tokio::test]
    async fn subscribers_see_every_commit() -> CatalogResult<()> {
        let catalog = Catalog::in_memory()?;
        catalog.insert(&[game("a", 1, 2)]).await?;

        let (seen, observer) = recorder();
        let id = catalog.subscribe(observer).await?;
        assert_eq!(catalog.subscriber_count(), 1);

        catalog.insert(&[game("b", 1, 2)]).await?;
        let mut renamed = game("a", 1, 2);
        renamed.name = "Renamed".to_string();
        catalog.upsert(&[renamed]).await?;
        catalog.delete_by_ids(["a"]).await?;

        assert!(catalog.unsubscribe(id));
        catalog.delete(&[game("b", 1, 2)]).await?;

        let expected: Vec<Vec<String>> = vec![
            vec!["a".into()],
            vec!["a".into(), "b".into()],
            vec!["a".into(), "b".into()],
            vec!["b".into()],
        ];
        assert_eq!(*seen.lock(), expected);
        assert!(catalog.entries().await?.is_empty());
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writers_leave_subscribers_on_the_latest_commit() -> CatalogResult<()> {
        for _ in 0..20 {
            let catalog = Catalog::in_memory()?;
            let (seen, observer) = recorder();
            catalog.subscribe(observer).await?;

            let writers: Vec<_> = (0..40)
                .map(|n| {
                    let catalog = catalog.clone();
                    let entry = game(&format!("g{n}"), 1, 4);
                    tokio::spawn(async move { catalog.insert(&[entry]).await })
                })
                .collect();
            for writer in writers {
                writer.await??;
            }

            let stored: Vec<String> = catalog
                .entries()
                .await?
                .into_iter()
                .map(|entry| entry.id)
                .collect();
            let seen = seen.lock();
            assert_eq!(seen.len(), 41);
            assert_eq!(seen.last(), Some(&stored));
            for (before, after) in seen.iter().zip(seen.iter().skip(1)) {
                assert_eq!(after.len(), before.len() + 1);
            }
        }
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn subscribing_during_writes_never_goes_backwards() -> CatalogResult<()> {
        for _ in 0..20 {
            let catalog = Catalog::in_memory()?;
            let writers: Vec<_> = (0..40)
                .map(|n| {
                    let catalog = catalog.clone();
                    let entry = game(&format!("g{n}"), 1, 4);
                    tokio::spawn(async move { catalog.insert(&[entry]).await })
                })
                .collect();

            let (seen, observer) = recorder();
            catalog.subscribe(observer).await?;
            for writer in writers {
                writer.await??;
            }

            let stored = catalog.entries().await?.len();
            let seen = seen.lock();
            assert_eq!(seen.last().map(Vec::len), Some(stored));
            for (before, after) in seen.iter().zip(seen.iter().skip(1)) {
                assert_eq!(after.len(), before.len() + 1);
            }
        }
        Ok(())
    }

    #[tokio::test]
    async fn update_publishes_and_ignores_missing_entries() -> CatalogResult<()> {
        let catalog = Catalog::in_memory()?;
        catalog.insert(&[game("a", 1, 2)]).await?;
        let (seen, observer) = recorder();
        catalog.subscribe(observer).await?;

        let mut renamed = game("a", 1, 2);
        renamed.name = "Renamed".to_string();
        assert_eq!(catalog.update(&[renamed.clone(), game("ghost", 1, 1)]).await?, 1);
        assert_eq!(catalog.get("a").await?, renamed);
        assert!(catalog.get("ghost").await.unwrap_err().is_not_found());
        assert_eq!(seen.lock().len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn failed_writes_do_not_publish() -> CatalogResult<()> {
        let catalog = Catalog::in_memory()?;
        catalog.insert(&[game("a", 1, 2)]).await?;
        let (seen, observer) = recorder();
        catalog.subscribe(observer).await?;

        assert!(catalog.insert(&[game("a", 3, 4)]).await.is_err());
        assert_eq!(seen.lock().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn query_scenario_from_two_games() -> CatalogResult<()> {
        let catalog = Catalog::in_memory()?;
        let mut a = game("a", 2, 4);
        a.duration = Some(Duration::Short);
        a.complexity = Some(Complexity::Simple);
        let mut b = game("b", 1, 2);
        b.duration = Some(Duration::Long);
        b.complexity = Some(Complexity::Complex);
        catalog.insert(&[a.clone(), b]).await?;

        let criteria = FilterCriteria::for_players(2).with_durations([Duration::Short]);
        assert_eq!(catalog.query(&criteria).await?, vec![a]);

        let criteria = FilterCriteria::for_players(6).with_durations([Duration::Short]);
        assert!(catalog.query(&criteria).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn deleting_nothing_is_a_no_op() -> CatalogResult<()> {
        let catalog = Catalog::in_memory()?;
        let removed = catalog.delete_by_ids(Vec::<String>::new()).await?;
        assert_eq!(removed, 0);
        Ok(())
    }
}
