//! Presentation-facing state owner.

use std::{collections::BTreeSet, sync::Arc};

use tracing::{info, warn};

use crate::{
    catalog::{Catalog, CatalogObserver, SubscriptionId},
    error::{CatalogError, CatalogResult},
    filter::FilterCriteria,
    models::GameEntry,
    navigation::{Navigator, PopOutcome, Screen},
    recommend::Recommender,
};

/// Owns navigation state and the catalog on behalf of one frontend.
///
/// Nothing here is global: the frontend creates a controller and routes
/// every user intent through it.
pub struct Controller {
    catalog: Catalog,
    navigator: Navigator,
}

impl Controller {
    /// Start on the game list backed by `catalog`.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            navigator: Navigator::new(),
        }
    }

    /// Underlying catalog handle.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Navigation state, read-only.
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Screen currently showing.
    pub fn screen(&self) -> Option<&Screen> {
        self.navigator.current()
    }

    /// Identifiers selected on the list screen.
    pub fn selected_ids(&self) -> &BTreeSet<String> {
        self.navigator.selected_ids()
    }

    /// See [`Navigator::push_screen`].
    pub fn push_screen(&mut self, screen: Screen) {
        self.navigator.push_screen(screen);
    }

    /// See [`Navigator::pop_screen`].
    pub fn pop_screen(&mut self) -> PopOutcome {
        self.navigator.pop_screen()
    }

    /// See [`Navigator::toggle_selection`].
    pub fn toggle_selection(&mut self, id: &str) -> bool {
        self.navigator.toggle_selection(id)
    }

    /// See [`Navigator::clear_selections`].
    pub fn clear_selections(&mut self) {
        self.navigator.clear_selections();
    }

    /// Follow catalog changes; the observer immediately gets the current list.
    pub async fn subscribe(
        &self,
        observer: Arc<dyn CatalogObserver>,
    ) -> CatalogResult<SubscriptionId> {
        self.catalog.subscribe(observer).await
    }

    /// Stop following catalog changes.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.catalog.unsubscribe(id)
    }

    /// Persist a blank game and return its identifier.
    pub async fn create_entry(&self) -> CatalogResult<String> {
        let id = self.catalog.create_entry().await?;
        info!(game_id = %id, "Created game");
        Ok(id)
    }

    /// Save the edited game. A game deleted in the meantime stays deleted;
    /// the return value says whether anything was saved.
    pub async fn update_entry(&self, entry: GameEntry) -> CatalogResult<bool> {
        let updated = self.catalog.update(std::slice::from_ref(&entry)).await?;
        if updated == 0 {
            warn!(game_id = %entry.id, "Dropped edit for a deleted game");
        }
        Ok(updated > 0)
    }

    /// Delete every selected game and clear the selection.
    pub async fn delete_selected(&mut self) -> CatalogResult<usize> {
        let ids: Vec<String> = self.navigator.selected_ids().iter().cloned().collect();
        let removed = self.catalog.delete_by_ids(ids).await?;
        self.navigator.clear_selections();
        Ok(removed)
    }

    /// Fetch one game; a missing game comes back as `None`.
    pub async fn get_entry(&self, id: &str) -> CatalogResult<Option<GameEntry>> {
        match self.catalog.get(id).await {
            Ok(entry) => Ok(Some(entry)),
            Err(CatalogError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Games eligible under `criteria`.
    pub async fn get_filtered(&self, criteria: &FilterCriteria) -> CatalogResult<Vec<GameEntry>> {
        self.catalog.query(criteria).await
    }

    /// Capture the eligible set for `criteria` so the caller can draw from it.
    pub async fn find_game(&self, criteria: FilterCriteria) -> CatalogResult<Recommender> {
        let eligible = self.catalog.query(&criteria).await?;
        Ok(Recommender::new(criteria, eligible))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{Complexity, Duration},
        recommend::Suggestion,
    };
    use rand::{rngs::StdRng, SeedableRng};

    fn controller() -> Controller {
        Controller::new(Catalog::in_memory().expect("in-memory catalog"))
    }

    #[tokio::test]
    async fn create_edit_and_fetch() -> CatalogResult<()> {
        let mut controller = controller();
        let id = controller.create_entry().await?;
        controller.push_screen(Screen::Edit(id.clone()));

        let mut entry = controller.get_entry(&id).await?.expect("created entry");
        entry.name = "Cascadia".to_string();
        entry.max_players = 4;
        assert!(controller.update_entry(entry.clone()).await?);

        assert_eq!(controller.get_entry(&id).await?, Some(entry));
        assert_eq!(controller.screen(), Some(&Screen::Edit(id)));
        Ok(())
    }

    #[tokio::test]
    async fn saving_a_deleted_game_does_not_bring_it_back() -> CatalogResult<()> {
        let mut controller = controller();
        let id = controller.create_entry().await?;
        let mut stale = controller.get_entry(&id).await?.expect("created entry");

        controller.toggle_selection(&id);
        assert_eq!(controller.delete_selected().await?, 1);

        stale.name = "Late edit".to_string();
        assert!(!controller.update_entry(stale).await?);
        assert_eq!(controller.get_entry(&id).await?, None);
        assert!(controller.catalog().entries().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn dangling_ids_come_back_empty() -> CatalogResult<()> {
        let mut controller = controller();
        controller.push_screen(Screen::Detail("gone".to_string()));
        assert_eq!(controller.get_entry("gone").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn delete_selected_removes_and_clears() -> CatalogResult<()> {
        let mut controller = controller();
        let a = controller.create_entry().await?;
        let b = controller.create_entry().await?;
        let c = controller.create_entry().await?;

        controller.toggle_selection(&a);
        controller.toggle_selection(&c);
        assert_eq!(controller.delete_selected().await?, 2);
        assert!(controller.selected_ids().is_empty());

        let remaining: Vec<_> = controller
            .catalog()
            .entries()
            .await?
            .into_iter()
            .map(|entry| entry.id)
            .collect();
        assert_eq!(remaining, vec![b]);
        Ok(())
    }

    #[tokio::test]
    async fn find_game_draws_from_matching_entries() -> CatalogResult<()> {
        let controller = controller();
        let mut a = GameEntry::with_id("a");
        a.min_players = 2;
        a.max_players = 4;
        a.duration = Some(Duration::Short);
        a.complexity = Some(Complexity::Simple);
        let mut b = GameEntry::with_id("b");
        b.min_players = 1;
        b.max_players = 2;
        b.duration = Some(Duration::Long);
        b.complexity = Some(Complexity::Complex);
        controller.catalog().insert(&[a.clone(), b]).await?;

        let criteria = FilterCriteria::for_players(2).with_durations([Duration::Short]);
        assert_eq!(controller.get_filtered(&criteria).await?, vec![a.clone()]);

        let mut rng = StdRng::seed_from_u64(11);
        let recommender = controller.find_game(criteria).await?;
        assert_eq!(recommender.draw(&mut rng).game(), Some(&a));
        assert_eq!(recommender.draw(&mut rng).game(), Some(&a));

        let recommender = controller
            .find_game(FilterCriteria::for_players(6).with_durations([Duration::Short]))
            .await?;
        assert_eq!(recommender.draw(&mut rng), Suggestion::NoEligibleGame);
        Ok(())
    }

    #[tokio::test]
    async fn recommendations_do_not_follow_later_edits() -> CatalogResult<()> {
        let controller = controller();
        let id = controller.create_entry().await?;
        let recommender = controller.find_game(FilterCriteria::for_players(1)).await?;

        controller.catalog().delete_by_ids([id.as_str()]).await?;
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(
            recommender.draw(&mut rng).game().map(|game| game.id.clone()),
            Some(id)
        );
        Ok(())
    }
}
