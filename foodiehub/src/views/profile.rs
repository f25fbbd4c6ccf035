//! Profile
//!
//! Loads and saves the signed-in user's profile row. The row shares its
//! id with the auth user.

use std::sync::Arc;

use hub_client::{ClientResult, DataStore, DataStoreExt};
use shared::models::{Profile, ProfileUpdate};

/// Profile view model
#[derive(Debug)]
pub struct ProfileView {
    store: Arc<dyn DataStore>,
    profile: Option<Profile>,
    loading: bool,
}

impl ProfileView {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self {
            store,
            profile: None,
            loading: false,
        }
    }

    pub async fn load(store: &Arc<dyn DataStore>, user_id: &str) -> ClientResult<Option<Profile>> {
        store.get_row("profiles", user_id).await
    }

    /// Write the edited fields, returning the stored row.
    ///
    /// The patch always carries all editable fields; a `None` clears
    /// the column.
    pub async fn save(
        store: &Arc<dyn DataStore>,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> ClientResult<Profile> {
        let profile = store.update_row("profiles", user_id, update).await?;
        tracing::info!("Profile saved");
        Ok(profile)
    }

    pub fn set_loading(&mut self) {
        self.loading = true;
    }

    pub fn apply(&mut self, profile: Option<Profile>) {
        self.loading = false;
        self.profile = profile;
    }

    /// Load and apply in one await
    pub async fn fetch(&mut self, user_id: &str) -> ClientResult<()> {
        self.set_loading();
        let profile = Self::load(&self.store, user_id).await?;
        self.apply(profile);
        Ok(())
    }

    /// Forget the loaded profile, for sign-out
    pub fn clear(&mut self) {
        self.profile = None;
        self.loading = false;
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hub_client::MemoryStore;
    use hub_client::store::fixtures::DEMO_USER_ID;

    #[tokio::test]
    async fn demo_profile_loads() {
        let store: Arc<dyn DataStore> = Arc::new(MemoryStore::with_sample_data());
        let mut view = ProfileView::new(store);
        view.fetch(DEMO_USER_ID).await.unwrap();

        let profile = view.profile().unwrap();
        assert_eq!(profile.email, "demo@foodiehub.app");
        assert_eq!(profile.phone.as_deref(), Some("9876543210"));
    }

    #[tokio::test]
    async fn save_patches_the_editable_fields() {
        let store: Arc<dyn DataStore> = Arc::new(MemoryStore::with_sample_data());

        let saved = ProfileView::save(
            &store,
            DEMO_USER_ID,
            &ProfileUpdate {
                full_name: Some("New Name".into()),
                phone: Some("5550100".into()),
                address: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(saved.full_name.as_deref(), Some("New Name"));
        assert_eq!(saved.address, None);
        // The stored row reflects the patch
        let mut view = ProfileView::new(store);
        view.fetch(DEMO_USER_ID).await.unwrap();
        assert_eq!(view.profile().unwrap().phone.as_deref(), Some("5550100"));
    }

    #[tokio::test]
    async fn missing_profile_is_none() {
        let store: Arc<dyn DataStore> = Arc::new(MemoryStore::new());
        let mut view = ProfileView::new(store);
        view.fetch("ghost").await.unwrap();
        assert!(view.profile().is_none());

        view.clear();
        assert!(!view.is_loading());
    }
}
