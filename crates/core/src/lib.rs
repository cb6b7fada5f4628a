pub mod components;
pub mod errors;
pub mod models;
pub mod store;

use std::sync::Arc;

use components::dashboard::{Dashboard, Redirect};
use components::landing::Landing;
use errors::CoreError;
use models::notification::{LogNotifier, Notifier};
use store::memory::{MemorySession, MemoryStore};
use store::supabase::{SupabaseClient, SupabaseConfig};
use store::traits::{DataStore, SessionProvider};

/// Main entry point for the Portfolio Analyzer core library.
/// Wires the external collaborators (session provider, data store, toast
/// sink) together and hands out the page controllers.
#[must_use]
pub struct PortfolioAnalyzer {
    session_provider: Arc<dyn SessionProvider>,
    store: Arc<dyn DataStore>,
    notifier: Arc<dyn Notifier>,
}

impl PortfolioAnalyzer {
    /// Compose the app from explicit collaborators.
    pub fn new(
        session_provider: Arc<dyn SessionProvider>,
        store: Arc<dyn DataStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            session_provider,
            store,
            notifier,
        }
    }

    /// App backed by the hosted backend. One client serves as both the
    /// identity service and the tabular store.
    pub fn supabase(config: SupabaseConfig) -> Self {
        let client = Arc::new(SupabaseClient::new(config));
        Self::new(client.clone(), client, Arc::new(LogNotifier))
    }

    /// App backed by in-memory collaborators: demo mode, no backend needed.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemorySession::new()),
            Arc::new(MemoryStore::new()),
            Arc::new(LogNotifier),
        )
    }

    #[must_use]
    pub fn session_provider(&self) -> &Arc<dyn SessionProvider> {
        &self.session_provider
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn DataStore> {
        &self.store
    }

    #[must_use]
    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// The landing page.
    pub fn landing(&self) -> Landing {
        Landing::new()
    }

    /// Mount the dashboard page, gated on the current session, and run the
    /// initial list fetch when signed in.
    pub async fn mount_dashboard(&self) -> Result<(Dashboard, Option<Redirect>), CoreError> {
        let (mut dashboard, redirect) = Dashboard::mount(self.session_provider.as_ref()).await?;
        if redirect.is_none() {
            dashboard
                .refresh_list(self.store.as_ref(), self.notifier.as_ref())
                .await;
        }
        Ok((dashboard, redirect))
    }
}
