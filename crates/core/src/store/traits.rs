use async_trait::async_trait;
use tokio::sync::watch;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::holding::{Holding, NewHolding};
use crate::models::portfolio::{NewPortfolio, Portfolio};
use crate::models::session::{Session, User};

/// Trait abstraction for the hosted tabular store.
///
/// The real backend (`SupabaseClient`) and the in-memory double
/// (`MemoryStore`) both implement this. Components only ever talk to the
/// trait, so swapping the backend touches nothing else.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Insert a portfolio row and return it with store-assigned
    /// `id` / `created_at`.
    async fn insert_portfolio(&self, row: NewPortfolio) -> Result<Portfolio, CoreError>;

    /// All portfolios owned by `user_id`, ordered by creation time descending
    /// (newest first).
    async fn portfolios_for_user(&self, user_id: Uuid) -> Result<Vec<Portfolio>, CoreError>;

    /// Insert a holding row and return it with a store-assigned `id`.
    async fn insert_holding(&self, row: NewHolding) -> Result<Holding, CoreError>;

    /// All holdings belonging to one portfolio.
    async fn holdings_for_portfolio(&self, portfolio_id: Uuid)
        -> Result<Vec<Holding>, CoreError>;
}

/// Trait abstraction for the hosted identity service.
///
/// Session-change notifications are delivered over a `watch` channel; a
/// subscriber that drops its receiver is unsubscribed, so the channel covers
/// both halves of the subscribe/unsubscribe pair.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// The current session, or `None` when signed out.
    async fn current_session(&self) -> Result<Option<Session>, CoreError>;

    /// The currently signed-in user, or `None` when signed out.
    async fn current_user(&self) -> Result<Option<User>, CoreError> {
        Ok(self.current_session().await?.map(|s| s.user))
    }

    /// End the current session. Observers learn about the sign-out through
    /// their subscription, not through this call's return value.
    async fn sign_out(&self) -> Result<(), CoreError>;

    /// Subscribe to session changes. The receiver yields the new session
    /// state (`None` = signed out) on every change.
    fn subscribe(&self) -> watch::Receiver<Option<Session>>;
}
