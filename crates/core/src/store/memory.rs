use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::watch;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::holding::{Holding, NewHolding};
use crate::models::portfolio::{NewPortfolio, Portfolio};
use crate::models::session::Session;
use crate::store::traits::{DataStore, SessionProvider};

/// In-memory [`DataStore`]. Backs the demo mode and the integration tests;
/// behaves like the hosted store (newest-first listings, owner scoping)
/// without any network.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    portfolios: Vec<Portfolio>,
    holdings: Vec<Holding>,
    /// Monotonic insert counter; breaks created_at ties so ordering stays
    /// deterministic even when two rows land in the same instant.
    seq: u64,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn insert_portfolio(&self, row: NewPortfolio) -> Result<Portfolio, CoreError> {
        let mut tables = self.inner.lock().expect("store lock poisoned");
        tables.seq += 1;
        let portfolio = Portfolio {
            id: Uuid::new_v4(),
            name: row.name,
            description: row.description,
            user_id: row.user_id,
            created_at: Utc::now() + chrono::Duration::nanoseconds(tables.seq as i64),
        };
        tables.portfolios.push(portfolio.clone());
        Ok(portfolio)
    }

    async fn portfolios_for_user(&self, user_id: Uuid) -> Result<Vec<Portfolio>, CoreError> {
        let tables = self.inner.lock().expect("store lock poisoned");
        let mut rows: Vec<Portfolio> = tables
            .portfolios
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert_holding(&self, row: NewHolding) -> Result<Holding, CoreError> {
        let mut tables = self.inner.lock().expect("store lock poisoned");
        if !tables.portfolios.iter().any(|p| p.id == row.portfolio_id) {
            return Err(CoreError::PortfolioNotFound(row.portfolio_id.to_string()));
        }
        let holding = Holding {
            id: Uuid::new_v4(),
            portfolio_id: row.portfolio_id,
            ticker: row.ticker,
            shares: row.shares,
            average_price: row.average_price,
        };
        tables.holdings.push(holding.clone());
        Ok(holding)
    }

    async fn holdings_for_portfolio(
        &self,
        portfolio_id: Uuid,
    ) -> Result<Vec<Holding>, CoreError> {
        let tables = self.inner.lock().expect("store lock poisoned");
        Ok(tables
            .holdings
            .iter()
            .filter(|h| h.portfolio_id == portfolio_id)
            .cloned()
            .collect())
    }
}

/// In-memory [`SessionProvider`] with programmatic sign-in, for demo mode
/// and tests.
pub struct MemorySession {
    session: Mutex<Option<Session>>,
    session_tx: watch::Sender<Option<Session>>,
}

impl MemorySession {
    #[must_use]
    pub fn new() -> Self {
        let (session_tx, _) = watch::channel(None);
        Self {
            session: Mutex::new(None),
            session_tx,
        }
    }

    /// Start with an already-signed-in session.
    #[must_use]
    pub fn signed_in(session: Session) -> Self {
        let provider = Self::new();
        provider.set_session(Some(session));
        provider
    }

    /// Replace the session and notify subscribers.
    pub fn set_session(&self, session: Option<Session>) {
        *self.session.lock().expect("session lock poisoned") = session.clone();
        let _ = self.session_tx.send(session);
    }

    /// How many live subscriptions exist. Lets tests assert that a dashboard
    /// released its subscription on unmount.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.session_tx.receiver_count()
    }
}

impl Default for MemorySession {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionProvider for MemorySession {
    async fn current_session(&self) -> Result<Option<Session>, CoreError> {
        Ok(self.session.lock().expect("session lock poisoned").clone())
    }

    async fn sign_out(&self) -> Result<(), CoreError> {
        self.set_session(None);
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.session_tx.subscribe()
    }
}
