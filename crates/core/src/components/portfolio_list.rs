use std::collections::HashMap;
use std::fmt::Write as _;

use futures::future::join_all;
use log::{debug, error, warn};
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::holding::Holding;
use crate::models::notification::{Notification, Notifier};
use crate::models::portfolio::Portfolio;
use crate::store::traits::DataStore;

/// One rendered card: a portfolio and its holdings. A portfolio whose
/// holdings query failed gets an empty holdings list; the card still renders.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioCard {
    pub portfolio: Portfolio,
    pub holdings: Vec<Holding>,
}

/// Display state of the list.
#[derive(Debug, Clone, PartialEq)]
pub enum ListState {
    /// Initial fetch still in flight
    Loading,
    /// Zero portfolios for this user
    Empty,
    /// Cards in newest-first portfolio order
    Loaded(Vec<PortfolioCard>),
}

/// The portfolio list with its fetch protocol.
///
/// Every fetch is tagged with a monotonically increasing sequence number;
/// `apply` discards results that are not newer than the last applied one, so
/// a slow stale response can never overwrite fresher data.
#[derive(Debug)]
pub struct PortfolioList {
    state: ListState,
    next_seq: u64,
    last_applied: u64,
}

impl PortfolioList {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: ListState::Loading,
            next_seq: 0,
            last_applied: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> &ListState {
        &self.state
    }

    /// Start a fetch: returns the sequence number to pass to [`apply`].
    ///
    /// [`apply`]: PortfolioList::apply
    pub fn begin_fetch(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Fetch the full portfolio + holdings snapshot for one user.
    ///
    /// Top-level portfolios are queried newest-first, then all holdings
    /// queries fan out concurrently and join before returning. A failed
    /// holdings query only degrades its own portfolio to an empty holdings
    /// list; a failed top-level query fails the whole snapshot.
    pub async fn fetch_snapshot(
        store: &dyn DataStore,
        user_id: Uuid,
    ) -> Result<Vec<PortfolioCard>, CoreError> {
        let portfolios = store.portfolios_for_user(user_id).await?;
        debug!("Fetched {} portfolios", portfolios.len());

        let queries = portfolios
            .iter()
            .map(|p| async move { (p.id, store.holdings_for_portfolio(p.id).await) });
        let results = join_all(queries).await;

        let mut holdings_by_portfolio: HashMap<Uuid, Vec<Holding>> = HashMap::new();
        for (portfolio_id, result) in results {
            match result {
                Ok(holdings) => {
                    holdings_by_portfolio.insert(portfolio_id, holdings);
                }
                Err(e) => {
                    warn!("Holdings fetch failed for portfolio {portfolio_id}: {e}");
                }
            }
        }

        // Card order follows the portfolio query order, regardless of which
        // holdings query finished first.
        Ok(portfolios
            .into_iter()
            .map(|portfolio| {
                let holdings = holdings_by_portfolio
                    .remove(&portfolio.id)
                    .unwrap_or_default();
                PortfolioCard {
                    portfolio,
                    holdings,
                }
            })
            .collect())
    }

    /// Apply a fetch result. Returns `true` if the state changed.
    ///
    /// Stale results (sequence not newer than the last applied) are dropped.
    /// A failed fetch surfaces an error toast and keeps the last-known state,
    /// except that the initial `Loading` decays to `Empty` so the UI stays
    /// interactive.
    pub fn apply(
        &mut self,
        seq: u64,
        result: Result<Vec<PortfolioCard>, CoreError>,
        notifier: &dyn Notifier,
    ) -> bool {
        if seq <= self.last_applied {
            debug!("Dropping stale list fetch (seq {seq} <= {})", self.last_applied);
            return false;
        }

        match result {
            Ok(cards) => {
                self.last_applied = seq;
                self.state = if cards.is_empty() {
                    ListState::Empty
                } else {
                    ListState::Loaded(cards)
                };
                true
            }
            Err(e) => {
                error!("Portfolio list fetch failed: {e}");
                notifier.notify(Notification::error(e.to_string()));
                if self.state == ListState::Loading {
                    self.state = ListState::Empty;
                    return true;
                }
                false
            }
        }
    }

    /// Begin, fetch and apply in one call.
    pub async fn refresh(
        &mut self,
        store: &dyn DataStore,
        user_id: Uuid,
        notifier: &dyn Notifier,
    ) {
        let seq = self.begin_fetch();
        let result = Self::fetch_snapshot(store, user_id).await;
        self.apply(seq, result, notifier);
    }

    /// Render the list as card text, labels in Dutch.
    #[must_use]
    pub fn render(&self) -> String {
        match &self.state {
            ListState::Loading => "Laden...".to_string(),
            ListState::Empty => "Nog geen portfolio's. Voeg er een toe!".to_string(),
            ListState::Loaded(cards) => {
                let mut out = String::new();
                for card in cards {
                    let _ = writeln!(out, "{}", card.portfolio.name);
                    if let Some(description) = &card.portfolio.description {
                        let _ = writeln!(out, "{description}");
                    }
                    let _ = writeln!(out, "Holdings:");
                    if card.holdings.is_empty() {
                        let _ = writeln!(out, "  Geen holdings");
                    } else {
                        for holding in &card.holdings {
                            let _ = writeln!(
                                out,
                                "  {}  {}",
                                holding.ticker,
                                holding.position_label()
                            );
                        }
                    }
                    let _ = writeln!(out, "[Holding Toevoegen]");
                }
                out
            }
        }
    }
}

impl Default for PortfolioList {
    fn default() -> Self {
        Self::new()
    }
}
