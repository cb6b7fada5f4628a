use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single ticker position (shares + average cost) within a portfolio.
///
/// Rows in the hosted `holdings` table. Many holdings per portfolio;
/// create-only in this scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Unique identifier, assigned by the store
    pub id: Uuid,

    /// Parent portfolio. Must reference a portfolio owned by the acting
    /// user — enforced by the store's access rules, not by this client.
    pub portfolio_id: Uuid,

    /// Ticker symbol, always uppercase
    pub ticker: String,

    /// Number of shares (positive, fractional allowed)
    pub shares: f64,

    /// Average purchase price per share (positive)
    pub average_price: f64,
}

impl Holding {
    /// Position summary as shown on a portfolio card, price to two decimals:
    /// `"10 @ €150.00"`.
    #[must_use]
    pub fn position_label(&self) -> String {
        format!("{} @ €{:.2}", self.shares, self.average_price)
    }
}

/// Insert shape for a new holding row:
/// `{portfolio_id, ticker, shares, average_price}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewHolding {
    pub portfolio_id: Uuid,
    pub ticker: String,
    pub shares: f64,
    pub average_price: f64,
}

impl NewHolding {
    /// Build an insert row. The ticker is trimmed and normalized to uppercase.
    pub fn new(
        portfolio_id: Uuid,
        ticker: impl Into<String>,
        shares: f64,
        average_price: f64,
    ) -> Self {
        Self {
            portfolio_id,
            ticker: ticker.into().trim().to_uppercase(),
            shares,
            average_price,
        }
    }
}
