use log::{error, info};
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::holding::{Holding, NewHolding};
use crate::models::notification::{Notification, Notifier};
use crate::store::traits::DataStore;

/// Form for adding a holding to one portfolio: ticker, share count and
/// average price as raw text input.
///
/// Numeric fields are parsed and validated before submission; malformed or
/// non-positive input is rejected instead of being forwarded to the store.
#[derive(Debug)]
pub struct HoldingForm {
    portfolio_id: Uuid,
    pub ticker: String,
    pub shares: String,
    pub average_price: String,
    loading: bool,
}

impl HoldingForm {
    /// A form scoped to the given target portfolio.
    #[must_use]
    pub fn new(portfolio_id: Uuid) -> Self {
        Self {
            portfolio_id,
            ticker: String::new(),
            shares: String::new(),
            average_price: String::new(),
            loading: false,
        }
    }

    #[must_use]
    pub fn portfolio_id(&self) -> Uuid {
        self.portfolio_id
    }

    /// True while a submit is in flight; disables the submit control.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Label for the submit control, switching while in flight.
    #[must_use]
    pub fn submit_label(&self) -> &'static str {
        if self.loading {
            "Toevoegen..."
        } else {
            "Holding Toevoegen"
        }
    }

    /// Submit the form. Success clears the inputs and shows a success toast;
    /// the caller runs its completion step (close the dialog, re-fetch the
    /// list). Failure shows an error toast and keeps the inputs.
    pub async fn submit(
        &mut self,
        store: &dyn DataStore,
        notifier: &dyn Notifier,
    ) -> Result<Holding, CoreError> {
        self.loading = true;
        let result = self.try_submit(store).await;
        self.loading = false;

        match result {
            Ok(holding) => {
                info!(
                    "Holding {} added to portfolio {}",
                    holding.ticker, holding.portfolio_id
                );
                self.ticker.clear();
                self.shares.clear();
                self.average_price.clear();
                notifier.notify(Notification::success("Holding toegevoegd"));
                Ok(holding)
            }
            Err(e) => {
                error!("Failed to add holding: {e}");
                notifier.notify(Notification::error(e.to_string()));
                Err(e)
            }
        }
    }

    async fn try_submit(&self, store: &dyn DataStore) -> Result<Holding, CoreError> {
        let ticker = self.ticker.trim();
        if ticker.is_empty() {
            return Err(CoreError::Validation("Ticker must not be empty".into()));
        }

        let shares = parse_positive("shares", &self.shares)?;
        let average_price = parse_positive("average price", &self.average_price)?;

        let row = NewHolding::new(self.portfolio_id, ticker, shares, average_price);
        store.insert_holding(row).await
    }
}

/// Parse a user-entered decimal. Empty, non-numeric, non-finite and
/// non-positive values are all rejected here so nothing invalid ever reaches
/// the store.
fn parse_positive(field: &str, input: &str) -> Result<f64, CoreError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| CoreError::Validation(format!("{field} is not a valid number: '{trimmed}'")))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(CoreError::Validation(format!(
            "{field} must be a positive number, got {trimmed}"
        )));
    }
    Ok(value)
}
