use log::{error, info};

use crate::errors::CoreError;
use crate::models::notification::{Notification, Notifier};
use crate::models::portfolio::{NewPortfolio, Portfolio};
use crate::models::session::SessionContext;
use crate::store::traits::DataStore;

/// Form for creating a portfolio: name + optional description.
///
/// Without a signed-in user the submit reports an error and never touches
/// the store; on success the inputs are cleared and a success toast is
/// shown; on failure the inputs stay populated for retry.
#[derive(Debug, Default)]
pub struct PortfolioForm {
    pub name: String,
    pub description: String,
    loading: bool,
}

impl PortfolioForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
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
            "Portfolio Toevoegen"
        }
    }

    /// Submit the form. Returns the inserted portfolio so the caller can run
    /// its completion step (the dashboard bumps its refresh counter).
    pub async fn submit(
        &mut self,
        ctx: &SessionContext,
        store: &dyn DataStore,
        notifier: &dyn Notifier,
    ) -> Result<Portfolio, CoreError> {
        self.loading = true;
        let result = self.try_submit(ctx, store).await;
        self.loading = false;

        match result {
            Ok(portfolio) => {
                info!("Portfolio '{}' created", portfolio.name);
                self.name.clear();
                self.description.clear();
                notifier.notify(Notification::success("Portfolio toegevoegd"));
                Ok(portfolio)
            }
            Err(CoreError::MissingSession) => {
                error!("Portfolio submit without a session");
                notifier.notify(Notification::error("Je moet ingelogd zijn"));
                Err(CoreError::MissingSession)
            }
            Err(e) => {
                error!("Failed to create portfolio: {e}");
                notifier.notify(Notification::error(e.to_string()));
                Err(e)
            }
        }
    }

    async fn try_submit(
        &self,
        ctx: &SessionContext,
        store: &dyn DataStore,
    ) -> Result<Portfolio, CoreError> {
        let user = ctx.user().ok_or(CoreError::MissingSession)?;

        let name = self.name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation(
                "Portfolio name must not be empty".into(),
            ));
        }

        let row = NewPortfolio::new(name, Some(self.description.clone()), user.id);
        store.insert_portfolio(row).await
    }
}
