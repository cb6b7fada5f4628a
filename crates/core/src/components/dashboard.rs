use std::fmt::Write as _;

use log::{debug, info};
use tokio::sync::watch;
use uuid::Uuid;

use crate::components::holding_form::HoldingForm;
use crate::components::portfolio_form::PortfolioForm;
use crate::components::portfolio_list::PortfolioList;
use crate::errors::CoreError;
use crate::models::notification::Notifier;
use crate::models::session::{Session, SessionContext};
use crate::store::traits::{DataStore, SessionProvider};

/// Session gate state: unknown while the initial session lookup is in
/// flight, then signed in or signed out.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Unknown,
    SignedIn(Session),
    SignedOut,
}

/// Navigation the page asks its host to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    /// Send the user to the login screen
    Login,
}

/// The authenticated dashboard page.
///
/// Owns the session subscription for its whole lifetime (dropped on unmount),
/// the refresh counter that drives list re-fetches, the portfolio form, the
/// list, and the per-portfolio holding dialog.
pub struct Dashboard {
    auth: AuthState,
    session_rx: watch::Receiver<Option<Session>>,
    refresh: u64,
    fetched_refresh: Option<u64>,
    pub portfolio_form: PortfolioForm,
    pub list: PortfolioList,
    holding_dialog: Option<HoldingForm>,
}

impl Dashboard {
    /// Mount the page: subscribe to session changes first, then resolve the
    /// current session once. Returns the page plus an immediate redirect when
    /// no session exists.
    pub async fn mount(
        provider: &dyn SessionProvider,
    ) -> Result<(Self, Option<Redirect>), CoreError> {
        let session_rx = provider.subscribe();
        let mut dashboard = Self {
            auth: AuthState::Unknown,
            session_rx,
            refresh: 0,
            fetched_refresh: None,
            portfolio_form: PortfolioForm::new(),
            list: PortfolioList::new(),
            holding_dialog: None,
        };

        let session = provider.current_session().await?;
        let redirect = dashboard.handle_session_event(session);
        Ok((dashboard, redirect))
    }

    #[must_use]
    pub fn auth_state(&self) -> &AuthState {
        &self.auth
    }

    /// The explicit session context handed down to child components.
    #[must_use]
    pub fn session_context(&self) -> SessionContext {
        match &self.auth {
            AuthState::SignedIn(session) => SessionContext::signed_in(session.clone()),
            _ => SessionContext::signed_out(),
        }
    }

    /// Feed a session-change notification into the gate. An absent session
    /// redirects to the login screen.
    pub fn handle_session_event(&mut self, session: Option<Session>) -> Option<Redirect> {
        match session {
            Some(session) => {
                debug!("Session active for {}", session.user.email);
                self.auth = AuthState::SignedIn(session);
                None
            }
            None => {
                info!("No session — redirecting to login");
                self.auth = AuthState::SignedOut;
                Some(Redirect::Login)
            }
        }
    }

    /// Wait for the next session change and feed it through the gate.
    /// Returns `None` once the provider itself is gone.
    pub async fn next_session_event(&mut self) -> Option<Option<Redirect>> {
        self.session_rx.changed().await.ok()?;
        let session = self.session_rx.borrow_and_update().clone();
        Some(self.handle_session_event(session))
    }

    /// Sign out. The redirect follows from the session subscription once the
    /// provider reports the session gone, not from this call.
    pub async fn sign_out(&self, provider: &dyn SessionProvider) -> Result<(), CoreError> {
        provider.sign_out().await
    }

    // ── Refresh counter ─────────────────────────────────────────────

    /// Opaque counter whose change signals "re-fetch the list".
    #[must_use]
    pub fn refresh_token(&self) -> u64 {
        self.refresh
    }

    /// True when the list has not yet been fetched for the current token.
    #[must_use]
    pub fn list_is_stale(&self) -> bool {
        self.fetched_refresh != Some(self.refresh)
    }

    /// Re-fetch the list when the refresh token moved (at most once per
    /// token value). No-op while signed out.
    pub async fn refresh_list(&mut self, store: &dyn DataStore, notifier: &dyn Notifier) {
        if !self.list_is_stale() {
            return;
        }
        let user_id = match &self.auth {
            AuthState::SignedIn(session) => session.user.id,
            _ => return,
        };
        self.fetched_refresh = Some(self.refresh);
        self.list.refresh(store, user_id, notifier).await;
    }

    // ── Portfolio form ──────────────────────────────────────────────

    /// Submit the portfolio form; a successful creation bumps the refresh
    /// token (the form's completion callback).
    pub async fn submit_portfolio_form(
        &mut self,
        store: &dyn DataStore,
        notifier: &dyn Notifier,
    ) -> Result<(), CoreError> {
        let ctx = self.session_context();
        self.portfolio_form.submit(&ctx, store, notifier).await?;
        self.refresh += 1;
        Ok(())
    }

    // ── Holding dialog ──────────────────────────────────────────────

    /// Open the "Holding Toevoegen" dialog for one portfolio card.
    pub fn open_holding_dialog(&mut self, portfolio_id: Uuid) {
        self.holding_dialog = Some(HoldingForm::new(portfolio_id));
    }

    #[must_use]
    pub fn holding_dialog(&self) -> Option<&HoldingForm> {
        self.holding_dialog.as_ref()
    }

    pub fn holding_dialog_mut(&mut self) -> Option<&mut HoldingForm> {
        self.holding_dialog.as_mut()
    }

    /// Submit the open holding dialog. Success closes the dialog and bumps
    /// the refresh token; failure keeps it open for retry.
    pub async fn submit_holding_dialog(
        &mut self,
        store: &dyn DataStore,
        notifier: &dyn Notifier,
    ) -> Result<(), CoreError> {
        let form = self
            .holding_dialog
            .as_mut()
            .ok_or_else(|| CoreError::Validation("No holding dialog is open".into()))?;
        form.submit(store, notifier).await?;
        self.holding_dialog = None;
        self.refresh += 1;
        Ok(())
    }

    // ── Rendering ───────────────────────────────────────────────────

    /// Header: title, signed-in email, sign-out control.
    #[must_use]
    pub fn render_header(&self) -> String {
        let email = match &self.auth {
            AuthState::SignedIn(session) => session.user.email.as_str(),
            _ => "",
        };
        format!("Portfolio Analyzer | {email} | [Uitloggen]")
    }

    /// The static analysis tiles. Placeholders: every tile shows zero.
    #[must_use]
    pub fn render_tiles(&self) -> String {
        let tiles = [
            ("Regio's", "Portfolio's"),
            ("Sectoren", "Spreiding"),
            ("Market Cap", "Analyse"),
            ("Risk Profile", "Beoordeling"),
        ];
        let mut out = String::from("Welkom bij Portfolio Analyzer\n");
        out.push_str(
            "Hier kun je straks je portefeuille analyseren op risicospreiding, \
             sectoren, regio's en market cap.\n",
        );
        for (title, subtitle) in tiles {
            let _ = writeln!(out, "{title}: 0 ({subtitle})");
        }
        out
    }

    /// Full page render. While the session is still unknown, only the
    /// loading indicator is shown.
    #[must_use]
    pub fn render(&self) -> String {
        match &self.auth {
            AuthState::Unknown => "Laden...".to_string(),
            AuthState::SignedOut => String::new(),
            AuthState::SignedIn(_) => format!(
                "{}\n{}\n{}",
                self.render_header(),
                self.render_tiles(),
                self.list.render()
            ),
        }
    }
}
