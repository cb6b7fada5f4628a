use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tokio::sync::watch;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::holding::{Holding, NewHolding};
use crate::models::portfolio::{NewPortfolio, Portfolio};
use crate::models::session::{Session, User};
use crate::store::traits::{DataStore, SessionProvider};

/// Connection credentials for the hosted backend; provisioned externally.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`
    pub url: String,
    /// Anonymous (publishable) API key
    pub anon_key: String,
}

impl SupabaseConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        }
    }

    /// Read credentials from `SUPABASE_URL` / `SUPABASE_ANON_KEY`.
    pub fn from_env() -> Result<Self, CoreError> {
        let url = std::env::var("SUPABASE_URL")
            .map_err(|_| CoreError::Validation("SUPABASE_URL is not set".into()))?;
        let anon_key = std::env::var("SUPABASE_ANON_KEY")
            .map_err(|_| CoreError::Validation("SUPABASE_ANON_KEY is not set".into()))?;
        Ok(Self::new(url, anon_key))
    }
}

// ── Backend wire types ──────────────────────────────────────────────

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    user: WireUser,
}

#[derive(Deserialize)]
struct WireUser {
    id: Uuid,
    email: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(alias = "msg", alias = "error_description")]
    message: Option<String>,
}

/// Client for the hosted backend: GoTrue for identity, PostgREST for the
/// `portfolios` and `holdings` tables. Implements both [`DataStore`] and
/// [`SessionProvider`].
///
/// Auth state lives behind a lock and is mirrored onto a `watch` channel so
/// the dashboard can react to sign-in/sign-out without polling.
pub struct SupabaseClient {
    http: Client,
    config: SupabaseConfig,
    session: RwLock<Option<Session>>,
    session_tx: watch::Sender<Option<Session>>,
}

impl SupabaseClient {
    pub fn new(config: SupabaseConfig) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        let (session_tx, _) = watch::channel(None);
        Self {
            http,
            config,
            session: RwLock::new(None),
            session_tx,
        }
    }

    /// Exchange email + password for a session (GoTrue password grant).
    /// Publishes the new session to all subscribers.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, CoreError> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.config.url);
        let response = self
            .http
            .post(&url)
            .header("apikey", &self.config.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CoreError::Auth {
                message: error_message(response).await,
            });
        }

        let token: TokenResponse = response.json().await.map_err(|e| CoreError::Auth {
            message: format!("Failed to parse token response: {e}"),
        })?;
        let session = Session::new(
            token.access_token,
            User {
                id: token.user.id,
                email: token.user.email,
            },
        );
        self.set_session(Some(session.clone()));
        info!("Signed in as {}", session.user.email);
        Ok(session)
    }

    fn set_session(&self, session: Option<Session>) {
        if let Ok(mut guard) = self.session.write() {
            *guard = session.clone();
        }
        // Receivers may all be gone; that's fine.
        let _ = self.session_tx.send(session);
    }

    fn access_token(&self) -> Result<String, CoreError> {
        self.session
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().map(|s| s.access_token.clone()))
            .ok_or(CoreError::MissingSession)
    }

    /// Attach the API key and the user's bearer token to a table request.
    fn authed(&self, builder: RequestBuilder) -> Result<RequestBuilder, CoreError> {
        let token = self.access_token()?;
        Ok(builder
            .header("apikey", &self.config.anon_key)
            .bearer_auth(token))
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.config.url)
    }

    /// POST one row; the store echoes the inserted representation back.
    async fn insert_row<Row, Out>(&self, table: &str, row: &Row) -> Result<Out, CoreError>
    where
        Row: serde::Serialize + Sync,
        Out: serde::de::DeserializeOwned,
    {
        let builder = self
            .http
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .json(row);
        let response = self.authed(builder)?.send().await?;

        if !response.status().is_success() {
            return Err(CoreError::Store {
                message: error_message(response).await,
            });
        }

        // PostgREST returns the representation as a one-element array.
        let mut rows: Vec<Out> = response.json().await.map_err(|e| {
            CoreError::Deserialization(format!("Failed to parse {table} insert response: {e}"))
        })?;
        rows.pop().ok_or_else(|| CoreError::Store {
            message: format!("Insert into {table} returned no rows"),
        })
    }

    /// GET rows matching a PostgREST query string, e.g.
    /// `select=*&portfolio_id=eq.<id>`.
    async fn query_rows<Out>(&self, table: &str, query: &str) -> Result<Vec<Out>, CoreError>
    where
        Out: serde::de::DeserializeOwned,
    {
        let url = format!("{}?{query}", self.table_url(table));
        debug!("Querying {table}: {query}");
        let response = self.authed(self.http.get(&url))?.send().await?;

        if !response.status().is_success() {
            return Err(CoreError::Store {
                message: error_message(response).await,
            });
        }

        response.json().await.map_err(|e| {
            CoreError::Deserialization(format!("Failed to parse {table} rows: {e}"))
        })
    }
}

/// Pull a human-readable message out of a backend error response.
async fn error_message(response: Response) -> String {
    let status = response.status();
    match response.json::<ErrorBody>().await {
        Ok(ErrorBody {
            message: Some(message),
        }) => message,
        _ => format!("HTTP {status}"),
    }
}

#[async_trait]
impl DataStore for SupabaseClient {
    async fn insert_portfolio(&self, row: NewPortfolio) -> Result<Portfolio, CoreError> {
        self.insert_row("portfolios", &row).await
    }

    async fn portfolios_for_user(&self, user_id: Uuid) -> Result<Vec<Portfolio>, CoreError> {
        // Row-level security already scopes rows to the signed-in user; the
        // explicit filter keeps the query self-describing.
        let query = format!("select=*&user_id=eq.{user_id}&order=created_at.desc");
        self.query_rows("portfolios", &query).await
    }

    async fn insert_holding(&self, row: NewHolding) -> Result<Holding, CoreError> {
        self.insert_row("holdings", &row).await
    }

    async fn holdings_for_portfolio(
        &self,
        portfolio_id: Uuid,
    ) -> Result<Vec<Holding>, CoreError> {
        let query = format!("select=*&portfolio_id=eq.{portfolio_id}");
        self.query_rows("holdings", &query).await
    }
}

#[async_trait]
impl SessionProvider for SupabaseClient {
    async fn current_session(&self) -> Result<Option<Session>, CoreError> {
        Ok(self.session.read().ok().and_then(|guard| guard.clone()))
    }

    async fn sign_out(&self) -> Result<(), CoreError> {
        let token = match self.access_token() {
            Ok(token) => token,
            // Already signed out; nothing to revoke.
            Err(_) => return Ok(()),
        };

        let url = format!("{}/auth/v1/logout", self.config.url);
        let response = self
            .http
            .post(&url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() && response.status() != StatusCode::UNAUTHORIZED {
            return Err(CoreError::Auth {
                message: error_message(response).await,
            });
        }

        self.set_session(None);
        info!("Signed out");
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.session_tx.subscribe()
    }
}
