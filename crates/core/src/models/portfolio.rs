use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named collection of holdings owned by exactly one user.
///
/// Rows in the hosted `portfolios` table. Portfolios are create-only in this
/// scope: never updated or deleted by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    /// Unique identifier, assigned by the store
    pub id: Uuid,

    /// Display name (non-empty)
    pub name: String,

    /// Optional free-text description
    #[serde(default)]
    pub description: Option<String>,

    /// Owning user
    pub user_id: Uuid,

    /// Creation timestamp, assigned by the store.
    /// Listings are ordered by this field, newest first.
    pub created_at: DateTime<Utc>,
}

/// Insert shape for a new portfolio row: `{name, description, user_id}`.
/// `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPortfolio {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub user_id: Uuid,
}

impl NewPortfolio {
    /// Build an insert row. The name is trimmed; an empty description
    /// collapses to `None`.
    pub fn new(name: impl Into<String>, description: Option<String>, user_id: Uuid) -> Self {
        Self {
            name: name.into().trim().to_string(),
            description: description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            user_id,
        }
    }
}
