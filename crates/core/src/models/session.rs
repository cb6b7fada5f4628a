use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An authenticated user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
}

/// The authenticated-user context maintained by the identity provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token for store requests
    pub access_token: String,

    /// The signed-in user
    pub user: User,
}

impl Session {
    pub fn new(access_token: impl Into<String>, user: User) -> Self {
        Self {
            access_token: access_token.into(),
            user,
        }
    }
}

/// Explicit session context handed down from the dashboard to the components
/// that need it. Components never reach for ambient global session state; the
/// subscription lifecycle is owned by the single top-level controller.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    session: Option<Session>,
}

impl SessionContext {
    #[must_use]
    pub fn signed_in(session: Session) -> Self {
        Self {
            session: Some(session),
        }
    }

    /// A context with no session. Form submissions against it fail with
    /// `CoreError::MissingSession` before any insert is attempted.
    #[must_use]
    pub fn signed_out() -> Self {
        Self { session: None }
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }
}
