//! Session state and page access rules.

use crate::config::{AccessConfig, SessionConfig};

/// The signed-in state of the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    /// Not resolved yet.
    Loading,
    /// No usable credentials.
    Unauthenticated,
    /// Signed in.
    Authenticated { access_token: String, role: String },
}

impl Session {
    /// Returns the bearer token of an authenticated session.
    pub fn access_token(&self) -> Option<&str> {
        match self {
            Self::Authenticated { access_token, .. } => Some(access_token),
            _ => None,
        }
    }
}

/// Supplies the current [`Session`].
#[allow(async_fn_in_trait)]
pub trait SessionProvider {
    async fn session(&self) -> Session;
}

/// [`SessionProvider`] reading credentials from configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredSession {
    config: SessionConfig,
}

impl ConfiguredSession {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }
}

impl SessionProvider for ConfiguredSession {
    async fn session(&self) -> Session {
        match &self.config.access_token {
            Some(token) if !token.trim().is_empty() => Session::Authenticated {
                access_token: token.trim().to_string(),
                role: self.config.role.clone().unwrap_or_default(),
            },
            _ => Session::Unauthenticated,
        }
    }
}

/// Outcome of checking a session against a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// The session is still loading; stay put.
    Pending,
    /// Not signed in; go to the login view.
    Login,
    /// Signed in without a permitted role; go back to the listing.
    Denied,
    /// Allowed, with the token to authorize backend calls.
    Granted { access_token: String },
}

/// Which roles may use which page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    authorized_roles: Vec<String>,
}

impl AccessPolicy {
    pub fn new(config: &AccessConfig) -> Self {
        Self {
            authorized_roles: config.authorized_roles.clone(),
        }
    }

    /// Checks access to the open-study page, which needs an authorized role.
    pub fn open_study(&self, session: &Session) -> Access {
        match session {
            Session::Authenticated { role, .. } if !self.is_authorized(role) => Access::Denied,
            other => Self::signed_in(other),
        }
    }

    /// Checks access to the edit page, which needs any signed-in user.
    pub fn edit_study(&self, session: &Session) -> Access {
        Self::signed_in(session)
    }

    fn signed_in(session: &Session) -> Access {
        match session {
            Session::Loading => Access::Pending,
            Session::Unauthenticated => Access::Login,
            Session::Authenticated { access_token, .. } => Access::Granted {
                access_token: access_token.clone(),
            },
        }
    }

    fn is_authorized(&self, role: &str) -> bool {
        self.authorized_roles
            .iter()
            .any(|r| r.eq_ignore_ascii_case(role.trim()))
    }
}
