//! Signed-in user identity.
//!
//! Operations that record ownership take the identity as an explicit argument
//! instead of reading it from process-wide state.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};

/// The user on whose behalf records are created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Stable user ID, written to `created_by`
    pub id: String,
    /// Contact email, if known
    pub email: Option<String>,
}

impl UserIdentity {
    /// Creates a new identity.
    #[must_use]
    pub fn new(id: impl Into<String>, email: Option<String>) -> Self {
        Self {
            id: id.into(),
            email,
        }
    }
}

/// Authentication state of one editing session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<UserIdentity>,
}

impl Session {
    /// A session with the given user signed in.
    #[must_use]
    pub const fn signed_in(user: UserIdentity) -> Self {
        Self { user: Some(user) }
    }

    /// A session with nobody signed in.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { user: None }
    }

    /// The signed-in user, if any.
    #[must_use]
    pub const fn current_user(&self) -> Option<&UserIdentity> {
        self.user.as_ref()
    }

    /// Signs the current user out.
    pub fn sign_out(&mut self) {
        self.user = None;
    }
}

/// Returns the user or [`Error::Unauthenticated`] when nobody is signed in.
pub fn require_user(user: Option<&UserIdentity>) -> Result<&UserIdentity> {
    match user {
        Some(user) => Ok(user),
        None => Err(Error::Unauthenticated),
    }
}
