//! Current-user configuration from environment variables.
//!
//! The CLI has no sign-in flow; the acting user is read from `RECIPE_USER_ID`
//! (and optionally `RECIPE_USER_EMAIL`) in the environment or `.env` file.

use crate::core::session::UserIdentity;

/// Builds the current user from `RECIPE_USER_ID` / `RECIPE_USER_EMAIL`.
///
/// Returns `None` when no user ID is configured.
#[must_use]
pub fn current_user() -> Option<UserIdentity> {
    identity_from(
        std::env::var("RECIPE_USER_ID").ok(),
        std::env::var("RECIPE_USER_EMAIL").ok(),
    )
}

fn identity_from(id: Option<String>, email: Option<String>) -> Option<UserIdentity> {
    let id = id.filter(|id| !id.trim().is_empty())?;
    let email = email.filter(|email| !email.trim().is_empty());
    Some(UserIdentity::new(id.trim(), email))
}
