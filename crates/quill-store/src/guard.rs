// File: src/guard.rs
// Purpose: Route guards deciding whether a path may be entered

use crate::navigation::{NavigationPolicy, Redirect};
use crate::stores::AuthStore;

/// What a guard needs to know about the session
pub trait AuthState {
    fn is_authenticated(&self) -> bool;
    fn is_admin(&self) -> bool;
}

impl AuthState for AuthStore {
    fn is_authenticated(&self) -> bool {
        AuthStore::is_authenticated(self)
    }

    fn is_admin(&self) -> bool {
        AuthStore::is_admin(self)
    }
}

/// Protect the admin area
///
/// - outside the admin prefix: allowed
/// - no session: login page that returns to `path`
/// - signed in without the admin role: home
pub fn admin_guard(path: &str, auth: &impl AuthState, policy: &NavigationPolicy) -> Option<Redirect> {
    if !policy.is_admin_path(path) {
        return None;
    }

    if !auth.is_authenticated() {
        tracing::debug!("admin guard: {} requires sign-in", path);
        return Some(policy.login_with_return(path));
    }

    if !auth.is_admin() {
        tracing::debug!("admin guard: {} requires admin role", path);
        return Some(policy.to_home());
    }

    None
}

/// Require a session for every non-public path
pub fn auth_guard(path: &str, auth: &impl AuthState, policy: &NavigationPolicy) -> Option<Redirect> {
    if policy.is_public_path(path) || auth.is_authenticated() {
        None
    } else {
        Some(Redirect::to(&policy.login))
    }
}
