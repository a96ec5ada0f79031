// File: src/navigation.rs
// Purpose: Redirect values, the navigator boundary and the policy deciding where to go

use std::fmt;

use crate::config::NavigationConfig;
use crate::models::Post;

/// Target location of a client-side navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub location: String,
}

impl Redirect {
    pub fn to(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }
}

impl fmt::Display for Redirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.location)
    }
}

/// Router boundary: whatever actually changes the current page
pub trait Navigator {
    fn navigate(&mut self, redirect: &Redirect);
}

/// Navigator that only remembers where it was sent
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    pub history: Vec<Redirect>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&Redirect> {
        self.history.last()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&mut self, redirect: &Redirect) {
        self.history.push(redirect.clone());
    }
}

/// Where successful commands send the user
///
/// Kept apart from the stores so the same store can back views with
/// different routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationPolicy {
    pub home: String,
    pub login: String,
    pub admin: String,
    pub posts: String,
    pub public_paths: Vec<String>,
}

impl Default for NavigationPolicy {
    fn default() -> Self {
        Self::from_config(&NavigationConfig::default())
    }
}

impl NavigationPolicy {
    pub fn from_config(config: &NavigationConfig) -> Self {
        Self {
            home: config.home.clone(),
            login: config.login.clone(),
            admin: config.admin.clone(),
            posts: config.posts.clone(),
            public_paths: config.public_paths.clone(),
        }
    }

    pub fn after_login(&self) -> Redirect {
        Redirect::to(&self.admin)
    }

    pub fn after_logout(&self) -> Redirect {
        Redirect::to(&self.home)
    }

    /// Edit page of a freshly created post
    pub fn after_create_post(&self, post: &Post) -> Redirect {
        Redirect::to(format!("{}/{}", self.posts.trim_end_matches('/'), post.id))
    }

    pub fn after_delete_post(&self) -> Redirect {
        Redirect::to(&self.posts)
    }

    pub fn to_home(&self) -> Redirect {
        Redirect::to(&self.home)
    }

    /// Login page that returns to `path` afterwards
    pub fn login_with_return(&self, path: &str) -> Redirect {
        Redirect::to(format!("{}?redirect={}", self.login, urlencoding::encode(path)))
    }

    /// Paths under the admin prefix (the prefix itself included)
    pub fn is_admin_path(&self, path: &str) -> bool {
        let prefix = self.admin.trim_end_matches('/');
        path == prefix
            || path
                .strip_prefix(prefix)
                .map(|rest| rest.starts_with('/'))
                .unwrap_or(false)
    }

    pub fn is_public_path(&self, path: &str) -> bool {
        self.public_paths.iter().any(|public| public == path)
    }
}
