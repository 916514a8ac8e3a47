//! Acting-user identity for one client session.
//!
//! Everything that attributes an action (create, update, comment) or checks a
//! permission takes a `&Session` rather than reading a global.

use std::process::Command;

use crate::config::Config;

pub const ANONYMOUS_USER: &str = "anonymous";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user: String,
}

impl Session {
    pub fn new(user: impl Into<String>) -> Self {
        Self { user: user.into() }
    }

    /// Resolve the acting user: explicit override, then config/env, then
    /// `git config user.name`, then `anonymous`.
    pub fn resolve(config: &Config, override_user: Option<&str>) -> Self {
        let user = override_user
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string)
            .or_else(|| config.user())
            .or_else(get_git_user_name)
            .unwrap_or_else(|| ANONYMOUS_USER.to_string());
        Self { user }
    }

    pub fn user(&self) -> &str {
        &self.user
    }
}

/// Get the git user.name config value
fn get_git_user_name() -> Option<String> {
    Command::new("git")
        .args(["config", "user.name"])
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                String::from_utf8(output.stdout)
                    .ok()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
            } else {
                None
            }
        })
}
