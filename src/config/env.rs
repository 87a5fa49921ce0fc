//! Injected environment.
//!
//! The resolver reads sink defaults from a flat string map instead of the
//! process environment directly, so tests and multi-tenant hosts can supply
//! their own.

use std::collections::HashMap;

/// Variable selecting the runtime environment.
pub const RUNTIME_ENV: &str = "APP_ENV";
pub const PRODUCTION: &str = "production";

pub const REMOTE_HOST: &str = "REMOTE_HOST";
pub const REMOTE_TOKEN: &str = "REMOTE_TOKEN";
pub const BETTERSTACK_URL: &str = "BETTERSTACK_URL";
pub const BETTERSTACK_TOKEN: &str = "BETTERSTACK_TOKEN";
pub const CHAT_WEBHOOK_URL: &str = "CHAT_WEBHOOK_URL";
pub const SYSLOG_HOST: &str = "SYSLOG_HOST";
pub const SYSLOG_PORT: &str = "SYSLOG_PORT";
pub const SYSLOG_HOSTNAME: &str = "SYSLOG_HOSTNAME";

/// Read-only string-keyed environment.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// A production environment with no other variables.
    pub fn production() -> Self {
        Self::from_pairs([(RUNTIME_ENV, PRODUCTION)])
    }

    /// Empty strings count as unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn get_owned(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_string)
    }

    pub fn is_production(&self) -> bool {
        self.get(RUNTIME_ENV) == Some(PRODUCTION)
    }
}
