//! Policy configuration.
//!
//! A policy is a declarative list of grants, each a target pattern plus an
//! action list. It can be loaded from the environment or from JSON, and is
//! turned into a [`PermissionSet`] in one fail-fast step: a single malformed
//! grant rejects the whole policy.
//!
//! Which principal holds which policy is decided elsewhere.

use serde::{Deserialize, Serialize};

use crate::error::{PermissionError, PermissionResult};
use crate::permissions::{Permission, PermissionSet};

/// Environment variable holding the grant list.
pub const POLICY_GRANTS_ENV: &str = "WIKI_POLICY_GRANTS";

/// A single grant as written in policy text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantConfig {
    /// Target pattern (e.g. `Main`, `*`, `*Main`, `Main*`).
    pub target: String,

    /// Comma-separated action list (e.g. `view,edit`).
    pub actions: String,
}

impl GrantConfig {
    /// Create a grant.
    pub fn new(target: impl Into<String>, actions: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            actions: actions.into(),
        }
    }

    /// Build the permission this grant describes.
    pub fn to_permission(&self) -> PermissionResult<Permission> {
        Permission::new(self.target.as_str(), &self.actions)
    }
}

/// A list of grants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Grants in declaration order.
    #[serde(default)]
    pub grants: Vec<GrantConfig>,
}

impl PolicyConfig {
    /// Load the policy from environment variables.
    ///
    /// Environment variables:
    /// - `WIKI_POLICY_GRANTS`: `;`-separated `target=actions` entries, e.g.
    ///   `*=view;Sandbox*=edit`. Unset means an empty policy.
    pub fn from_env() -> PermissionResult<Self> {
        match std::env::var(POLICY_GRANTS_ENV) {
            Ok(value) => Self::parse_grants(&value),
            Err(std::env::VarError::NotPresent) => Ok(Self::default()),
            Err(e) => Err(PermissionError::InvalidPolicy {
                key: POLICY_GRANTS_ENV.to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// Parse `;`-separated `target=actions` entries.
    ///
    /// Whitespace around entries and around `=` is ignored; empty entries are
    /// skipped. Action lists themselves are not checked here.
    ///
    /// # Example
    ///
    /// ```
    /// use wiki_permissions::config::{GrantConfig, PolicyConfig};
    ///
    /// let policy = PolicyConfig::parse_grants("*=view; Main*=edit").unwrap();
    /// assert_eq!(policy.grants[1], GrantConfig::new("Main*", "edit"));
    /// ```
    pub fn parse_grants(value: &str) -> PermissionResult<Self> {
        let grants = value
            .split(';')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                entry
                    .rsplit_once('=')
                    .map(|(target, actions)| GrantConfig::new(target.trim(), actions.trim()))
                    .ok_or_else(|| PermissionError::InvalidPolicy {
                        key: entry.to_string(),
                        message: "expected target=actions".to_string(),
                    })
            })
            .collect::<PermissionResult<Vec<_>>>()?;

        Ok(Self { grants })
    }

    /// Load the policy from JSON: `{"grants": [{"target": "*", "actions": "view"}]}`.
    pub fn from_json(json: &str) -> PermissionResult<Self> {
        serde_json::from_str(json).map_err(|e| PermissionError::InvalidPolicy {
            key: "json".to_string(),
            message: e.to_string(),
        })
    }

    /// Check that every grant builds.
    pub fn validate(&self) -> PermissionResult<()> {
        self.build().map(|_| ())
    }

    /// Build the permission set. Fails on the first malformed grant.
    pub fn build(&self) -> PermissionResult<PermissionSet> {
        let set = self
            .grants
            .iter()
            .map(|grant| {
                grant.to_permission().inspect_err(|e| {
                    tracing::warn!(
                        target_pattern = %grant.target,
                        actions = %grant.actions,
                        error = %e,
                        "Rejecting policy grant"
                    );
                })
            })
            .collect::<PermissionResult<PermissionSet>>()?;

        tracing::debug!(grants = set.len(), "Loaded permission policy");
        Ok(set)
    }
}
