//! Session policy: user agent, scheme blocking and permission rules for the
//! persistent browsing session.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::ViewerConfig;
use crate::error::{Result, ViewerError};
use crate::origin::TrustedOrigin;

/// Schemes the embedded content may load. `file:` is never allowed.
const ALLOWED_SCHEMES: &[&str] = &["http", "https", "about", "data", "blob"];

/// A capability a page can ask permission for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Notifications,
    Media,
    Fullscreen,
    Push,
    /// Anything the engine asks for that is not on the allow-list.
    #[serde(untagged)]
    Other(String),
}

impl Capability {
    /// The fixed set of capabilities that may ever be granted.
    pub const GRANTABLE: [Capability; 4] = [
        Capability::Notifications,
        Capability::Media,
        Capability::Fullscreen,
        Capability::Push,
    ];

    pub fn is_grantable(&self) -> bool {
        !matches!(self, Capability::Other(_))
    }
}

impl FromStr for Capability {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "notifications" => Capability::Notifications,
            "media" => Capability::Media,
            "fullscreen" => Capability::Fullscreen,
            "push" => Capability::Push,
            other => Capability::Other(other.to_string()),
        })
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Notifications => write!(f, "notifications"),
            Capability::Media => write!(f, "media"),
            Capability::Fullscreen => write!(f, "fullscreen"),
            Capability::Push => write!(f, "push"),
            Capability::Other(name) => write!(f, "{name}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionDecision {
    Allow,
    Deny,
}

impl PermissionDecision {
    pub fn is_allowed(self) -> bool {
        self == PermissionDecision::Allow
    }
}

/// What the host needs to set up the named session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Partition name; the host maps it to a persistent data directory.
    pub partition: String,
    pub user_agent: String,
    pub blocked_schemes: Vec<String>,
}

/// Permission and load rules for the embedded content.
#[derive(Debug, Clone)]
pub struct SessionPolicy {
    trusted: TrustedOrigin,
    user_agent: String,
}

impl SessionPolicy {
    pub fn new(trusted: TrustedOrigin, user_agent: impl Into<String>) -> Self {
        Self {
            trusted,
            user_agent: user_agent.into(),
        }
    }

    pub fn from_config(config: &ViewerConfig) -> Result<Self> {
        Ok(Self::new(config.trusted_origin()?, config.user_agent.clone()))
    }

    pub fn trusted_origin(&self) -> &TrustedOrigin {
        &self.trusted
    }

    /// Produces the session setup for `partition`.
    ///
    /// Pure: calling it again with the same partition yields an equal value.
    pub fn configure(&self, partition: &str) -> SessionConfig {
        SessionConfig {
            partition: partition.to_string(),
            user_agent: self.user_agent.clone(),
            blocked_schemes: vec!["file".to_string()],
        }
    }

    /// Refuses loads the embedded content must never perform.
    pub fn check_load(&self, url: &Url) -> Result<()> {
        let scheme = url.scheme();
        if ALLOWED_SCHEMES.contains(&scheme) {
            Ok(())
        } else {
            Err(ViewerError::BlockedScheme {
                scheme: scheme.to_string(),
                url: url.to_string(),
            })
        }
    }

    /// Decides a permission request. Recomputed on every call, nothing is
    /// remembered between checks.
    pub fn check_permission(&self, origin: &str, capability: &Capability) -> PermissionDecision {
        let decision = if capability.is_grantable() && self.trusted.matches(origin) {
            PermissionDecision::Allow
        } else {
            PermissionDecision::Deny
        };

        tracing::debug!(
            "[SessionPolicy] Permission '{}' from {} -> {:?}",
            capability,
            origin,
            decision
        );
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> SessionPolicy {
        SessionPolicy::new(
            TrustedOrigin::parse("https://pjsekai.world").unwrap(),
            "TestAgent/1.0",
        )
    }

    #[test]
    fn test_push_allowed_only_for_trusted_origin() {
        let policy = policy();
        assert_eq!(
            policy.check_permission("https://pjsekai.world", &Capability::Push),
            PermissionDecision::Allow
        );
        for origin in [
            "https://evil.example",
            "https://pjsekai.world.evil.example",
            "http://pjsekai.world",
            "",
            "null",
        ] {
            assert_eq!(
                policy.check_permission(origin, &Capability::Push),
                PermissionDecision::Deny,
                "origin {origin:?} must be denied"
            );
        }
    }

    #[test]
    fn test_unknown_capability_denied_for_trusted_origin() {
        let policy = policy();
        let geolocation: Capability = "geolocation".parse().unwrap();
        assert_eq!(
            policy.check_permission("https://pjsekai.world/songs", &geolocation),
            PermissionDecision::Deny
        );
    }

    #[test]
    fn test_all_grantable_capabilities_allowed() {
        let policy = policy();
        for capability in Capability::GRANTABLE {
            assert!(
                policy
                    .check_permission("https://pjsekai.world/", &capability)
                    .is_allowed()
            );
        }
    }

    #[test]
    fn test_file_scheme_blocked() {
        let policy = policy();
        let err = policy
            .check_load(&Url::parse("file:///etc/passwd").unwrap())
            .unwrap_err();
        assert!(err.is_blocked_scheme());
        policy
            .check_load(&Url::parse("https://pjsekai.world/").unwrap())
            .unwrap();
        policy.check_load(&Url::parse("about:blank").unwrap()).unwrap();
    }

    #[test]
    fn test_configure_is_idempotent() {
        let policy = policy();
        let first = policy.configure("pjsekai");
        let second = policy.configure("pjsekai");
        assert_eq!(first, second);
        assert_eq!(first.user_agent, "TestAgent/1.0");
        assert_eq!(first.blocked_schemes, vec!["file".to_string()]);
    }

    #[test]
    fn test_capability_round_trip_names() {
        assert_eq!("push".parse::<Capability>().unwrap(), Capability::Push);
        assert_eq!(Capability::Media.to_string(), "media");
    }
}
