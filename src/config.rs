//! Deployment-tunable settings for the CAS backend and its gates.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthConfig {
    /// Create a Principal on first login for usernames not yet in the store.
    #[serde(default = "default_create_unknown")]
    pub create_unknown_user: bool,
    /// Default redirect destination for gates configured to divert on deny.
    #[serde(default = "default_not_authorized_url")]
    pub not_authorized_url: String,
}

fn default_create_unknown() -> bool { true }
fn default_not_authorized_url() -> String { "/not_authorized".into() }

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            create_unknown_user: default_create_unknown(),
            not_authorized_url: default_not_authorized_url(),
        }
    }
}
