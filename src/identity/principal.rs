use serde::{Deserialize, Serialize};

/// Local user record keyed by a trusted external username.
/// The username is the natural key: unique in the store and never re-validated
/// once the external ticket verification step has produced it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

impl Principal {
    pub fn new(username: impl Into<String>) -> Self {
        Self { username: username.into(), ..Default::default() }
    }
}
