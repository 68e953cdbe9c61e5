//! Per-request session scope for attribute and group caching.
//! Explicitly passed rather than ambient so callers and tests can inject and
//! inspect it; lifetime is one authenticated session, never durable storage.

use super::attributes::Attributes;

#[derive(Debug, Clone, Default)]
pub struct SessionScope {
    user_attributes: Option<Attributes>,
    user_groups: Option<Vec<String>>,
}

impl SessionScope {
    pub fn new() -> Self { Self::default() }

    /// Raw attribute set from the last ticket verification.
    pub fn user_attributes(&self) -> Option<&Attributes> {
        self.user_attributes.as_ref()
    }

    pub fn set_user_attributes(&mut self, attrs: Attributes) {
        self.user_attributes = Some(attrs);
    }

    /// Ordered group identifiers derived from `memberOf` at authentication
    /// time; read on every protected-operation check.
    pub fn user_groups(&self) -> &[String] {
        self.user_groups.as_deref().unwrap_or(&[])
    }

    pub fn set_user_groups(&mut self, groups: Vec<String>) {
        self.user_groups = Some(groups);
    }

    /// Session end: drop everything cached for the authenticated session.
    pub fn clear(&mut self) {
        self.user_attributes = None;
        self.user_groups = None;
    }
}
