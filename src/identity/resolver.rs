//! Identity resolution: verified username + attributes to a local Principal.

use anyhow::Result;
use tracing::{debug, error, warn};

use super::attributes::Attributes;
use super::principal::Principal;
use super::session::SessionScope;
use super::store::PrincipalStore;

/// Normalization applied before lookup: trim surrounding whitespace only.
/// CAS usernames are opaque identifiers; no case folding.
pub fn clean_username(raw: &str) -> &str {
    raw.trim()
}

#[derive(Debug, Clone)]
pub struct IdentityResolver {
    /// Create a Principal for usernames not yet in the store.
    pub create_unknown: bool,
}

impl Default for IdentityResolver {
    fn default() -> Self { Self { create_unknown: true } }
}

impl IdentityResolver {
    pub fn new(create_unknown: bool) -> Self { Self { create_unknown } }

    /// Find or create the Principal for a verified username and apply its
    /// attributes. The username is trusted as-is; callers must pass the
    /// cleaned form. Returns Ok(None) when the username is empty, or when
    /// `create_unknown` is off and no matching Principal exists.
    pub fn resolve(
        &self,
        store: &dyn PrincipalStore,
        session: &mut SessionScope,
        username: &str,
        attributes: &Attributes,
    ) -> Result<Option<Principal>> {
        if username.is_empty() {
            return Ok(None);
        }

        let mut principal = if self.create_unknown {
            // get_or_create has store-level safeguards against concurrent
            // first logins racing on the same username.
            let (p, created) = store.get_or_create(username)?;
            if created {
                debug!(target: "casgate::identity", "resolve created a new principal for {}", username);
            } else {
                debug!(target: "casgate::identity", "resolve found an existing principal for {}", username);
            }
            p
        } else {
            match store.find_by_username(username)? {
                Some(p) => p,
                None => {
                    debug!(target: "casgate::identity", "principal creation is off and {} was not found", username);
                    return Ok(None);
                }
            }
        };

        self.configure(store, session, &mut principal, attributes);
        Ok(Some(principal))
    }

    /// Apply profile fields and extract groups into the session scope.
    /// Every failure here is recovered locally: the authentication as a whole
    /// never aborts over a malformed attribute.
    fn configure(
        &self,
        store: &dyn PrincipalStore,
        session: &mut SessionScope,
        principal: &mut Principal,
        attributes: &Attributes,
    ) {
        if attributes.is_empty() {
            warn!(target: "casgate::identity", "no user attributes to configure for {}", principal.username);
            return;
        }

        principal.first_name = attributes.profile_field("givenName");
        principal.last_name = attributes.profile_field("sn");
        principal.email = attributes.profile_field("mail");
        if let Err(e) = store.save(principal) {
            error!(target: "casgate::identity",
                "could not persist profile fields for {}: {}", principal.username, e);
        } else {
            debug!(target: "casgate::identity",
                "configured principal {} ({} {} <{}>)",
                principal.username, principal.first_name, principal.last_name, principal.email);
        }

        match attributes.member_of() {
            Some(groups) => {
                debug!(target: "casgate::identity",
                    "storing groups for {} in session: {:?}", principal.username, groups);
                session.set_user_groups(groups);
            }
            None => {
                warn!(target: "casgate::identity", "no user groups from CAS handshake for {}", principal.username);
            }
        }
    }
}
