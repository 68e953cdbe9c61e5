//! Ticket verification seam and the backend that orchestrates a login.
//! The CAS protocol exchange itself lives behind `TicketVerifier`; this crate
//! only consumes its verdict.

use anyhow::Result;
use tracing::{debug, warn};

use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};

use super::attributes::Attributes;
use super::principal::Principal;
use super::resolver::{clean_username, IdentityResolver};
use super::session::SessionScope;
use super::store::PrincipalStore;

/// Outcome of one ticket verification by the external CAS client.
#[derive(Debug, Clone, Default)]
pub struct VerifiedTicket {
    pub username: Option<String>,
    pub attributes: Option<Attributes>,
}

pub trait TicketVerifier: Send + Sync {
    /// Exchange an opaque ticket for identity and attributes against the CAS
    /// server registered for `service`.
    fn verify(&self, ticket: &str, service: &str) -> Result<VerifiedTicket>;
}

pub struct CasBackend<V> {
    verifier: V,
    resolver: IdentityResolver,
}

impl<V: TicketVerifier> CasBackend<V> {
    pub fn new(verifier: V, config: &AuthConfig) -> Self {
        Self { verifier, resolver: IdentityResolver::new(config.create_unknown_user) }
    }

    /// Verify a ticket and resolve it to a local Principal.
    /// Ok(None) means the ticket carried no identity (treat as authentication
    /// failure); a Principal with no attributes is still authenticated, it
    /// just carries no groups and so fails every group-gated operation.
    pub fn authenticate(
        &self,
        store: &dyn PrincipalStore,
        session: &mut SessionScope,
        ticket: &str,
        service: &str,
    ) -> AuthResult<Option<Principal>> {
        let verified = self.verifier.verify(ticket, service)?;

        let attributes = match verified.attributes {
            Some(attrs) if !attrs.is_empty() => {
                debug!(target: "casgate::identity", "fetched user attributes from CAS: {:?}", attrs);
                debug!(target: "casgate::identity",
                    "authenticationType = {}", attrs.profile_field("authenticationType"));
                session.set_user_attributes(attrs.clone());
                attrs
            }
            _ => {
                warn!(target: "casgate::identity", "no attributes found in CAS response for ticket {}", ticket);
                Attributes::new()
            }
        };

        let Some(username) = verified.username.filter(|u| !u.trim().is_empty()) else {
            warn!(target: "casgate::identity", "no username returned by CAS server");
            return Ok(None);
        };
        let username = clean_username(&username);
        debug!(target: "casgate::identity", "cleaned username is {}", username);

        self.resolver
            .resolve(store, session, username, &attributes)
            .map_err(AuthError::Store)
    }
}
