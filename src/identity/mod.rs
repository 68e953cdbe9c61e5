//! Identity resolution and group authorization for CAS single-sign-on.
//! Keep the public surface thin and split implementation across sub-modules.

mod attributes;
mod authorizer;
mod principal;
mod provider;
mod request_context;
mod resolver;
mod session;
mod store;

pub use attributes::{AttributeValue, Attributes};
pub use authorizer::{authorize, guard, Access, Denial, Gate, GatePolicy, GuardOutcome, OnDeny};
pub use principal::Principal;
pub use provider::{CasBackend, TicketVerifier, VerifiedTicket};
pub use request_context::RequestContext;
pub use resolver::{clean_username, IdentityResolver};
pub use session::SessionScope;
pub use store::{MemoryPrincipalStore, PrincipalStore};
