//! Principal persistence seam.
//! The resolver only ever talks to this trait; the web application supplies the
//! real store (ORM, directory, whatever backs its user base).

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use parking_lot::RwLock;

use super::principal::Principal;

pub trait PrincipalStore: Send + Sync {
    fn find_by_username(&self, username: &str) -> Result<Option<Principal>>;

    fn create(&self, principal: Principal) -> Result<Principal>;

    /// Atomic insert-if-absent keyed by username. Two requests racing on the
    /// same first login must end with exactly one Principal; implementations
    /// must not use a separate existence check followed by an insert.
    /// Returns the principal and whether it was created by this call.
    fn get_or_create(&self, username: &str) -> Result<(Principal, bool)>;

    fn save(&self, principal: &Principal) -> Result<()>;
}

/// In-process reference store behind a single lock; `get_or_create` holds the
/// write lock across lookup and insert, which gives the required atomicity.
#[derive(Debug, Clone, Default)]
pub struct MemoryPrincipalStore {
    users: Arc<RwLock<HashMap<String, Principal>>>,
}

impl MemoryPrincipalStore {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.users.read().len() }

    pub fn is_empty(&self) -> bool { self.users.read().is_empty() }
}

impl PrincipalStore for MemoryPrincipalStore {
    fn find_by_username(&self, username: &str) -> Result<Option<Principal>> {
        Ok(self.users.read().get(username).cloned())
    }

    fn create(&self, principal: Principal) -> Result<Principal> {
        let mut m = self.users.write();
        if m.contains_key(&principal.username) {
            anyhow::bail!("duplicate username: {}", principal.username);
        }
        m.insert(principal.username.clone(), principal.clone());
        Ok(principal)
    }

    fn get_or_create(&self, username: &str) -> Result<(Principal, bool)> {
        let mut m = self.users.write();
        if let Some(existing) = m.get(username) {
            return Ok((existing.clone(), false));
        }
        let p = Principal::new(username);
        m.insert(username.to_string(), p.clone());
        Ok((p, true))
    }

    fn save(&self, principal: &Principal) -> Result<()> {
        self.users
            .write()
            .insert(principal.username.clone(), principal.clone());
        Ok(())
    }
}
