use super::principal::Principal;
use super::session::SessionScope;

/// Everything one inbound request carries through the auth surface: the
/// resolved principal (None until authentication ran) and its session scope.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub principal: Option<Principal>,
    pub session: SessionScope,
    pub request_id: Option<String>,
}

impl RequestContext {
    pub fn authenticated(principal: Principal, session: SessionScope) -> Self {
        Self { principal: Some(principal), session, request_id: None }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}
