//! Group-based authorization gate for protected operations.
//! The decision itself is a pure set intersection; the gate wraps it with the
//! fixed check order (authentication first, then group membership) and the
//! per-operation deny behavior.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::{AuthError, AuthResult};

use super::request_context::RequestContext;

/// True iff the principal's session groups intersect the allow-list.
/// An empty allow-list is a configuration error, never a silent verdict;
/// empty session groups are an ordinary false.
pub fn authorize(allowed: &HashSet<String>, session_groups: &[String]) -> AuthResult<bool> {
    if allowed.is_empty() {
        return Err(AuthError::MisconfiguredGate(
            "allowed_groups must name at least one group".into(),
        ));
    }
    Ok(session_groups.iter().any(|g| allowed.contains(g)))
}

/// What a gate does when the check fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnDeny {
    Raise,
    Redirect(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatePolicy {
    pub allowed_groups: HashSet<String>,
    pub on_deny: OnDeny,
}

impl GatePolicy {
    pub fn raising<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_groups: groups.into_iter().map(Into::into).collect(),
            on_deny: OnDeny::Raise,
        }
    }

    pub fn redirecting<I, S>(groups: I, destination: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_groups: groups.into_iter().map(Into::into).collect(),
            on_deny: OnDeny::Redirect(destination.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    Forbidden,
    Redirect(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Granted,
    Denied(Denial),
}

/// A validated policy plus the ordered two-step check. Construction fails on
/// an empty allow-list so misconfiguration surfaces at setup, not at first
/// request.
#[derive(Debug, Clone)]
pub struct Gate {
    policy: GatePolicy,
}

impl Gate {
    pub fn new(policy: GatePolicy) -> AuthResult<Self> {
        if policy.allowed_groups.is_empty() {
            return Err(AuthError::MisconfiguredGate(
                "gate requires a non-empty allowed_groups set".into(),
            ));
        }
        Ok(Self { policy })
    }

    /// Check order is fixed: authentication (a principal must be present),
    /// then group membership against the allow-list.
    pub fn evaluate(&self, ctx: &RequestContext) -> Access {
        let Some(principal) = ctx.principal.as_ref() else {
            debug!(target: "casgate::gate", "deny: no authenticated principal");
            return Access::Denied(self.denial());
        };
        // Allow-list was validated at construction; an error here cannot occur.
        let allowed = authorize(&self.policy.allowed_groups, ctx.session.user_groups())
            .unwrap_or(false);
        if allowed {
            Access::Granted
        } else {
            warn!(target: "casgate::gate",
                "deny: {} not in any of {:?} (session groups {:?})",
                principal.username, self.policy.allowed_groups, ctx.session.user_groups());
            Access::Denied(self.denial())
        }
    }

    fn denial(&self) -> Denial {
        match &self.policy.on_deny {
            OnDeny::Raise => Denial::Forbidden,
            OnDeny::Redirect(dest) => Denial::Redirect(dest.clone()),
        }
    }
}

/// Result of running a guarded operation that was not forbidden outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome<T> {
    Completed(T),
    Redirected(String),
}

/// Wrap an operation with a gate: the returned closure runs the ordered check
/// and only invokes the operation on a grant. A raising gate surfaces
/// `AuthError::Forbidden`; a redirecting gate yields the diversion target.
pub fn guard<A, T, F>(
    policy: GatePolicy,
    op: F,
) -> AuthResult<impl Fn(&RequestContext, A) -> AuthResult<GuardOutcome<T>>>
where
    F: Fn(&RequestContext, A) -> T,
{
    let gate = Gate::new(policy)?;
    Ok(move |ctx: &RequestContext, args: A| match gate.evaluate(ctx) {
        Access::Granted => Ok(GuardOutcome::Completed(op(ctx, args))),
        Access::Denied(Denial::Forbidden) => Err(AuthError::Forbidden),
        Access::Denied(Denial::Redirect(dest)) => Ok(GuardOutcome::Redirected(dest)),
    })
}
