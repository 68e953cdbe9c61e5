//! End-to-end authentication flow: ticket verification stub through identity
//! resolution, session group caching and the authorization gate.

use anyhow::Result;

use casgate::config::AuthConfig;
use casgate::error::AuthError;
use casgate::identity::{
    Access, Attributes, CasBackend, Gate, GatePolicy, MemoryPrincipalStore, PrincipalStore,
    RequestContext, SessionScope, TicketVerifier, VerifiedTicket,
};

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Verifier that answers every ticket with one canned result.
struct StubVerifier(VerifiedTicket);

impl TicketVerifier for StubVerifier {
    fn verify(&self, _ticket: &str, _service: &str) -> Result<VerifiedTicket> {
        Ok(self.0.clone())
    }
}

fn verified(username: &str, attrs_json: &str) -> VerifiedTicket {
    VerifiedTicket {
        username: Some(username.to_string()),
        attributes: Some(serde_json::from_str::<Attributes>(attrs_json).unwrap()),
    }
}

const SERVICE: &str = "https://app.example.edu/accounts/callback";

#[test]
fn full_login_maps_profile_groups_and_passes_gate() {
    init_logging();
    let backend = CasBackend::new(
        StubVerifier(verified(
            "jdoe",
            r#"{"givenName": "Jane", "sn": "Doe", "mail": "jdoe@example.edu",
                "memberOf": "[faculty, staff]"}"#,
        )),
        &AuthConfig::default(),
    );
    let store = MemoryPrincipalStore::new();
    let mut session = SessionScope::new();

    let principal = backend
        .authenticate(&store, &mut session, "ST-12345", SERVICE)
        .unwrap()
        .expect("ticket with identity must authenticate");

    assert_eq!(principal.username, "jdoe");
    assert_eq!(principal.first_name, "Jane");
    assert_eq!(principal.last_name, "Doe");
    assert_eq!(principal.email, "jdoe@example.edu");
    assert_eq!(session.user_groups(), ["faculty", "staff"]);

    // And the gate admits the session based on its cached groups.
    let gate = Gate::new(GatePolicy::raising(["staff"])).unwrap();
    let ctx = RequestContext::authenticated(principal, session);
    assert_eq!(gate.evaluate(&ctx), Access::Granted);
}

#[test]
fn second_login_reuses_the_existing_principal() {
    let backend = CasBackend::new(
        StubVerifier(verified("jdoe", r#"{"givenName": "Jane"}"#)),
        &AuthConfig::default(),
    );
    let store = MemoryPrincipalStore::new();

    let mut s1 = SessionScope::new();
    backend.authenticate(&store, &mut s1, "ST-1", SERVICE).unwrap().unwrap();
    let mut s2 = SessionScope::new();
    backend.authenticate(&store, &mut s2, "ST-2", SERVICE).unwrap().unwrap();

    assert_eq!(store.len(), 1);
}

#[test]
fn backend_authenticates_without_attributes() {
    // Policy decision: a ticket with identity but no attributes still yields
    // an authenticated Principal; with no groups cached, every group-gated
    // operation denies.
    let backend = CasBackend::new(
        StubVerifier(VerifiedTicket { username: Some("noattrs".into()), attributes: None }),
        &AuthConfig::default(),
    );
    let store = MemoryPrincipalStore::new();
    let mut session = SessionScope::new();

    let principal = backend
        .authenticate(&store, &mut session, "ST-9", SERVICE)
        .unwrap()
        .expect("identity without attributes still authenticates");
    assert!(session.user_groups().is_empty());

    let gate = Gate::new(GatePolicy::raising(["staff"])).unwrap();
    let ctx = RequestContext::authenticated(principal, session);
    assert!(matches!(gate.evaluate(&ctx), Access::Denied(_)));
}

#[test]
fn unknown_user_creation_can_be_disabled() {
    let backend = CasBackend::new(
        StubVerifier(verified("stranger", r#"{"givenName": "No"}"#)),
        &AuthConfig { create_unknown_user: false, ..AuthConfig::default() },
    );
    let store = MemoryPrincipalStore::new();
    let mut session = SessionScope::new();

    let out = backend.authenticate(&store, &mut session, "ST-5", SERVICE).unwrap();
    assert!(out.is_none());
    assert!(store.is_empty());

    // Known users still resolve with creation off.
    store.create(casgate::identity::Principal::new("stranger")).unwrap();
    let out = backend.authenticate(&store, &mut session, "ST-6", SERVICE).unwrap();
    assert_eq!(out.unwrap().username, "stranger");
}

#[test]
fn concurrent_first_logins_share_one_principal() {
    let store = MemoryPrincipalStore::new();
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            std::thread::spawn(move || {
                let backend = CasBackend::new(
                    StubVerifier(verified("fresh", r#"{"memberOf": ["staff"]}"#)),
                    &AuthConfig::default(),
                );
                let mut session = SessionScope::new();
                backend
                    .authenticate(&store, &mut session, "ST-race", SERVICE)
                    .unwrap()
                    .unwrap()
            })
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap().username, "fresh");
    }
    assert_eq!(store.len(), 1);
}

#[test]
fn verifier_outage_is_an_error_not_a_silent_deny() {
    struct DownVerifier;
    impl TicketVerifier for DownVerifier {
        fn verify(&self, _t: &str, _s: &str) -> Result<VerifiedTicket> {
            anyhow::bail!("connection refused")
        }
    }
    let backend = CasBackend::new(DownVerifier, &AuthConfig::default());
    let store = MemoryPrincipalStore::new();
    let mut session = SessionScope::new();
    let err = backend.authenticate(&store, &mut session, "ST-7", SERVICE).unwrap_err();
    assert!(matches!(err, AuthError::Verification(_)));
}
