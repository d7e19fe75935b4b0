//! End-to-end behavior of the session runtime: boot, sign-in, sign-out and
//! profile resolution driving navigations through the public API.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use route_gate::routing::{
        IdentitySignal, NavigationError, NavigationSink, OnboardingStatus, Role, RouteSegment,
        UserId,
    };
    use route_gate::runtime::{
        Credentials, IdentityError, IdentityProvider, ProfileProvider, ProfileQueryError,
        SessionRuntime, SignInOutcome,
    };
    use route_gate::session::SessionStore;

    #[derive(Clone)]
    pub(super) struct Account {
        pub(super) user_id: &'static str,
        pub(super) secret: &'static str,
        pub(super) role: Option<Role>,
    }

    #[derive(Default)]
    pub(super) struct FakeIdentity {
        accounts: HashMap<String, Account>,
        current: Mutex<Option<Account>>,
        offline: bool,
    }

    impl FakeIdentity {
        pub(super) fn with_accounts(accounts: Vec<Account>) -> Self {
            Self {
                accounts: accounts
                    .into_iter()
                    .map(|account| (account.user_id.to_string(), account))
                    .collect(),
                ..Self::default()
            }
        }

        pub(super) fn offline() -> Self {
            Self {
                offline: true,
                ..Self::default()
            }
        }

        fn signal(account: Option<&Account>) -> IdentitySignal {
            match account {
                Some(account) => IdentitySignal::signed_in(account.user_id, account.role),
                None => IdentitySignal::signed_out(),
            }
        }

        fn token_for(account: &Account) -> String {
            format!("token-{}", account.user_id)
        }
    }

    impl IdentityProvider for FakeIdentity {
        fn restore(&self, token: Option<&str>) -> Result<IdentitySignal, IdentityError> {
            if self.offline {
                return Err(IdentityError::Unavailable("dns failure".to_string()));
            }
            let account = token.and_then(|token| {
                self.accounts
                    .values()
                    .find(|account| Self::token_for(account) == token)
                    .cloned()
            });
            let signal = Self::signal(account.as_ref());
            *self.current.lock().expect("lock") = account;
            Ok(signal)
        }

        fn current_identity(&self) -> Result<IdentitySignal, IdentityError> {
            if self.offline {
                return Err(IdentityError::Unavailable("dns failure".to_string()));
            }
            Ok(Self::signal(self.current.lock().expect("lock").as_ref()))
        }

        fn sign_in(&self, credentials: &Credentials) -> Result<SignInOutcome, IdentityError> {
            let account = self
                .accounts
                .get(&credentials.identifier)
                .filter(|account| account.secret == credentials.secret)
                .cloned()
                .ok_or(IdentityError::InvalidCredentials)?;
            let outcome = SignInOutcome {
                token: Self::token_for(&account),
                identity: Self::signal(Some(&account)),
            };
            *self.current.lock().expect("lock") = Some(account);
            Ok(outcome)
        }

        fn sign_out(&self) -> Result<(), IdentityError> {
            *self.current.lock().expect("lock") = None;
            Ok(())
        }
    }

    #[derive(Default)]
    pub(super) struct FakeProfiles {
        statuses: Mutex<HashMap<UserId, OnboardingStatus>>,
        calls: Mutex<Vec<UserId>>,
        failing: bool,
    }

    impl FakeProfiles {
        pub(super) fn with(entries: &[(&str, OnboardingStatus)]) -> Self {
            Self {
                statuses: Mutex::new(
                    entries
                        .iter()
                        .map(|(id, status)| (UserId(id.to_string()), *status))
                        .collect(),
                ),
                ..Self::default()
            }
        }

        pub(super) fn failing() -> Self {
            Self {
                failing: true,
                ..Self::default()
            }
        }

        pub(super) fn calls(&self) -> Vec<UserId> {
            self.calls.lock().expect("lock").clone()
        }
    }

    impl ProfileProvider for FakeProfiles {
        fn profile_status(&self, user_id: &UserId) -> Result<OnboardingStatus, ProfileQueryError> {
            self.calls.lock().expect("lock").push(user_id.clone());
            if self.failing {
                return Err(ProfileQueryError::Unavailable("timeout".to_string()));
            }
            Ok(self
                .statuses
                .lock()
                .expect("lock")
                .get(user_id)
                .copied()
                .unwrap_or(OnboardingStatus::Pending))
        }
    }

    #[derive(Default)]
    pub(super) struct Screen {
        calls: Mutex<Vec<RouteSegment>>,
    }

    impl Screen {
        pub(super) fn calls(&self) -> Vec<RouteSegment> {
            self.calls.lock().expect("lock").clone()
        }
    }

    impl NavigationSink for Screen {
        fn replace(&self, segment: RouteSegment) -> Result<(), NavigationError> {
            self.calls.lock().expect("lock").push(segment);
            Ok(())
        }
    }

    pub(super) type Runtime = SessionRuntime<FakeIdentity, FakeProfiles, Screen>;

    pub(super) fn vendor_account() -> Account {
        Account {
            user_id: "vendor-1",
            secret: "hunter2",
            role: Some(Role::Vendor),
        }
    }

    pub(super) fn public_account() -> Account {
        Account {
            user_id: "public-1",
            secret: "letmein",
            role: Some(Role::Public),
        }
    }

    pub(super) fn credentials(account: &Account) -> Credentials {
        Credentials {
            identifier: account.user_id.to_string(),
            secret: account.secret.to_string(),
        }
    }

    pub(super) fn build_runtime(
        identity: FakeIdentity,
        profiles: FakeProfiles,
        store: SessionStore,
        initial: RouteSegment,
    ) -> (Runtime, Arc<FakeProfiles>, Arc<Screen>) {
        let profiles = Arc::new(profiles);
        let screen = Arc::new(Screen::default());
        let runtime = SessionRuntime::new(
            Arc::new(identity),
            profiles.clone(),
            store,
            screen.clone(),
            initial,
        );
        (runtime, profiles, screen)
    }
}

mod lifecycle {
    use super::common::*;
    use route_gate::routing::{OnboardingStatus, RouteSegment, UserState};
    use route_gate::runtime::IdentityError;
    use route_gate::session::SessionStore;

    #[test]
    fn boot_without_token_routes_to_auth_and_skips_profile_query() {
        let (mut runtime, profiles, screen) = build_runtime(
            FakeIdentity::with_accounts(vec![vendor_account()]),
            FakeProfiles::default(),
            SessionStore::in_memory(),
            RouteSegment::Other,
        );

        let reports = runtime.boot();

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].user_state, UserState::Unauthenticated);
        assert_eq!(screen.calls(), vec![RouteSegment::Auth]);
        assert!(profiles.calls().is_empty());
    }

    #[test]
    fn sign_in_persists_token_and_routes_pending_vendor_to_onboarding() {
        let (mut runtime, _profiles, screen) = build_runtime(
            FakeIdentity::with_accounts(vec![vendor_account()]),
            FakeProfiles::with(&[("vendor-1", OnboardingStatus::Pending)]),
            SessionStore::in_memory(),
            RouteSegment::Auth,
        );
        runtime.boot();

        runtime
            .sign_in(&credentials(&vendor_account()))
            .expect("sign-in succeeds");

        assert_eq!(
            runtime.store().load_token().as_deref(),
            Some("token-vendor-1")
        );
        assert_eq!(screen.calls(), vec![RouteSegment::VendorOnboarding]);
    }

    #[test]
    fn restored_onboarded_vendor_goes_straight_to_vendor_area() {
        let store = SessionStore::in_memory();
        store.save_token("token-vendor-1");
        let (mut runtime, profiles, screen) = build_runtime(
            FakeIdentity::with_accounts(vec![vendor_account()]),
            FakeProfiles::with(&[("vendor-1", OnboardingStatus::Complete)]),
            store,
            RouteSegment::Auth,
        );

        runtime.boot();

        assert_eq!(screen.calls(), vec![RouteSegment::Vendor]);
        assert_eq!(profiles.calls().len(), 1);
    }

    #[test]
    fn sign_out_clears_token_and_returns_to_auth() {
        let (mut runtime, _profiles, screen) = build_runtime(
            FakeIdentity::with_accounts(vec![public_account()]),
            FakeProfiles::default(),
            SessionStore::in_memory(),
            RouteSegment::Auth,
        );
        runtime.boot();
        runtime
            .sign_in(&credentials(&public_account()))
            .expect("sign-in succeeds");
        runtime.update_segment(RouteSegment::Public);

        runtime.sign_out();

        assert_eq!(runtime.store().load_token(), None);
        assert_eq!(screen.calls(), vec![RouteSegment::Public, RouteSegment::Auth]);
    }

    #[test]
    fn public_sign_in_does_not_query_onboarding() {
        let (mut runtime, profiles, screen) = build_runtime(
            FakeIdentity::with_accounts(vec![public_account()]),
            FakeProfiles::default(),
            SessionStore::in_memory(),
            RouteSegment::Auth,
        );
        runtime.boot();

        runtime
            .sign_in(&credentials(&public_account()))
            .expect("sign-in succeeds");
        runtime.refresh_identity();

        assert_eq!(screen.calls(), vec![RouteSegment::Public]);
        assert!(profiles.calls().is_empty());
    }

    #[test]
    fn rejected_credentials_leave_user_on_auth() {
        let (mut runtime, _profiles, screen) = build_runtime(
            FakeIdentity::with_accounts(vec![vendor_account()]),
            FakeProfiles::default(),
            SessionStore::in_memory(),
            RouteSegment::Auth,
        );
        runtime.boot();
        let mut wrong = credentials(&vendor_account());
        wrong.secret = "nope".to_string();

        let err = runtime.sign_in(&wrong).expect_err("sign-in rejected");

        assert!(matches!(err, IdentityError::InvalidCredentials));
        assert_eq!(runtime.store().load_token(), None);
        assert!(screen.calls().is_empty());
    }

    #[test]
    fn unreachable_identity_provider_is_treated_as_signed_out() {
        let (mut runtime, _profiles, screen) = build_runtime(
            FakeIdentity::offline(),
            FakeProfiles::default(),
            SessionStore::in_memory(),
            RouteSegment::Vendor,
        );

        runtime.boot();
        runtime.refresh_identity();

        assert_eq!(screen.calls(), vec![RouteSegment::Auth]);
    }

    #[test]
    fn failing_profile_backend_keeps_vendor_waiting() {
        let (mut runtime, profiles, screen) = build_runtime(
            FakeIdentity::with_accounts(vec![vendor_account()]),
            FakeProfiles::failing(),
            SessionStore::in_memory(),
            RouteSegment::Auth,
        );
        runtime.boot();

        runtime
            .sign_in(&credentials(&vendor_account()))
            .expect("sign-in succeeds");
        runtime.refresh_profile();

        assert!(screen.calls().is_empty());
        assert_eq!(profiles.calls().len(), 2);
        assert_eq!(
            runtime.dispatcher().state().onboarding.status,
            OnboardingStatus::Unknown
        );
    }
}

mod scenarios {
    use route_gate::routing::{
        decide, IdentitySignal, OnboardingSignal, Role, RouteSegment, RoutingAction,
    };

    #[test]
    fn signed_out_user_on_public_goes_to_auth() {
        let decision = decide(
            &IdentitySignal::signed_out(),
            &OnboardingSignal::unknown(),
            RouteSegment::Public,
        );
        assert_eq!(decision.action, RoutingAction::Navigate);
        assert_eq!(decision.target, Some(RouteSegment::Auth));
    }

    #[test]
    fn pending_vendor_on_auth_goes_to_onboarding() {
        let decision = decide(
            &IdentitySignal::signed_in("v", Some(Role::Vendor)),
            &OnboardingSignal::pending(),
            RouteSegment::Auth,
        );
        assert_eq!(decision.target, Some(RouteSegment::VendorOnboarding));
    }

    #[test]
    fn vendor_with_unresolved_profile_waits() {
        let decision = decide(
            &IdentitySignal::signed_in("v", Some(Role::Vendor)),
            &OnboardingSignal::unknown(),
            RouteSegment::Auth,
        );
        assert_eq!(decision.action, RoutingAction::None);
    }

    #[test]
    fn onboarded_vendor_on_public_goes_to_vendor() {
        let decision = decide(
            &IdentitySignal::signed_in("v", Some(Role::Vendor)),
            &OnboardingSignal::complete(),
            RouteSegment::Public,
        );
        assert_eq!(decision.target, Some(RouteSegment::Vendor));
    }

    #[test]
    fn public_user_on_vendor_goes_to_public() {
        let decision = decide(
            &IdentitySignal::signed_in("p", Some(Role::Public)),
            &OnboardingSignal::unknown(),
            RouteSegment::Vendor,
        );
        assert_eq!(decision.target, Some(RouteSegment::Public));
    }
}
