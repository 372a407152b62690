// ABOUTME: Guard verdict tests over session snapshots
// ABOUTME: Auth guard, role guard, and chain short-circuit behavior
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Studio Admin Project

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{profile_with_role, session_for};
use studio_admin::guards::{
    evaluate_auth, evaluate_chain, evaluate_role, Guard, GuardVerdict,
};
use studio_admin::models::StaffRole;
use studio_admin::session::SessionSnapshot;
use uuid::Uuid;

const ADMINS: &[StaffRole] = &[StaffRole::MasterAdmin, StaffRole::Admin];

fn loading_snapshot() -> SessionSnapshot {
    SessionSnapshot {
        session: None,
        profile: None,
        loading: true,
    }
}

fn anonymous_snapshot() -> SessionSnapshot {
    SessionSnapshot {
        session: None,
        profile: None,
        loading: false,
    }
}

fn snapshot_with_role(role: Option<StaffRole>) -> SessionSnapshot {
    let user_id = Uuid::new_v4();
    SessionSnapshot {
        session: Some(session_for(user_id)),
        profile: Some(profile_with_role(user_id, role)),
        loading: false,
    }
}

#[test]
fn auth_guard_waits_while_loading() {
    assert_eq!(
        evaluate_auth(&loading_snapshot(), "/members"),
        GuardVerdict::Wait
    );
}

#[test]
fn auth_guard_redirects_anonymous_with_return_path() {
    assert_eq!(
        evaluate_auth(&anonymous_snapshot(), "/payroll"),
        GuardVerdict::RedirectToLogin {
            return_to: "/payroll".into()
        }
    );
}

#[test]
fn auth_guard_allows_any_authenticated_session() {
    assert_eq!(
        evaluate_auth(&snapshot_with_role(None), "/members"),
        GuardVerdict::Allow
    );
}

#[test]
fn role_guard_waits_while_loading() {
    assert_eq!(
        evaluate_role(&loading_snapshot(), ADMINS, "/members"),
        GuardVerdict::Wait
    );
}

#[test]
fn role_guard_treats_unresolved_role_as_anonymous() {
    // Authenticated with no resolvable role redirects to login, it does not
    // render access denied.
    assert_eq!(
        evaluate_role(&snapshot_with_role(None), ADMINS, "/members"),
        GuardVerdict::RedirectToLogin {
            return_to: "/members".into()
        }
    );
}

#[test]
fn role_guard_denies_role_outside_the_allowed_set() {
    assert_eq!(
        evaluate_role(&snapshot_with_role(Some(StaffRole::Coach)), ADMINS, "/members"),
        GuardVerdict::Denied {
            role: StaffRole::Coach
        }
    );
}

#[test]
fn role_guard_allows_each_permitted_role() {
    for role in [StaffRole::MasterAdmin, StaffRole::Admin] {
        assert_eq!(
            evaluate_role(&snapshot_with_role(Some(role)), ADMINS, "/members"),
            GuardVerdict::Allow
        );
    }
}

#[test]
fn chain_short_circuits_on_the_first_non_allow_verdict() {
    let chain = [Guard::RequireAuth, Guard::RequireRole(ADMINS)];

    // Anonymous fails the auth guard first; the role guard never runs, so
    // the verdict is a redirect rather than a denial.
    assert_eq!(
        evaluate_chain(&chain, &anonymous_snapshot(), "/members"),
        GuardVerdict::RedirectToLogin {
            return_to: "/members".into()
        }
    );

    assert_eq!(
        evaluate_chain(&chain, &snapshot_with_role(Some(StaffRole::Coach)), "/members"),
        GuardVerdict::Denied {
            role: StaffRole::Coach
        }
    );

    assert_eq!(
        evaluate_chain(&chain, &snapshot_with_role(Some(StaffRole::Admin)), "/members"),
        GuardVerdict::Allow
    );
}

#[test]
fn empty_chain_allows() {
    assert_eq!(
        evaluate_chain(&[], &anonymous_snapshot(), "/members"),
        GuardVerdict::Allow
    );
}
