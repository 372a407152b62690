// ABOUTME: Session module: the process-wide session/role state machine
// ABOUTME: Exposes the SessionStore and the snapshot type read by guards and nav
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Studio Admin Project

//! Session state for the console.
//!
//! One [`SessionStore`] per process, injected at the composition root. Guards
//! and the navigation filter are pure functions over [`SessionSnapshot`].

pub mod store;

pub use store::{SessionPhase, SessionSnapshot, SessionStore};
