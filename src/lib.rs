// ABOUTME: Main library entry point for the Studio Admin console
// ABOUTME: Provides the session/role control plane and the dashboard HTTP surface
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Studio Admin Project

#![deny(unsafe_code)]

//! # Studio Admin
//!
//! Role-gated administration console for a fitness-studio business. Staff
//! authenticate against an external hosted backend (auth service, relational
//! storage with row-level security, serverless user-creation functions); this
//! service owns the session/role control plane and a thin HTTP surface over
//! the studio's screens.
//!
//! ## Architecture
//!
//! - **Providers**: clients for the hosted auth and data collaborators
//! - **Session**: process-wide session store with role resolution
//! - **Guards**: auth/role gating verdicts evaluated per request
//! - **Nav**: static route table filtered by the current role
//! - **Routes**: thin axum handlers proxying parameterized queries
//!
//! ## Example
//!
//! ```rust,no_run
//! use studio_admin::config::environment::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Studio Admin configured with port: HTTP={}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Configuration management from the environment
pub mod config;

/// Application constants: service names, defaults, limits
pub mod constants;

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Route gating: auth guard, role guard, guard chains
pub mod guards;

/// Production logging and structured output
pub mod logging;

/// HTTP middleware: CORS configuration
pub mod middleware;

/// Common data models: roles, sessions, profiles, studio records
pub mod models;

/// Navigation filter over the static route table
pub mod nav;

/// Clients for the hosted backend collaborators (auth, data, functions)
pub mod providers;

/// `HTTP` routes for the dashboard screens
pub mod routes;

/// Session store: the process-wide session/role state machine
pub mod session;
