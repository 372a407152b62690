// ABOUTME: Clients for the hosted backend collaborators (auth, data, functions)
// ABOUTME: Interface-first: traits consumed by the core, reqwest-backed implementations
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Studio Admin Project

//! Hosted-backend collaborators.
//!
//! The console trusts an external hosted platform for authentication, storage
//! with row-level security, and two serverless user-creation functions. The
//! core consumes the [`AuthProvider`] and [`DataProvider`] traits; the
//! `Hosted*` types implement them over the platform's REST surface.

pub mod auth;
pub mod data;
pub mod errors;
pub mod functions;
pub mod http_client;

pub use auth::{AuthProvider, HostedAuthProvider};
pub use data::{DataProvider, HostedDataProvider, PageQuery};
pub use errors::ProviderError;
pub use functions::FunctionsClient;
