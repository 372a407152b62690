// ABOUTME: Application constants and configuration values
// ABOUTME: Centralizes service names, defaults, and limits used across modules
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Studio Admin Project

//! Application-wide constants

/// Service identification names
pub mod service_names {
    /// Service name used in logging and health output
    pub const STUDIO_ADMIN: &str = "studio-admin";
}

/// Default configuration values
pub mod defaults {
    /// Default HTTP port for the dashboard server
    pub const HTTP_PORT: u16 = 8780;

    /// Default request timeout for hosted-backend calls, in seconds
    pub const BACKEND_TIMEOUT_SECS: u64 = 30;

    /// Default connect timeout for hosted-backend calls, in seconds
    pub const BACKEND_CONNECT_TIMEOUT_SECS: u64 = 10;

    /// Default login entry point the auth guard redirects to
    pub const LOGIN_PATH: &str = "/login";
}

/// Limits applied to list queries proxied to the hosted backend
pub mod limits {
    /// Maximum rows a single list query may request
    pub const MAX_PAGE_SIZE: u32 = 200;

    /// Default rows per list query when the caller does not specify
    pub const DEFAULT_PAGE_SIZE: u32 = 50;
}

/// Names of the serverless user-creation functions on the hosted backend
pub mod function_names {
    /// Function that provisions staff accounts (admin, coach)
    pub const CREATE_STAFF_USER: &str = "create-staff-user";

    /// Function that provisions member accounts
    pub const CREATE_MEMBER_USER: &str = "create-member-user";
}
