// ABOUTME: HTTP middleware for the dashboard surface
// ABOUTME: CORS configuration applied at the router root
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Studio Admin Project

/// CORS configuration
pub mod cors;

pub use cors::setup_cors;
