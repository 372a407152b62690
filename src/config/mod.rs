// ABOUTME: Configuration module for environment-driven settings
// ABOUTME: Re-exports the ServerConfig loaded at startup
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Studio Admin Project

/// Environment-based configuration management
pub mod environment;

pub use environment::ServerConfig;
