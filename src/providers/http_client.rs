// ABOUTME: Shared HTTP client with connection pooling for hosted-backend calls
// ABOUTME: Singleton pattern with configurable timeouts initialized at server startup
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Studio Admin Project

use crate::constants::defaults;
use reqwest::{Client, ClientBuilder};
use std::sync::OnceLock;
use std::time::Duration;

/// Configured timeout values for the shared client
static CLIENT_TIMEOUTS: OnceLock<(u64, u64)> = OnceLock::new();

/// Global shared HTTP client with configured timeouts
static SHARED_CLIENT: OnceLock<Client> = OnceLock::new();

/// Initialize the shared HTTP client timeout configuration.
///
/// Must be called once at server startup before any provider is constructed.
/// If not called, reasonable defaults are used.
pub fn initialize_shared_client(timeout_secs: u64, connect_timeout_secs: u64) {
    let _ = CLIENT_TIMEOUTS.set((timeout_secs, connect_timeout_secs));
}

/// Get the shared HTTP client for hosted-backend calls.
///
/// The client uses connection pooling and configured timeouts. Falls back to
/// default timeouts if [`initialize_shared_client`] was not called.
pub fn shared_client() -> &'static Client {
    SHARED_CLIENT.get_or_init(|| {
        let (timeout, connect_timeout) = CLIENT_TIMEOUTS.get().copied().unwrap_or((
            defaults::BACKEND_TIMEOUT_SECS,
            defaults::BACKEND_CONNECT_TIMEOUT_SECS,
        ));

        ClientBuilder::new()
            .timeout(Duration::from_secs(timeout))
            .connect_timeout(Duration::from_secs(connect_timeout))
            .build()
            .unwrap_or_else(|_| Client::new())
    })
}
