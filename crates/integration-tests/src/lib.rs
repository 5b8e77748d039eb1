//! Integration tests for Tamarind.
//!
//! # Test Categories
//!
//! - In-process router tests (`tests/router_auth.rs`) exercise routing, the
//!   error envelope, and token gating against the real router with a lazy
//!   database pool - no infrastructure required. They only cover paths that
//!   never reach the store.
//! - Full-stack tests (`tests/scenario.rs`) run the register/login/cart
//!   scenario over HTTP and are `#[ignore]`d because they need a running
//!   server and database:
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p tamarind-cli -- migrate
//!
//! # Start the API, then:
//! cargo test -p tamarind-integration-tests -- --ignored
//! ```

use axum::Router;
use secrecy::SecretString;

use tamarind_api::config::ApiConfig;
use tamarind_api::state::AppState;
use tamarind_core::Email;

/// Signing secret used by in-process tests.
pub const TEST_JWT_SECRET: &str = "integration-test-signing-key-0123456789";

/// A config pointing at a database that is never reached.
///
/// # Panics
///
/// Panics if the allow-list contains an invalid email.
#[must_use]
pub fn test_config(admin_emails: &[&str]) -> ApiConfig {
    ApiConfig {
        // Port 9 (discard) - the lazy pool never connects in these tests.
        database_url: SecretString::from("postgres://localhost:9/unused"),
        host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
        port: 0,
        jwt_secret: SecretString::from(TEST_JWT_SECRET),
        admin_emails: admin_emails
            .iter()
            .map(|e| Email::parse(e).expect("valid test email"))
            .collect(),
        cors_origins: Vec::new(),
        sentry_dsn: None,
    }
}

/// Build the application router with a lazy pool.
///
/// # Panics
///
/// Panics if the pool cannot be constructed from the test URL.
#[must_use]
pub fn test_app(admin_emails: &[&str]) -> Router {
    let config = test_config(admin_emails);
    let pool = tamarind_api::db::create_pool_lazy(&config.database_url)
        .expect("lazy pool from test URL");
    tamarind_api::app(AppState::new(config, pool))
}
