//! Shared setup for the Naqlah end-to-end tests.
//!
//! Builds the full router with a fixed configuration: the default OTP codes
//! and map services pointed at a closed local port so lookups fail fast and
//! fall back. Most tests run in memory without rate limiting; the limiter
//! is checked over a real socket, which is what supplies peer addresses.

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::http::StatusCode;
use axum_test::TestServer;
use naqlah_web::{app::build_router, config::WebConfig, state::AppState};

/// Code accepted by the default OTP policy.
pub const VALID_OTP: &str = "123456";

/// A registered customer number.
pub const EXISTING_PHONE: &str = "512345678";

/// A number ending in `000`, treated as unregistered.
pub const NEW_PHONE: &str = "512345000";

fn test_config(rate_limit: bool) -> WebConfig {
    let vars: HashMap<&str, String> = HashMap::from([
        ("NAQLAH_RATE_LIMIT", rate_limit.to_string()),
        (
            "NAQLAH_STATIC_DIR",
            concat!(env!("CARGO_MANIFEST_DIR"), "/../web/static").to_owned(),
        ),
        ("GEOCODER_BASE_URL", "http://127.0.0.1:9".to_owned()),
        ("ROUTER_BASE_URL", "http://127.0.0.1:9".to_owned()),
    ]);

    WebConfig::from_lookup(|key| vars.get(key).cloned()).expect("test config is valid")
}

/// A server that keeps cookies between requests, like a browser tab.
#[must_use]
pub fn test_server() -> TestServer {
    let state = AppState::new(test_config(false)).expect("geo client builds");
    let mut server = TestServer::new(build_router(state)).expect("test server starts");
    server.save_cookies();
    server
}

/// A server on a local port with the login rate limiter on, served the way
/// the binary serves it.
#[must_use]
pub fn rate_limited_server() -> TestServer {
    let state = AppState::new(test_config(true)).expect("geo client builds");
    let app = build_router(state).into_make_service_with_connect_info::<SocketAddr>();
    TestServer::builder()
        .save_cookies()
        .http_transport()
        .build(app)
        .expect("test server starts")
}

/// Complete the phone and OTP steps.
pub async fn log_in(server: &TestServer, phone: &str) {
    server
        .post("/auth/login")
        .form(&[("phone", phone), ("account_type", "customer")])
        .await
        .assert_status(StatusCode::SEE_OTHER);
    server
        .post("/auth/otp")
        .form(&[("otp", VALID_OTP)])
        .await
        .assert_status(StatusCode::SEE_OTHER);
}
