//! HTTP middleware stack for the Naqlah web app.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions with a bounded moka store)
//! 5. Security headers (CSP, permissions, frame denial)
//! 6. Rate limiting (governor, login and OTP endpoints only)

pub mod auth;
pub mod preferences;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;
pub mod session_store;

pub use auth::{RequireAuth, clear_current_user, safe_next, set_current_user};
pub use preferences::{Page, load_preferences, update_preferences};
pub use rate_limit::auth_rate_limiter;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::{create_session_layer, remember_login};
