//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, outermost)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions with in-process store)

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::Viewer;
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
