//! HTTP middleware for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. CORS, when `STOREFRONT_ALLOWED_ORIGIN` is set
//! 3. `TraceLayer` (request span)
//! 4. Request ID (recorded on the span and echoed in the response)

pub mod request_id;

pub use request_id::request_id_middleware;
