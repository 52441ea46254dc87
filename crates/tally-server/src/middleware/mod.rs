//! Cross-cutting request middleware, wired in [`crate::build_router`].

pub mod cors;
pub mod panic;
pub mod rate_limit;
pub mod request_log;
pub mod security;
