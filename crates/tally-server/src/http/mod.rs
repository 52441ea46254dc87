//! Route handlers and the error-to-response mapping.

pub mod agro;
pub mod body;
pub mod bugs;
pub mod error;
pub mod meta;
