//! Update builder types for entity mutations.
//!
//! Each builder produces an update struct with `Option` fields. Only `Some`
//! fields generate SET clauses in the dynamic UPDATE SQL; `updated_at` is
//! always refreshed.

pub mod agro;
pub mod bug;
