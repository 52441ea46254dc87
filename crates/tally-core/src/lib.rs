//! # tally-core
//!
//! Core types, validation rules, ID helpers, and response shaping for Tally.
//!
//! This crate provides the foundational types shared across all Tally crates:
//! - Entity structs for bug reports and agro listings
//! - Closed enums for bug status and priority
//! - ObjectId-shaped identifier checks
//! - Field validation and sanitization for incoming request bodies
//! - Wire response types and the bug response formatter
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod responses;
pub mod validation;
