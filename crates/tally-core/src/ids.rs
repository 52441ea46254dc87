//! ObjectId-shaped identifiers.
//!
//! Every stored entity gets a 24-character lowercase hex id: 8 hex chars of
//! creation time (seconds since epoch) followed by 16 random hex chars. IDs are
//! minted by `tally-db` inside SQL; this module only checks their shape.

use crate::errors::CoreError;

/// Length of an identifier in hex characters (12 bytes).
pub const OBJECT_ID_LEN: usize = 24;

/// True iff `id` is exactly 24 ASCII hex digits (either case).
#[must_use]
pub fn is_valid_object_id(id: &str) -> bool {
    id.len() == OBJECT_ID_LEN && id.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Same check as [`is_valid_object_id`], as a `Result` for `?` chains.
///
/// # Errors
///
/// Returns `CoreError::InvalidId` when the shape check fails.
pub fn ensure_object_id(id: &str) -> Result<(), CoreError> {
    if is_valid_object_id(id) {
        Ok(())
    } else {
        Err(CoreError::InvalidId(id.to_string()))
    }
}
