//! Entity structs for all Tally domain objects.
//!
//! Each stored entity maps to a table in the libSQL database (see
//! `tally-db/migrations`). Stored entities serialize their identifier under the
//! storage key `_id`; the `New*` structs are the typed records handed to the
//! repositories after request validation.

mod agro;
mod bug;

pub use agro::{AgroListing, NewListing};
pub use bug::{BugReport, NewBug};
