//! Repository methods, one module per table, implemented on `TallyService`.

pub mod agro;
pub mod bug;
