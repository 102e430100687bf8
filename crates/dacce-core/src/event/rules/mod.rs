//! Field formatting and derivation rules for correction events.

pub mod access_key;
pub mod corrections;
pub mod dates;
pub mod patterns;
pub mod tax_id;

pub use access_key::{group_access_key, split_access_key, KeyParts};
pub use corrections::{collect_structured_corrections, join_corrections, CorrectionEntry};
pub use dates::to_local_date_time;
pub use tax_id::{format_tax_id, TaxIdKind};
