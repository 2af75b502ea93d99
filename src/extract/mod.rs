//! Metadata extraction: field decoding, dates, and record normalization.

pub mod field;
pub mod record;
pub mod temporal;

pub use field::{normalize, normalize_str, FieldValue};
pub use record::{record_from_document, MetadataFields, RequesterRow};
pub use temporal::{extract_year, is_recent, parse_date};
