//! Shared helpers

pub mod encoding;
pub mod hashing;

pub use encoding::{decode_with_fallback, read_text_with_fallback};
pub use hashing::corpus_fingerprint;
