//! Stable fingerprints for report snapshots

use sha2::{Digest, Sha256};

/// Fingerprint a document set independent of fetch order.
///
/// Ids are sorted before hashing, so the same corpus yields the same value
/// however the API paginates it.
pub fn corpus_fingerprint<'a, I>(ids: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut sorted: Vec<&str> = ids.into_iter().collect();
    sorted.sort_unstable();

    let mut hasher = Sha256::new();
    for id in sorted {
        hasher.update(id.as_bytes());
        hasher.update(b"\n");
    }
    let result = hasher.finalize();
    format!("{:x}", result)[..16].to_string()
}
