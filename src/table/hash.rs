//! Content fingerprinting for loaded datasets.

use sha2::{Digest, Sha256};

/// Compute the SHA256 fingerprint of a header plus its data rows.
///
/// Every cell is length-prefixed and every row is terminated, so moving a
/// separator between two cells always changes the digest.
/// Returns a 64-character lowercase hexadecimal string.
pub fn grid_hash<R: AsRef<[String]>>(header: &[String], rows: &[R]) -> String {
    let mut hasher = Sha256::new();
    hash_row(&mut hasher, header);
    for row in rows {
        hash_row(&mut hasher, row.as_ref());
    }
    format!("{:x}", hasher.finalize())
}

fn hash_row(hasher: &mut Sha256, row: &[String]) {
    hasher.update((row.len() as u64).to_le_bytes());
    for cell in row {
        hasher.update((cell.len() as u64).to_le_bytes());
        hasher.update(cell.as_bytes());
    }
}
