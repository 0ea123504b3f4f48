//! Content-independent file identifiers derived from the candidate URL.

use sha2::{Digest, Sha256};

use super::classify::ImageKind;

/// Lowercase hex SHA-256 of the URL string.
pub fn url_digest(url: &str) -> String {
    hex::encode(Sha256::digest(url.as_bytes()))
}

/// Name of a download: `<digest><ext>`. The temp file starts with it and the final name ends
/// with it.
pub fn temp_file_name(url: &str, kind: ImageKind) -> String {
    format!("{}{}", url_digest(url), kind.extension())
}
