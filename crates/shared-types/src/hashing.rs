//! Hashing primitives shared by every wire format.

use crate::entities::Hash;
use sha2::{Digest, Sha256};

/// Compute SHA-256 of data.
#[inline]
pub fn sha256(data: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute double SHA-256 (SHA-256 of the SHA-256 digest).
///
/// Used for header identity, transaction identity and merkle nodes.
#[inline]
pub fn sha256d(data: &[u8]) -> Hash {
    sha256(&sha256(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_empty() {
        assert_eq!(
            hex::encode(sha256(b"")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_sha256d_is_hash_of_hash() {
        let once = sha256(b"hello");
        assert_eq!(sha256d(b"hello"), sha256(&once));
        assert_eq!(
            hex::encode(sha256d(b"hello")),
            "9595c9df90075148eb06860365df33584b75bff782a510c6cd4883a419833d50"
        );
    }
}
