#![forbid(unsafe_code)]

use sha2::{Digest, Sha256};

use crate::record::{ControllerId, RecordValue, StorageHash};

/// `SHA-256(controller ++ storage_hash)`.
///
/// Byte order is part of the commitment scheme: controller identity first, then the storage
/// hash, with no separator or domain tag. Changing it invalidates every stored commitment.
pub fn commit_preimages(controller: &ControllerId, storage_hash: &StorageHash) -> RecordValue {
    let mut hasher = Sha256::new();
    hasher.update(controller.as_bytes());
    hasher.update(storage_hash.as_bytes());
    RecordValue(hasher.finalize().into())
}

/// Content hash for raw record content, for callers that keep content off-store.
pub fn storage_hash_of(content: &[u8]) -> StorageHash {
    StorageHash(Sha256::digest(content).into())
}
