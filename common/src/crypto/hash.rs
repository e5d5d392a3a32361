use blake3::hash as blake3_hash;

pub const HASH_SIZE: usize = 32; // 32 bytes / 256 bits

// Hash a byte array using the blake3 algorithm
#[inline(always)]
pub fn hash(value: &[u8]) -> [u8; HASH_SIZE] {
    blake3_hash(value).into()
}

/// Hash several byte slices as one message.
pub fn hash_parts(parts: &[&[u8]]) -> [u8; HASH_SIZE] {
    let mut hasher = blake3::Hasher::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}
