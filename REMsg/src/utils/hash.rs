//! Hashing utilities

/// Seed used by the engine when hashing entry names (`-1` as unsigned)
pub const NAME_HASH_SEED: u32 = 0xFFFF_FFFF;

const C1: u32 = 0xcc9e2d51;
const C2: u32 = 0x1b873593;

/// `MurmurHash3` x86 32-bit
#[must_use]
pub fn murmur3_32(data: &[u8], seed: u32) -> u32 {
    let mut h1 = seed;

    let mut blocks = data.chunks_exact(4);
    for block in &mut blocks {
        let k1 = u32::from_le_bytes([block[0], block[1], block[2], block[3]]);
        h1 ^= mix_k1(k1);
        h1 = h1.rotate_left(13);
        h1 = h1.wrapping_mul(5).wrapping_add(0xe6546b64);
    }

    let tail = blocks.remainder();
    if !tail.is_empty() {
        let mut k1 = 0u32;
        for (i, &byte) in tail.iter().enumerate() {
            k1 ^= u32::from(byte) << (8 * i);
        }
        h1 ^= mix_k1(k1);
    }

    h1 ^= data.len() as u32;
    fmix32(h1)
}

/// Hash of an entry name as stored in hash-identity MSG files
#[must_use]
pub fn hash_name(name: &str) -> u32 {
    murmur3_32(name.as_bytes(), NAME_HASH_SEED)
}

fn mix_k1(k1: u32) -> u32 {
    k1.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2)
}

fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^= h >> 16;
    h
}
