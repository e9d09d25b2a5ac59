//! Rolling XOR cipher for the string pool
//!
//! Both directions feed back the *ciphertext* byte: encryption feeds back what
//! it just produced, decryption feeds back what it just consumed.

/// Fixed 16-byte key
pub const KEY: [u8; 16] = [
    0xCF, 0xCE, 0xFB, 0xF8, 0xEC, 0x0A, 0x33, 0x66, 0x93, 0xA9, 0x1D, 0x93, 0x50, 0x39, 0x5F, 0x09,
];

/// Encrypt a buffer in place
pub fn encrypt_in_place(data: &mut [u8]) {
    let mut prev = 0u8;
    for (i, byte) in data.iter_mut().enumerate() {
        *byte ^= prev ^ KEY[i & 0xF];
        prev = *byte;
    }
}

/// Decrypt a buffer in place
pub fn decrypt_in_place(data: &mut [u8]) {
    let mut prev = 0u8;
    for (i, byte) in data.iter_mut().enumerate() {
        let current = *byte;
        *byte = current ^ prev ^ KEY[i & 0xF];
        prev = current;
    }
}

#[must_use]
pub fn encrypt(data: &[u8]) -> Vec<u8> {
    let mut out = data.to_vec();
    encrypt_in_place(&mut out);
    out
}

#[must_use]
pub fn decrypt(data: &[u8]) -> Vec<u8> {
    let mut out = data.to_vec();
    decrypt_in_place(&mut out);
    out
}
