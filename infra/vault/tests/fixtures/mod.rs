use chub_vault::prelude::*;

pub const MASTER_KEY: &str = "0f1e2d3c4b5a69788796a5b4c3d2e1f00f1e2d3c4b5a69788796a5b4c3d2e1f0";

/// Cheap scrypt parameters so property tests stay fast.
pub const TEST_KDF: KdfParams = KdfParams { log_n: 8, r: 8, p: 1 };

/// Initializes a cipher with the shared test key and cheap derivation.
/// # Panics
/// * If the cipher cannot be built.
#[must_use]
pub fn setup_cipher() -> FieldCipher {
    FieldCipher::builder()
        .master_key(MASTER_KEY)
        .unwrap()
        .kdf(TEST_KDF)
        .build()
        .expect("Cipher setup failed")
}

/// Flips one hex digit at `index`, keeping the value well-formed.
#[must_use]
pub fn flip_hex_digit(value: &str, index: usize) -> String {
    let mut bytes = value.as_bytes().to_vec();
    bytes[index] = if bytes[index] == b'0' { b'1' } else { b'0' };
    String::from_utf8(bytes).unwrap()
}
