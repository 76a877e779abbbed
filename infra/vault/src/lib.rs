//! Tenant-scoped, authenticated encryption of individual text fields.
//!
//! This crate knows nothing about records or persistence: it turns one string into
//! one Encrypted Field Value and back, for one tenant.
//!
//! ## Value Format
//!
//! Values are stored as four hex parts separated by colons:
//!
//! ```text
//! salt(64 bytes):nonce(16 bytes):tag(16 bytes):ciphertext(N bytes)
//! ```
//!
//! The cipher is AES-256-GCM with a 128-bit nonce and no associated data. The key
//! is derived per value with scrypt (`N = 16384, r = 8, p = 1`, 32 bytes) over the
//! password `"{master}:{tenant}"` and the value's salt. Values produced this way are
//! byte-compatible with other implementations of the same scheme.
//!
//! ## Guarantees
//!
//! * Encrypting the same plaintext twice never yields the same value.
//! * A value only decrypts under the master key and tenant that produced it;
//!   anything else, including a flipped bit anywhere, is [`VaultError::DecryptionFailed`].
//! * Values that are not shaped like an Encrypted Field Value pass through
//!   [`FieldCipher::decrypt`] unchanged, so legacy plaintext rows stay readable.
//!
//! ## Cost
//!
//! Every call runs one scrypt derivation (16 MiB, tens of milliseconds). Callers on
//! an async runtime should move the work to a blocking pool. An optional bounded
//! cache keyed by `(tenant, salt)` skips re-derivation for values read repeatedly.
//!
//! ## Examples
//!
//! ```rust
//! use chub_vault::prelude::*;
//!
//! # fn main() -> Result<(), VaultError> {
//! let cipher = FieldCipher::builder()
//!     .master_key("a".repeat(64))?
//!     .kdf(KdfParams { log_n: 10, r: 8, p: 1 })
//!     .build()?;
//!
//! let first = cipher.encrypt("123.456.789-00", "t-1")?.expect("non-empty");
//! let second = cipher.encrypt("123.456.789-00", "t-1")?.expect("non-empty");
//! assert_ne!(first, second);
//!
//! let stored = first.to_string();
//! assert_eq!(cipher.decrypt(stored.as_str(), "t-1")?.as_deref(), Some("123.456.789-00"));
//! assert!(cipher.decrypt(stored.as_str(), "t-2").is_err());
//! # Ok(())
//! # }
//! ```

mod builder;
mod engine;
mod error;
mod key;
mod types;

pub use builder::FieldCipherBuilder;
pub use engine::FieldCipher;
pub use error::{VaultError, VaultErrorExt};
pub use key::{KdfParams, MIN_MASTER_KEY_LEN, MasterKey};
pub use types::{EncryptedField, is_encrypted};

pub mod prelude {
    pub use crate::engine::FieldCipher;
    pub use crate::error::{VaultError, VaultErrorExt};
    pub use crate::key::{KdfParams, MasterKey};
    pub use crate::types::{EncryptedField, is_encrypted};
}

pub mod format {
    pub use crate::types::{DELIMITER, FieldAes, KEY_LEN, NONCE_LEN, SALT_LEN, TAG_LEN};
}
