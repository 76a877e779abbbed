use crate::error::VaultError;
use aead::consts::U16;
use aes_gcm::AesGcm;
use aes_gcm::aes::Aes256;
use std::fmt;
use std::str::FromStr;

// --- Aliases ---

/// AES-256-GCM with a 128-bit nonce, matching the stored format.
pub type FieldAes = AesGcm<Aes256, U16>;

// --- Format constants ---

/// Random salt fed to scrypt, per value.
pub const SALT_LEN: usize = 64;

/// AEAD nonce length (128-bit).
pub const NONCE_LEN: usize = 16;

/// AEAD tag length (128-bit).
pub const TAG_LEN: usize = 16;

/// Derived AES-256 key length.
pub const KEY_LEN: usize = 32;

pub const DELIMITER: char = ':';

const SALT_HEX_LEN: usize = SALT_LEN * 2;
const NONCE_HEX_LEN: usize = NONCE_LEN * 2;
const TAG_HEX_LEN: usize = TAG_LEN * 2;

// --- Container ---

/// A parsed Encrypted Field Value.
///
/// Stored as four lowercase hex parts:
///
/// ```text
/// salt(128):nonce(32):tag(32):ciphertext(2n)
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptedField {
    salt: [u8; SALT_LEN],
    nonce: [u8; NONCE_LEN],
    tag: [u8; TAG_LEN],
    ciphertext: Vec<u8>,
}

impl EncryptedField {
    pub(crate) const fn new(
        salt: [u8; SALT_LEN],
        nonce: [u8; NONCE_LEN],
        tag: [u8; TAG_LEN],
        ciphertext: Vec<u8>,
    ) -> Self {
        Self { salt, nonce, tag, ciphertext }
    }

    #[must_use]
    pub const fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    #[must_use]
    pub const fn nonce(&self) -> &[u8; NONCE_LEN] {
        &self.nonce
    }

    #[must_use]
    pub const fn tag(&self) -> &[u8; TAG_LEN] {
        &self.tag
    }

    #[must_use]
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Length in characters of the serialized form.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        SALT_HEX_LEN + NONCE_HEX_LEN + TAG_HEX_LEN + self.ciphertext.len() * 2 + 3
    }
}

impl fmt::Display for EncryptedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}",
            hex::encode(self.salt),
            hex::encode(self.nonce),
            hex::encode(self.tag),
            hex::encode(&self.ciphertext)
        )
    }
}

impl fmt::Debug for EncryptedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptedField")
            .field("salt", &hex::encode(&self.salt[..4]))
            .field("nonce", &hex::encode(self.nonce))
            .field("tag", &hex::encode(self.tag))
            .field("ciphertext_len", &self.ciphertext.len())
            .finish_non_exhaustive()
    }
}

impl FromStr for EncryptedField {
    type Err = VaultError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = value.split(DELIMITER).collect();
        let [salt_hex, nonce_hex, tag_hex, ciphertext_hex] = parts.as_slice() else {
            return Err(VaultError::InvalidFormat {
                message: "Expected salt:nonce:tag:ciphertext".into(),
                context: Some(format!("{} parts", parts.len()).into()),
            });
        };

        let mut salt = [0u8; SALT_LEN];
        let mut nonce = [0u8; NONCE_LEN];
        let mut tag = [0u8; TAG_LEN];
        decode_part(salt_hex, &mut salt, "salt")?;
        decode_part(nonce_hex, &mut nonce, "nonce")?;
        decode_part(tag_hex, &mut tag, "tag")?;

        if ciphertext_hex.is_empty() {
            return Err(VaultError::format("Ciphertext is empty"));
        }
        let ciphertext = hex::decode(ciphertext_hex).map_err(|e| VaultError::InvalidFormat {
            message: e.to_string().into(),
            context: Some("ciphertext".into()),
        })?;

        Ok(Self { salt, nonce, tag, ciphertext })
    }
}

fn decode_part(hex_part: &str, out: &mut [u8], part: &'static str) -> Result<(), VaultError> {
    hex::decode_to_slice(hex_part, out).map_err(|e| VaultError::InvalidFormat {
        message: e.to_string().into(),
        context: Some(part.into()),
    })
}

/// Structural check for an Encrypted Field Value.
///
/// Four colon-separated hex parts (either case) of 128, 32 and 32 characters,
/// followed by a non-empty ciphertext of even length. Never touches key material.
#[must_use]
pub fn is_encrypted(value: &str) -> bool {
    let mut parts = value.split(DELIMITER);
    let (Some(salt), Some(nonce), Some(tag), Some(ciphertext), None) =
        (parts.next(), parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    salt.len() == SALT_HEX_LEN
        && nonce.len() == NONCE_HEX_LEN
        && tag.len() == TAG_HEX_LEN
        && !ciphertext.is_empty()
        && ciphertext.len().is_multiple_of(2)
        && [salt, nonce, tag, ciphertext].iter().all(|p| p.bytes().all(|b| b.is_ascii_hexdigit()))
}
