//! # Vault Errors
//!
//! This module defines the [`VaultError`] enum used throughout the vault crate for
//! reporting key, cipher, and framing failures.

use std::borrow::Cow;

/// A specialized [`VaultError`] enum for field encryption failures.
#[chub_derive::chub_error]
pub enum VaultError {
    /// The master secret is shorter than the required 64 characters.
    #[error("Master key too short{}: {message}", format_context(.context))]
    KeyTooShort { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Key derivation or sealing failed. No partial output is produced.
    #[error("Encryption failed{}: {message}", format_context(.context))]
    EncryptionFailed { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Authentication failed or the plaintext is not UTF-8.
    ///
    /// This usually indicates a wrong tenant, a wrong master key, or tampered data.
    #[error("Decryption failed{}: {message}", format_context(.context))]
    DecryptionFailed { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The value is not a well-formed `salt:nonce:tag:ciphertext` string.
    #[error("Invalid format{}: {message}", format_context(.context))]
    InvalidFormat { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Failure when the cipher is incorrectly configured.
    #[error("Invalid configuration{}: {message}", format_context(.context))]
    InvalidConfiguration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal vault error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl VaultError {
    pub(crate) fn encryption(message: impl Into<Cow<'static, str>>) -> Self {
        Self::EncryptionFailed { message: message.into(), context: None }
    }

    pub(crate) fn decryption(message: impl Into<Cow<'static, str>>) -> Self {
        Self::DecryptionFailed { message: message.into(), context: None }
    }

    pub(crate) fn format(message: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidFormat { message: message.into(), context: None }
    }
}
