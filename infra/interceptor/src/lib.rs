//! Transparent field encryption around record persistence.
//!
//! The [`FieldInterceptor`] sits between callers and a [`RecordStore`]: on the way in
//! it encrypts every registered field of the outgoing payload for the payload's
//! tenant, on the way out it decrypts registered fields of returned records.
//! [`EncryptedStore`] composes both around any backend.
//!
//! ## Failure model
//!
//! * Write path, no tenant: the payload is written in plaintext and a warning is
//!   logged, unless the interceptor runs with [`TenantPolicy::Strict`].
//! * Write path, cipher failure: the write fails.
//! * Read path, any failure: the stored value is returned and the field is listed in
//!   the [`ReadReport`].
//!
//! ## Example
//!
//! ```rust
//! use chub_domain::records::Resident;
//! use chub_interceptor::prelude::*;
//! use chub_vault::{FieldCipher, KdfParams, is_encrypted};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cipher = FieldCipher::builder()
//!     .master_key("k".repeat(64))?
//!     .kdf(KdfParams { log_n: 10, r: 8, p: 1 })
//!     .build()?;
//! let backend = MemoryStore::<Resident>::new();
//! let store = EncryptedStore::new(backend.clone(), FieldInterceptor::builder(cipher).build());
//!
//! let data = Resident {
//!     tenant_id: Some("t-1".into()),
//!     cpf: Some("123.456.789-00".into()),
//!     ..Resident::default()
//! };
//! let created = store.write(WriteOp::Create { data }).await?.into_record().unwrap();
//! assert_eq!(created.cpf.as_deref(), Some("123.456.789-00"));
//! assert!(is_encrypted(backend.snapshot()[0].cpf.as_deref().unwrap()));
//! # Ok(())
//! # }
//! ```

mod error;
mod interceptor;
mod memory;
mod operation;
mod registry;
mod store;

pub use chub_domain::config::TenantPolicy;
pub use error::{InterceptorError, InterceptorErrorExt};
pub use interceptor::{FieldFailure, FieldInterceptor, FieldInterceptorBuilder, ReadReport, WriteReport};
pub use memory::MemoryStore;
pub use operation::{
    Filter, ReadAction, ReadOutcome, ReadQuery, WriteAction, WriteOp, WriteOutcome, resolve_tenant,
};
pub use registry::FieldRegistry;
pub use store::{EncryptedStore, RecordStore};

pub mod prelude {
    pub use crate::error::InterceptorError;
    pub use crate::interceptor::FieldInterceptor;
    pub use crate::memory::MemoryStore;
    pub use crate::operation::{Filter, ReadQuery, WriteOp};
    pub use crate::registry::FieldRegistry;
    pub use crate::store::{EncryptedStore, RecordStore};
    pub use chub_domain::config::TenantPolicy;
}
