//! # Domain Models
//!
//! Pure domain types with minimal dependencies (`serde` and the workspace macros).
//! Keep it lean: no I/O, crypto, or heavy logic. Just data, record shapes, and the
//! [`SensitiveRecord`] seam the field interceptor works through.

extern crate self as chub_domain;

pub mod config;
pub mod constants;
pub mod record;
pub mod records;

pub use record::{RecordRef, SensitiveRecord, TenantLink};
