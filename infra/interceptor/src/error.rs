//! # Interceptor Errors
//!
//! Only write-path failures surface as errors. Read-path problems are recovered per
//! field and reported through [`ReadReport`](crate::ReadReport).

use chub_vault::VaultError;
use std::borrow::Cow;

#[chub_derive::chub_error]
pub enum InterceptorError {
    /// The cipher refused to seal a field. The write must not proceed.
    #[error("Field encryption failed{}: {source}", format_context(.context))]
    Vault { source: VaultError, context: Option<Cow<'static, str>> },

    /// No tenant could be resolved for a payload under [`TenantPolicy::Strict`](chub_domain::config::TenantPolicy).
    #[error("Missing tenant{}: {message}", format_context(.context))]
    MissingTenant { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Record not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The backing store rejected the operation.
    #[error("Store error{}: {message}", format_context(.context))]
    Store { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A blocking cipher job panicked.
    #[error("Worker error{}: {source}", format_context(.context))]
    Worker { source: tokio::task::JoinError, context: Option<Cow<'static, str>> },

    #[error("Internal interceptor error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl InterceptorError {
    pub(crate) fn store(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Store { message: message.into(), context: None }
    }

    pub(crate) fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::NotFound { message: message.into(), context: None }
    }
}
