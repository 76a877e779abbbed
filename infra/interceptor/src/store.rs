use crate::error::InterceptorError;
use crate::interceptor::FieldInterceptor;
use crate::operation::{ReadOutcome, ReadQuery, WriteOp, WriteOutcome};
use chub_domain::SensitiveRecord;
use tracing::warn;

/// A persistence backend for one record type.
pub trait RecordStore<R: SensitiveRecord>: Send + Sync {
    fn write(
        &self,
        op: WriteOp<R>,
    ) -> impl Future<Output = Result<WriteOutcome<R>, InterceptorError>> + Send;

    fn read(
        &self,
        query: ReadQuery,
    ) -> impl Future<Output = Result<ReadOutcome<R>, InterceptorError>> + Send;
}

/// Wraps a backend so that registered fields are ciphertext at rest and plaintext
/// for the caller.
#[derive(Debug, Clone)]
pub struct EncryptedStore<S> {
    store: S,
    interceptor: FieldInterceptor,
}

impl<S> EncryptedStore<S> {
    pub const fn new(store: S, interceptor: FieldInterceptor) -> Self {
        Self { store, interceptor }
    }

    /// The wrapped backend. Reads through it return stored values as-is.
    pub const fn inner(&self) -> &S {
        &self.store
    }

    pub const fn interceptor(&self) -> &FieldInterceptor {
        &self.interceptor
    }
}

impl<R, S> RecordStore<R> for EncryptedStore<S>
where
    R: SensitiveRecord,
    S: RecordStore<R>,
{
    fn write(
        &self,
        mut op: WriteOp<R>,
    ) -> impl Future<Output = Result<WriteOutcome<R>, InterceptorError>> + Send {
        async move {
            let action = op.action();
            self.interceptor.before_write(&mut op).await?;
            let mut outcome = self.store.write(op).await?;
            let report = self.interceptor.after_read(outcome.records_mut()).await;
            if !report.is_clean() {
                warn!(entity = R::ENTITY, %action, failures = report.failures.len(), "Returned record kept undecryptable fields");
            }
            Ok(outcome)
        }
    }

    fn read(
        &self,
        query: ReadQuery,
    ) -> impl Future<Output = Result<ReadOutcome<R>, InterceptorError>> + Send {
        async move {
            let action = query.action();
            let mut outcome = self.store.read(query).await?;
            let report = self.interceptor.after_read(outcome.records_mut()).await;
            if !report.is_clean() {
                warn!(entity = R::ENTITY, %action, failures = report.failures.len(), "Read returned undecryptable fields");
            }
            Ok(outcome)
        }
    }
}
