use crate::error::InterceptorError;
use crate::operation::{Filter, ReadOutcome, ReadQuery, WriteOp, WriteOutcome};
use crate::store::RecordStore;
use chub_domain::SensitiveRecord;
use chub_kernel::safe_nanoid;
use parking_lot::RwLock;
use std::fmt;
use std::future::ready;
use std::sync::Arc;
use tracing::trace;

/// An in-process backend holding rows exactly as written.
///
/// Records without an id get a fresh one on create. Updates are patches: only fields
/// set on the payload overwrite the stored row.
pub struct MemoryStore<R> {
    rows: Arc<RwLock<Vec<R>>>,
}

impl<R> Clone for MemoryStore<R> {
    fn clone(&self) -> Self {
        Self { rows: Arc::clone(&self.rows) }
    }
}

impl<R> Default for MemoryStore<R> {
    fn default() -> Self {
        Self { rows: Arc::new(RwLock::new(Vec::new())) }
    }
}

impl<R> fmt::Debug for MemoryStore<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore").field("rows", &self.rows.read().len()).finish()
    }
}

impl<R: SensitiveRecord + Clone> MemoryStore<R> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds rows without going through any interceptor.
    #[must_use]
    pub fn with_rows(rows: impl IntoIterator<Item = R>) -> Self {
        Self { rows: Arc::new(RwLock::new(rows.into_iter().collect())) }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    /// Stored rows, as persisted.
    #[must_use]
    pub fn snapshot(&self) -> Vec<R> {
        self.rows.read().clone()
    }

    fn apply(&self, op: WriteOp<R>) -> Result<WriteOutcome<R>, InterceptorError> {
        let mut rows = self.rows.write();
        match op {
            WriteOp::Create { data } => Ok(WriteOutcome::Record(insert(&mut rows, data))),
            WriteOp::Update { filter, data } => {
                let row = rows
                    .iter_mut()
                    .find(|row| filter.matches(&**row))
                    .ok_or_else(|| missing(R::ENTITY, &filter))?;
                row.merge(data);
                Ok(WriteOutcome::Record(row.clone()))
            }
            WriteOp::Upsert { filter, create, update } => {
                match rows.iter_mut().find(|row| filter.matches(&**row)) {
                    Some(row) => {
                        row.merge(update);
                        Ok(WriteOutcome::Record(row.clone()))
                    }
                    None => Ok(WriteOutcome::Record(insert(&mut rows, create))),
                }
            }
            WriteOp::CreateMany { data } => {
                let count = data.len();
                for record in data {
                    insert(&mut rows, record);
                }
                Ok(WriteOutcome::Count(count))
            }
            WriteOp::UpdateMany { filter, data } => {
                let mut count = 0;
                for row in rows.iter_mut().filter(|row| filter.matches(&**row)) {
                    row.merge(data.clone());
                    count += 1;
                }
                Ok(WriteOutcome::Count(count))
            }
        }
    }

    fn query(&self, query: ReadQuery) -> Result<ReadOutcome<R>, InterceptorError> {
        let rows = self.rows.read();
        match query {
            ReadQuery::FindUnique(filter) => {
                if filter.id.is_none() {
                    return Err(InterceptorError::store(format!(
                        "findUnique on {} requires an id",
                        R::ENTITY
                    )));
                }
                Ok(ReadOutcome::One(rows.iter().find(|row| filter.matches(*row)).cloned()))
            }
            ReadQuery::FindFirst(filter) => {
                Ok(ReadOutcome::One(rows.iter().find(|row| filter.matches(*row)).cloned()))
            }
            ReadQuery::FindMany(filter) => Ok(ReadOutcome::Many(
                rows.iter().filter(|row| filter.matches(*row)).cloned().collect(),
            )),
        }
    }
}

fn insert<R: SensitiveRecord + Clone>(rows: &mut Vec<R>, mut record: R) -> R {
    if record.record_id().is_none() {
        record.assign_id(safe_nanoid!());
    }
    trace!(entity = R::ENTITY, id = record.record_id(), "Row inserted");
    rows.push(record.clone());
    record
}

fn missing(entity: &str, filter: &Filter) -> InterceptorError {
    InterceptorError::not_found(format!(
        "{entity} matching id={:?} tenant={:?}",
        filter.id, filter.tenant_id
    ))
}

impl<R: SensitiveRecord + Clone> RecordStore<R> for MemoryStore<R> {
    fn write(
        &self,
        op: WriteOp<R>,
    ) -> impl Future<Output = Result<WriteOutcome<R>, InterceptorError>> + Send {
        ready(self.apply(op))
    }

    fn read(
        &self,
        query: ReadQuery,
    ) -> impl Future<Output = Result<ReadOutcome<R>, InterceptorError>> + Send {
        ready(self.query(query))
    }
}
