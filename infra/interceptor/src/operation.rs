//! Persistence operations as seen by the interceptor.
//!
//! A backend receives the same [`WriteOp`] and [`ReadQuery`] values after the
//! interceptor has rewritten their payloads.

use chub_domain::SensitiveRecord;
use std::fmt;
use std::sync::Arc;

/// Record selector: by primary key, by tenant, or both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub id: Option<String>,
    pub tenant_id: Option<String>,
}

impl Filter {
    #[must_use]
    pub fn by_id(id: impl Into<String>) -> Self {
        Self { id: Some(id.into()), tenant_id: None }
    }

    #[must_use]
    pub fn by_tenant(tenant_id: impl Into<String>) -> Self {
        Self { id: None, tenant_id: Some(tenant_id.into()) }
    }

    #[must_use]
    pub fn tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    /// Every criterion that is set must equal the record's value.
    #[must_use]
    pub fn matches<R: SensitiveRecord>(&self, record: &R) -> bool {
        let id_ok = self.id.as_deref().is_none_or(|id| record.record_id() == Some(id));
        let tenant_ok =
            self.tenant_id.as_deref().is_none_or(|tenant| record.tenant_id() == Some(tenant));
        id_ok && tenant_ok
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteAction {
    Create,
    Update,
    Upsert,
    CreateMany,
    UpdateMany,
}

impl WriteAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Upsert => "upsert",
            Self::CreateMany => "createMany",
            Self::UpdateMany => "updateMany",
        }
    }
}

impl fmt::Display for WriteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadAction {
    FindUnique,
    FindFirst,
    FindMany,
}

impl ReadAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FindUnique => "findUnique",
            Self::FindFirst => "findFirst",
            Self::FindMany => "findMany",
        }
    }
}

impl fmt::Display for ReadAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A write against one entity.
///
/// Update payloads are patches: only the fields that are set are applied.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp<R> {
    Create { data: R },
    Update { filter: Filter, data: R },
    Upsert { filter: Filter, create: R, update: R },
    CreateMany { data: Vec<R> },
    UpdateMany { filter: Filter, data: R },
}

impl<R: SensitiveRecord> WriteOp<R> {
    #[must_use]
    pub const fn action(&self) -> WriteAction {
        match self {
            Self::Create { .. } => WriteAction::Create,
            Self::Update { .. } => WriteAction::Update,
            Self::Upsert { .. } => WriteAction::Upsert,
            Self::CreateMany { .. } => WriteAction::CreateMany,
            Self::UpdateMany { .. } => WriteAction::UpdateMany,
        }
    }

    #[must_use]
    pub const fn filter(&self) -> Option<&Filter> {
        match self {
            Self::Update { filter, .. } | Self::Upsert { filter, .. } | Self::UpdateMany { filter, .. } => {
                Some(filter)
            }
            Self::Create { .. } | Self::CreateMany { .. } => None,
        }
    }

    /// Tenant the whole operation runs under.
    ///
    /// Looks at the payload's own tenant field, then the filter, then the payload's
    /// tenant connect clause. For an upsert both payloads are consulted at each step,
    /// create first. Bulk creates have no operation-wide tenant: see
    /// [`resolve_tenant`] per record.
    #[must_use]
    pub fn tenant_id(&self) -> Option<&str> {
        match self {
            Self::Create { data } => resolve_tenant(data, None),
            Self::Update { filter, data } | Self::UpdateMany { filter, data } => {
                resolve_tenant(data, Some(filter))
            }
            Self::Upsert { filter, create, update } => non_empty(create.tenant_id())
                .or_else(|| non_empty(update.tenant_id()))
                .or_else(|| non_empty(filter.tenant_id.as_deref()))
                .or_else(|| non_empty(create.tenant_connect()))
                .or_else(|| non_empty(update.tenant_connect())),
            Self::CreateMany { .. } => None,
        }
    }

    /// Consumes the operation, returning its payloads in order.
    #[must_use]
    pub fn into_payloads(self) -> Vec<R> {
        match self {
            Self::Create { data } | Self::Update { data, .. } | Self::UpdateMany { data, .. } => {
                vec![data]
            }
            Self::Upsert { create, update, .. } => vec![create, update],
            Self::CreateMany { data } => data,
        }
    }

    /// Outgoing payloads paired with the tenant they are encrypted for.
    pub(crate) fn payloads_mut(&mut self) -> Vec<(&mut R, Option<Arc<str>>)> {
        let shared = self.tenant_id().map(Arc::<str>::from);
        match self {
            Self::Create { data } | Self::Update { data, .. } | Self::UpdateMany { data, .. } => {
                vec![(data, shared)]
            }
            Self::Upsert { create, update, .. } => vec![(create, shared.clone()), (update, shared)],
            Self::CreateMany { data } => data
                .iter_mut()
                .map(|record| {
                    let tenant = resolve_tenant(&*record, None).map(Arc::<str>::from);
                    (record, tenant)
                })
                .collect(),
        }
    }
}

/// Tenant of a single payload: its tenant field, the filter's tenant, its connect clause.
/// Empty ids are skipped at every step.
#[must_use]
pub fn resolve_tenant<'a, R: SensitiveRecord>(
    payload: &'a R,
    filter: Option<&'a Filter>,
) -> Option<&'a str> {
    non_empty(payload.tenant_id())
        .or_else(|| non_empty(filter.and_then(|f| f.tenant_id.as_deref())))
        .or_else(|| non_empty(payload.tenant_connect()))
}

#[inline]
pub(crate) fn non_empty(tenant: Option<&str>) -> Option<&str> {
    tenant.filter(|t| !t.is_empty())
}

/// A read against one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadQuery {
    FindUnique(Filter),
    FindFirst(Filter),
    FindMany(Filter),
}

impl ReadQuery {
    #[must_use]
    pub const fn action(&self) -> ReadAction {
        match self {
            Self::FindUnique(_) => ReadAction::FindUnique,
            Self::FindFirst(_) => ReadAction::FindFirst,
            Self::FindMany(_) => ReadAction::FindMany,
        }
    }

    #[must_use]
    pub const fn filter(&self) -> &Filter {
        match self {
            Self::FindUnique(filter) | Self::FindFirst(filter) | Self::FindMany(filter) => filter,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome<R> {
    One(Option<R>),
    Many(Vec<R>),
}

impl<R> ReadOutcome<R> {
    pub fn records_mut(&mut self) -> &mut [R] {
        match self {
            Self::One(Some(record)) => std::slice::from_mut(record),
            Self::One(None) => &mut [],
            Self::Many(records) => records,
        }
    }

    #[must_use]
    pub fn into_one(self) -> Option<R> {
        match self {
            Self::One(record) => record,
            Self::Many(records) => records.into_iter().next(),
        }
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<R> {
        match self {
            Self::One(record) => record.into_iter().collect(),
            Self::Many(records) => records,
        }
    }
}

/// What a backend returns for a write: the written record, or a row count for bulk ops.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOutcome<R> {
    Record(R),
    Count(usize),
}

impl<R> WriteOutcome<R> {
    pub fn records_mut(&mut self) -> &mut [R] {
        match self {
            Self::Record(record) => std::slice::from_mut(record),
            Self::Count(_) => &mut [],
        }
    }

    #[must_use]
    pub fn into_record(self) -> Option<R> {
        match self {
            Self::Record(record) => Some(record),
            Self::Count(_) => None,
        }
    }

    #[must_use]
    pub const fn count(&self) -> usize {
        match self {
            Self::Record(_) => 1,
            Self::Count(count) => *count,
        }
    }
}
