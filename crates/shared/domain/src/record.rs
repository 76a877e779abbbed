use serde::{Deserialize, Serialize};

/// A persisted record whose text fields can be addressed by name.
///
/// Implemented by `#[chub_derive::sensitive_model]`; the field interceptor only ever
/// talks to records through this trait, so the registry stays plain data.
pub trait SensitiveRecord: Send + Sync + 'static {
    /// Registry name of the entity.
    const ENTITY: &'static str;
    /// Every optional text field the record exposes by name.
    const TEXT_FIELDS: &'static [&'static str];

    fn record_id(&self) -> Option<&str>;

    /// Sets the primary key. No-op for records without an `id` field.
    fn assign_id(&mut self, id: String);

    /// Tenant carried directly on the record. An empty id is `None`.
    fn tenant_id(&self) -> Option<&str>;

    /// Tenant referenced through a relation-connect clause. An empty id is `None`.
    fn tenant_connect(&self) -> Option<&str>;

    /// Current value of a text field, `None` if unset or not a text field.
    fn text_field(&self, name: &str) -> Option<&str>;

    /// Mutable slot of a text field, `None` if the record has no such field.
    fn text_field_mut(&mut self, name: &str) -> Option<&mut Option<String>>;

    /// Applies every field that is set on `patch`, leaving the others untouched.
    fn merge(&mut self, patch: Self)
    where
        Self: Sized;
}

/// Relation clause pointing a record at its tenant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TenantLink {
    pub connect: Option<RecordRef>,
}

impl TenantLink {
    #[must_use]
    pub fn connect(id: impl Into<String>) -> Self {
        Self { connect: Some(RecordRef { id: id.into() }) }
    }

    #[must_use]
    pub fn connect_id(&self) -> Option<&str> {
        self.connect.as_ref().map(|r| r.id.as_str()).filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRef {
    pub id: String,
}
