use chub_domain::SensitiveRecord;
use chub_domain::config::{RegistryEntry, default_registry};
use fxhash::FxHashMap;

/// Which fields of which entity are encrypted at rest.
///
/// Plain data, loaded once at start. Entities listed twice have their field lists
/// merged; duplicate field names are dropped, first occurrence wins the position.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    fields: FxHashMap<String, Vec<String>>,
    order: Vec<String>,
}

impl FieldRegistry {
    /// A registry with no entities. Nothing is encrypted.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The production registry.
    #[must_use]
    pub fn production() -> Self {
        Self::from_entries(&default_registry())
    }

    #[must_use]
    pub fn from_entries(entries: &[RegistryEntry]) -> Self {
        entries.iter().fold(Self::empty(), |registry, entry| {
            registry.register(entry.entity.as_str(), entry.fields.iter().map(String::as_str))
        })
    }

    /// Adds `fields` to `entity`.
    #[must_use]
    pub fn register<'a>(
        mut self,
        entity: impl Into<String>,
        fields: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let entity = entity.into();
        if !self.fields.contains_key(&entity) {
            self.order.push(entity.clone());
        }
        let known = self.fields.entry(entity).or_default();
        for field in fields {
            if !known.iter().any(|f| f == field) {
                known.push(field.to_owned());
            }
        }
        self
    }

    /// Registered fields of `entity`, in registration order.
    ///
    /// `None` for unknown entities and for entities registered without fields.
    #[must_use]
    pub fn fields_for(&self, entity: &str) -> Option<&[String]> {
        self.fields.get(entity).map(Vec::as_slice).filter(|f| !f.is_empty())
    }

    #[must_use]
    pub fn is_registered(&self, entity: &str) -> bool {
        self.fields_for(entity).is_some()
    }

    /// Entities with their fields, in registration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.order
            .iter()
            .filter_map(|entity| self.fields.get(entity).map(|f| (entity.as_str(), f.as_slice())))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Registered fields of `R` that the record type cannot hold as text.
    ///
    /// Such fields are silently ignored at runtime; callers use this to reject a
    /// misconfigured registry at start.
    #[must_use]
    pub fn unknown_fields<R: SensitiveRecord>(&self) -> Vec<&str> {
        self.fields_for(R::ENTITY)
            .unwrap_or_default()
            .iter()
            .map(String::as_str)
            .filter(|field| !R::TEXT_FIELDS.contains(field))
            .collect()
    }
}
