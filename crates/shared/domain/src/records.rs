//! Records that carry sensitive text.
//!
//! Field names are the ones listed in the default registry; serialized JSON uses
//! camelCase to match the persistence layer.

use crate::record::TenantLink;
use chub_derive::sensitive_model;

/// A person living in the facility.
#[sensitive_model(entity = "Resident")]
pub struct Resident {
    pub id: Option<String>,
    pub tenant_id: Option<String>,
    pub tenant: Option<TenantLink>,
    pub full_name: Option<String>,
    pub birth_date: Option<String>,
    pub cpf: Option<String>,
    pub rg: Option<String>,
    pub cns: Option<String>,
    pub legal_guardian_name: Option<String>,
    pub legal_guardian_cpf: Option<String>,
    pub legal_guardian_rg: Option<String>,
    pub room: Option<String>,
}

/// A diagnosed condition.
#[sensitive_model(entity = "Condition")]
pub struct Condition {
    pub id: Option<String>,
    pub tenant_id: Option<String>,
    pub tenant: Option<TenantLink>,
    pub resident_id: Option<String>,
    pub name: Option<String>,
    pub icd10_code: Option<String>,
    pub notes: Option<String>,
    pub active: Option<bool>,
}

#[sensitive_model(entity = "Allergy")]
pub struct Allergy {
    pub id: Option<String>,
    pub tenant_id: Option<String>,
    pub tenant: Option<TenantLink>,
    pub resident_id: Option<String>,
    pub allergen: Option<String>,
    pub reaction: Option<String>,
    pub severity: Option<String>,
    pub notes: Option<String>,
}

/// SOAP-structured clinical evolution note.
#[sensitive_model(entity = "ClinicalNote")]
pub struct ClinicalNote {
    pub id: Option<String>,
    pub tenant_id: Option<String>,
    pub tenant: Option<TenantLink>,
    pub resident_id: Option<String>,
    pub profession: Option<String>,
    pub subjective: Option<String>,
    pub objective: Option<String>,
    pub assessment: Option<String>,
    pub plan: Option<String>,
}

#[sensitive_model(entity = "Prescription")]
pub struct Prescription {
    pub id: Option<String>,
    pub tenant_id: Option<String>,
    pub tenant: Option<TenantLink>,
    pub resident_id: Option<String>,
    pub prescriber_name: Option<String>,
    pub notes: Option<String>,
}

#[sensitive_model(entity = "Medication")]
pub struct Medication {
    pub id: Option<String>,
    pub tenant_id: Option<String>,
    pub tenant: Option<TenantLink>,
    pub prescription_id: Option<String>,
    pub name: Option<String>,
    pub dose: Option<String>,
    pub instructions: Option<String>,
    pub notes: Option<String>,
}

/// Shift log entry for a resident.
#[sensitive_model(entity = "DailyRecord")]
pub struct DailyRecord {
    pub id: Option<String>,
    pub tenant_id: Option<String>,
    pub tenant: Option<TenantLink>,
    pub resident_id: Option<String>,
    pub kind: Option<String>,
    pub recorded_at: Option<String>,
    pub notes: Option<String>,
}
