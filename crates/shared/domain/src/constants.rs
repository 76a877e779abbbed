//! Entity names as they appear in the field registry and in log lines.

pub const RESIDENT: &str = "Resident";
pub const CONDITION: &str = "Condition";
pub const ALLERGY: &str = "Allergy";
pub const CLINICAL_NOTE: &str = "ClinicalNote";
pub const PRESCRIPTION: &str = "Prescription";
pub const MEDICATION: &str = "Medication";
pub const DAILY_RECORD: &str = "DailyRecord";

/// Sensitive fields per entity, in the order they are processed.
pub const DEFAULT_SENSITIVE_FIELDS: &[(&str, &[&str])] = &[
    (RESIDENT, &["cpf", "rg", "cns", "legal_guardian_cpf", "legal_guardian_rg"]),
    (CONDITION, &["name", "icd10_code", "notes"]),
    (ALLERGY, &["allergen", "reaction", "notes"]),
    (CLINICAL_NOTE, &["subjective", "objective", "assessment", "plan"]),
    (PRESCRIPTION, &["notes"]),
    (MEDICATION, &["instructions", "notes"]),
    (DAILY_RECORD, &["notes"]),
];
