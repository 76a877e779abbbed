use chub_domain::constants::{CLINICAL_NOTE, DEFAULT_SENSITIVE_FIELDS, RESIDENT};
use chub_domain::records::{
    Allergy, ClinicalNote, Condition, DailyRecord, Medication, Prescription, Resident,
};
use chub_domain::{SensitiveRecord, TenantLink};
use serde_json::json;

fn text_fields_of(entity: &str) -> &'static [&'static str] {
    match entity {
        "Resident" => Resident::TEXT_FIELDS,
        "Condition" => Condition::TEXT_FIELDS,
        "Allergy" => Allergy::TEXT_FIELDS,
        "ClinicalNote" => ClinicalNote::TEXT_FIELDS,
        "Prescription" => Prescription::TEXT_FIELDS,
        "Medication" => Medication::TEXT_FIELDS,
        "DailyRecord" => DailyRecord::TEXT_FIELDS,
        other => panic!("unknown entity {other}"),
    }
}

#[test]
fn every_registered_field_exists_on_its_record() {
    for (entity, fields) in DEFAULT_SENSITIVE_FIELDS {
        let available = text_fields_of(entity);
        for field in *fields {
            assert!(available.contains(field), "{entity}.{field} is not a text field");
        }
    }
}

#[test]
fn entity_names_follow_constants() {
    assert_eq!(Resident::ENTITY, RESIDENT);
    assert_eq!(ClinicalNote::ENTITY, CLINICAL_NOTE);
}

#[test]
fn text_fields_exclude_keys() {
    assert!(!Resident::TEXT_FIELDS.contains(&"id"));
    assert!(!Resident::TEXT_FIELDS.contains(&"tenant_id"));
    assert!(!Condition::TEXT_FIELDS.contains(&"active"));
}

#[test]
fn fields_are_addressable_by_name() {
    let mut resident = Resident { cpf: Some("123.456.789-00".to_owned()), ..Default::default() };

    assert_eq!(resident.text_field("cpf"), Some("123.456.789-00"));
    assert_eq!(resident.text_field("rg"), None);
    assert_eq!(resident.text_field("unknown"), None);

    *resident.text_field_mut("rg").unwrap() = Some("12.345.678-9".to_owned());
    assert_eq!(resident.rg.as_deref(), Some("12.345.678-9"));
    assert!(resident.text_field_mut("tenant_id").is_none());
}

#[test]
fn tenant_sources() {
    let resident = Resident {
        tenant_id: Some("direct".to_owned()),
        tenant: Some(TenantLink::connect("linked")),
        ..Default::default()
    };
    assert_eq!(resident.tenant_id(), Some("direct"));
    assert_eq!(resident.tenant_connect(), Some("linked"));

    let bare = Resident::default();
    assert_eq!(bare.tenant_id(), None);
    assert_eq!(bare.tenant_connect(), None);
}

#[test]
fn empty_tenant_ids_read_as_absent() {
    let resident = Resident {
        tenant_id: Some(String::new()),
        tenant: Some(TenantLink::connect("")),
        ..Default::default()
    };
    assert_eq!(resident.tenant_id(), None);
    assert_eq!(resident.tenant_connect(), None);
}

#[test]
fn assign_id_and_merge() {
    let mut note = ClinicalNote {
        tenant_id: Some("t-1".to_owned()),
        subjective: Some("pain".to_owned()),
        plan: Some("rest".to_owned()),
        ..Default::default()
    };
    note.assign_id("n-1".to_owned());
    assert_eq!(note.record_id(), Some("n-1"));

    note.merge(ClinicalNote { plan: Some("physio".to_owned()), ..Default::default() });
    assert_eq!(note.subjective.as_deref(), Some("pain"));
    assert_eq!(note.plan.as_deref(), Some("physio"));
    assert_eq!(note.record_id(), Some("n-1"));
}

#[test]
fn serializes_camel_case_with_defaults() {
    let resident: Resident = serde_json::from_value(json!({
        "tenantId": "t-1",
        "legalGuardianCpf": "987.654.321-00",
        "tenant": { "connect": { "id": "t-1" } }
    }))
    .expect("partial record deserializes");

    assert_eq!(resident.tenant_id.as_deref(), Some("t-1"));
    assert_eq!(resident.legal_guardian_cpf.as_deref(), Some("987.654.321-00"));
    assert_eq!(resident.tenant_connect(), Some("t-1"));
    assert!(resident.cpf.is_none());

    let value = serde_json::to_value(&resident).unwrap();
    assert_eq!(value["legalGuardianCpf"], "987.654.321-00");
}
