#![allow(dead_code)]

use chub_domain::TenantLink;
use chub_domain::records::{ClinicalNote, Resident};
use chub_interceptor::{FieldInterceptor, TenantPolicy};
use chub_vault::{FieldCipher, KdfParams};

pub const MASTER_KEY: &str = "0f1e2d3c4b5a69788796a5b4c3d2e1f00f1e2d3c4b5a69788796a5b4c3d2e1f0";
pub const CPF: &str = "123.456.789-00";

pub fn cipher() -> FieldCipher {
    FieldCipher::builder()
        .master_key(MASTER_KEY)
        .unwrap()
        .kdf(KdfParams { log_n: 8, r: 8, p: 1 })
        .build()
        .unwrap()
}

pub fn interceptor() -> FieldInterceptor {
    FieldInterceptor::builder(cipher()).max_concurrency(4).build()
}

pub fn strict_interceptor() -> FieldInterceptor {
    FieldInterceptor::builder(cipher()).tenant_policy(TenantPolicy::Strict).build()
}

pub fn resident(tenant: Option<&str>) -> Resident {
    Resident {
        tenant_id: tenant.map(str::to_owned),
        full_name: Some("Maria da Silva".to_owned()),
        cpf: Some(CPF.to_owned()),
        rg: Some("12.345.678-9".to_owned()),
        cns: Some("898 0012 3456 7890".to_owned()),
        room: Some("12B".to_owned()),
        ..Resident::default()
    }
}

pub fn connected_resident(tenant: &str) -> Resident {
    Resident { tenant: Some(TenantLink::connect(tenant)), ..resident(None) }
}

pub fn note(tenant: &str) -> ClinicalNote {
    ClinicalNote {
        tenant_id: Some(tenant.to_owned()),
        resident_id: Some("r-1".to_owned()),
        profession: Some("nurse".to_owned()),
        subjective: Some("Reports mild headache".to_owned()),
        objective: Some("BP 130/85".to_owned()),
        assessment: Some("Tension headache".to_owned()),
        plan: Some("Hydration, reassess in 4h".to_owned()),
        ..ClinicalNote::default()
    }
}
