use super::interceptor;
use crate::args::RecordArgs;
use anyhow::{Context, bail};
use chub_domain::SensitiveRecord;
use chub_domain::config::EncryptionConfig;
use chub_domain::constants::{
    ALLERGY, CLINICAL_NOTE, CONDITION, DAILY_RECORD, MEDICATION, PRESCRIPTION, RESIDENT,
};
use chub_domain::records::{
    Allergy, ClinicalNote, Condition, DailyRecord, Medication, Prescription, Resident,
};
use chub_interceptor::{FieldInterceptor, WriteOp};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

/// Runs `$body` with `$record` bound to the record type named by `$entity`.
macro_rules! with_record_type {
    ($entity:expr, $record:ident => $body:expr) => {
        match $entity {
            RESIDENT => {
                type $record = Resident;
                $body
            }
            CONDITION => {
                type $record = Condition;
                $body
            }
            ALLERGY => {
                type $record = Allergy;
                $body
            }
            CLINICAL_NOTE => {
                type $record = ClinicalNote;
                $body
            }
            PRESCRIPTION => {
                type $record = Prescription;
                $body
            }
            MEDICATION => {
                type $record = Medication;
                $body
            }
            DAILY_RECORD => {
                type $record = DailyRecord;
                $body
            }
            other => bail!(
                "Unknown entity '{other}'. Expected one of: {RESIDENT}, {CONDITION}, {ALLERGY}, \
                 {CLINICAL_NOTE}, {PRESCRIPTION}, {MEDICATION}, {DAILY_RECORD}"
            ),
        }
    };
}

/// Encrypts legacy plaintext rows. Values that are already encrypted are kept.
pub async fn seal(config: &EncryptionConfig, args: &RecordArgs) -> anyhow::Result<()> {
    let interceptor = interceptor(config)?;
    with_record_type!(args.entity.as_str(), R => seal_as::<R>(&interceptor, args).await)
}

/// Decrypts rows. Exits with code 2 when some fields could not be decrypted; those
/// keep their stored value in the output.
pub async fn open(config: &EncryptionConfig, args: &RecordArgs) -> anyhow::Result<ExitCode> {
    let interceptor = interceptor(config)?;
    with_record_type!(args.entity.as_str(), R => open_as::<R>(&interceptor, args).await)
}

async fn seal_as<R>(interceptor: &FieldInterceptor, args: &RecordArgs) -> anyhow::Result<()>
where
    R: SensitiveRecord + Serialize + DeserializeOwned,
{
    check_registry::<R>(interceptor)?;
    let records: Vec<R> = read_records(&args.input)?;
    let total = records.len();

    let mut op = WriteOp::CreateMany { data: records };
    let report = interceptor
        .before_write(&mut op)
        .await
        .with_context(|| format!("Sealing {}", args.input.display()))?;

    info!(
        entity = R::ENTITY,
        records = total,
        encrypted = report.encrypted,
        already_encrypted = report.already_encrypted,
        skipped = report.skipped_payloads,
        "Records sealed"
    );
    write_records(args.output.as_ref(), &op.into_payloads())
}

async fn open_as<R>(interceptor: &FieldInterceptor, args: &RecordArgs) -> anyhow::Result<ExitCode>
where
    R: SensitiveRecord + Serialize + DeserializeOwned,
{
    check_registry::<R>(interceptor)?;
    let mut records: Vec<R> = read_records(&args.input)?;

    let report = interceptor.after_read(&mut records).await;
    info!(
        entity = R::ENTITY,
        records = records.len(),
        decrypted = report.decrypted,
        failures = report.failures.len(),
        "Records opened"
    );
    write_records(args.output.as_ref(), &records)?;

    if report.is_clean() {
        Ok(ExitCode::SUCCESS)
    } else {
        for failure in &report.failures {
            warn!(record = failure.record, field = %failure.field, "Field left encrypted");
        }
        Ok(ExitCode::from(2))
    }
}

fn check_registry<R: SensitiveRecord>(interceptor: &FieldInterceptor) -> anyhow::Result<()> {
    let unknown = interceptor.registry().unknown_fields::<R>();
    if !unknown.is_empty() {
        bail!("Registry lists fields {} has no text field for: {}", R::ENTITY, unknown.join(", "));
    }
    Ok(())
}

fn read_records<R: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<R>> {
    let raw = fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Parsing {}", path.display()))
}

fn write_records<R: Serialize>(output: Option<&PathBuf>, records: &[R]) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(records).context("Serializing records")?;
    match output {
        Some(path) => {
            fs::write(path, json + "\n").with_context(|| format!("Writing {}", path.display()))
        }
        None => {
            println!("{json}");
            Ok(())
        }
    }
}
