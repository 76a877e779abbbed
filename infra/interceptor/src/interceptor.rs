use crate::error::{InterceptorError, InterceptorErrorExt};
use crate::operation::{WriteOp, non_empty};
use crate::registry::FieldRegistry;
use chub_domain::SensitiveRecord;
use chub_domain::config::{EncryptionConfig, TenantPolicy};
use chub_vault::{FieldCipher, KdfParams, is_encrypted};
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, error, instrument, warn};

/// Counters for one pass of [`FieldInterceptor::before_write`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub encrypted: usize,
    /// Fields skipped by the double-encryption guard.
    pub already_encrypted: usize,
    /// Payloads left in plaintext because no tenant was found.
    pub skipped_payloads: usize,
}

/// Outcome of one pass of [`FieldInterceptor::after_read`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadReport {
    pub decrypted: usize,
    /// Records returned untouched because they carry no tenant.
    pub without_tenant: usize,
    pub failures: Vec<FieldFailure>,
}

impl ReadReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A field whose ciphertext was left in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFailure {
    /// Index of the record in the slice passed to `after_read`.
    pub record: usize,
    pub field: String,
    pub reason: String,
}

#[derive(Debug)]
struct InterceptorInner {
    cipher: FieldCipher,
    registry: FieldRegistry,
    policy: TenantPolicy,
    permits: Arc<Semaphore>,
    max_concurrency: usize,
}

/// Encrypts registered fields on the way into storage and decrypts them on the way out.
///
/// Every field is one blocking job (scrypt plus AES-GCM) on the runtime's blocking
/// pool; at most `max_concurrency` jobs run at once across all clones of the
/// interceptor. Results are applied in field order.
#[derive(Debug, Clone)]
pub struct FieldInterceptor {
    inner: Arc<InterceptorInner>,
}

impl FieldInterceptor {
    #[must_use]
    pub fn builder(cipher: FieldCipher) -> FieldInterceptorBuilder {
        FieldInterceptorBuilder::new(cipher)
    }

    /// Builds the cipher and the interceptor from configuration.
    ///
    /// # Errors
    /// [`InterceptorError::Vault`] if the master key is too short or the scrypt
    /// parameters are invalid.
    pub fn from_config(config: &EncryptionConfig) -> Result<Self, InterceptorError> {
        let kdf = KdfParams { log_n: config.kdf.log_n, r: config.kdf.r, p: config.kdf.p };
        let cipher = FieldCipher::builder()
            .master_key(config.master_key.clone())
            .context("Loading encryption config")?
            .kdf(kdf)
            .key_cache(config.key_cache_capacity)
            .build()
            .context("Loading encryption config")?;

        Ok(Self::builder(cipher)
            .registry(FieldRegistry::from_entries(&config.registry))
            .tenant_policy(config.tenant_policy)
            .max_concurrency(config.max_concurrency)
            .build())
    }

    #[must_use]
    pub fn cipher(&self) -> &FieldCipher {
        &self.inner.cipher
    }

    #[must_use]
    pub fn registry(&self) -> &FieldRegistry {
        &self.inner.registry
    }

    #[must_use]
    pub fn tenant_policy(&self) -> TenantPolicy {
        self.inner.policy
    }

    #[must_use]
    pub fn max_concurrency(&self) -> usize {
        self.inner.max_concurrency
    }

    /// Encrypts the registered fields of every outgoing payload in place.
    ///
    /// Values that already look encrypted are left alone. A payload without a tenant
    /// is written as-is under [`TenantPolicy::Lenient`].
    ///
    /// # Errors
    /// * [`InterceptorError::MissingTenant`] under [`TenantPolicy::Strict`], before any
    ///   field is touched.
    /// * [`InterceptorError::Vault`] if a field cannot be encrypted. The write must not
    ///   proceed; the payload may be partially encrypted.
    #[instrument(skip_all, fields(entity = R::ENTITY, action = %op.action()))]
    pub async fn before_write<R: SensitiveRecord>(
        &self,
        op: &mut WriteOp<R>,
    ) -> Result<WriteReport, InterceptorError> {
        let mut report = WriteReport::default();
        let Some(fields) = self.inner.registry.fields_for(R::ENTITY) else {
            return Ok(report);
        };
        let action = op.action();
        let mut targets = op.payloads_mut();

        if self.inner.policy == TenantPolicy::Strict
            && let Some(index) = targets.iter().position(|(_, tenant)| tenant.is_none())
        {
            return Err(InterceptorError::MissingTenant {
                message: format!("{action} on {} has no tenant (payload {index})", R::ENTITY).into(),
                context: None,
            });
        }

        let mut jobs = Vec::new();
        for (index, (payload, tenant)) in targets.iter_mut().enumerate() {
            let Some(tenant) = tenant else {
                warn!(entity = R::ENTITY, %action, payload = index, "No tenant found, writing without encryption");
                report.skipped_payloads += 1;
                continue;
            };
            for field in fields {
                let Some(value) = payload.text_field(field).filter(|v| !v.is_empty()) else {
                    continue;
                };
                if is_encrypted(value) {
                    debug!(entity = R::ENTITY, field = %field, "Field already encrypted, skipping");
                    report.already_encrypted += 1;
                    continue;
                }
                let plaintext = value.to_owned();
                let tenant_id = Arc::clone(tenant);
                let handle =
                    self.spawn_job(move |cipher| cipher.encrypt(plaintext.as_str(), &tenant_id)).await?;
                jobs.push((index, field.as_str(), Arc::clone(tenant), handle));
            }
        }

        for (index, field, tenant, handle) in jobs {
            let sealed = handle
                .await
                .context(format!("Encrypting {}.{field}", R::ENTITY))?
                .inspect_err(|e| {
                    error!(entity = R::ENTITY, field, tenant = %tenant, %action, error = %e, "Field encryption failed");
                })
                .context(format!("{}.{field}", R::ENTITY))?;
            if let Some(slot) = targets[index].0.text_field_mut(field) {
                match sealed {
                    Some(value) => {
                        *slot = Some(value.to_string());
                        report.encrypted += 1;
                    }
                    None => *slot = None,
                }
            }
        }

        debug!(
            encrypted = report.encrypted,
            already_encrypted = report.already_encrypted,
            skipped_payloads = report.skipped_payloads,
            "Write payload prepared"
        );
        Ok(report)
    }

    /// Decrypts the registered fields of every record in place.
    ///
    /// Never fails: a field that cannot be decrypted keeps its stored value and is
    /// listed in the report. Records without a tenant are left untouched.
    #[instrument(skip_all, fields(entity = R::ENTITY, records = records.len()))]
    pub async fn after_read<R: SensitiveRecord>(&self, records: &mut [R]) -> ReadReport {
        let mut report = ReadReport::default();
        let Some(fields) = self.inner.registry.fields_for(R::ENTITY) else {
            return report;
        };

        let mut jobs = Vec::new();
        for (index, record) in records.iter().enumerate() {
            let Some(tenant) = non_empty(record.tenant_id()).map(Arc::<str>::from) else {
                debug!(entity = R::ENTITY, record = index, "Record has no tenant, returning as stored");
                report.without_tenant += 1;
                continue;
            };
            for field in fields {
                let Some(value) = record.text_field(field).filter(|v| is_encrypted(v)) else {
                    continue;
                };
                let stored = value.to_owned();
                let tenant_id = Arc::clone(&tenant);
                match self.spawn_job(move |cipher| cipher.decrypt(stored.as_str(), &tenant_id)).await {
                    Ok(handle) => jobs.push((index, field.as_str(), Arc::clone(&tenant), handle)),
                    Err(err) => report.failures.push(FieldFailure {
                        record: index,
                        field: field.clone(),
                        reason: err.to_string(),
                    }),
                }
            }
        }

        for (index, field, tenant, handle) in jobs {
            let outcome = match handle.await {
                Ok(result) => result.map_err(|e| e.to_string()),
                Err(join) => Err(join.to_string()),
            };
            match outcome {
                Ok(plaintext) => {
                    if let Some(slot) = records[index].text_field_mut(field) {
                        *slot = plaintext;
                    }
                    report.decrypted += 1;
                }
                Err(reason) => {
                    error!(entity = R::ENTITY, field, tenant = %tenant, record = index, error = %reason, "Field decryption failed, keeping stored value");
                    report.failures.push(FieldFailure { record: index, field: field.to_owned(), reason });
                }
            }
        }

        report
    }

    /// [`FieldInterceptor::after_read`] for a single record.
    pub async fn after_read_one<R: SensitiveRecord>(&self, record: &mut R) -> ReadReport {
        self.after_read(std::slice::from_mut(record)).await
    }

    /// Waits for a worker permit, then runs `job` on the blocking pool.
    ///
    /// The permit is held by the job itself, so it is released as soon as the job
    /// finishes, whether or not anyone awaits the handle.
    async fn spawn_job<T, F>(&self, job: F) -> Result<JoinHandle<T>, InterceptorError>
    where
        F: FnOnce(&FieldCipher) -> T + Send + 'static,
        T: Send + 'static,
    {
        let permit = Arc::clone(&self.inner.permits).acquire_owned().await.map_err(|e| {
            InterceptorError::Internal {
                message: e.to_string().into(),
                context: Some("Acquiring worker permit".into()),
            }
        })?;
        let cipher = self.inner.cipher.clone();
        Ok(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            job(&cipher)
        }))
    }
}

/// A builder for [`FieldInterceptor`].
#[derive(Debug)]
pub struct FieldInterceptorBuilder {
    cipher: FieldCipher,
    registry: FieldRegistry,
    policy: TenantPolicy,
    max_concurrency: usize,
}

impl FieldInterceptorBuilder {
    fn new(cipher: FieldCipher) -> Self {
        Self {
            cipher,
            registry: FieldRegistry::production(),
            policy: TenantPolicy::default(),
            max_concurrency: 0,
        }
    }

    /// Replaces the production registry.
    #[must_use]
    pub fn registry(mut self, registry: FieldRegistry) -> Self {
        self.registry = registry;
        self
    }

    #[must_use]
    pub const fn tenant_policy(mut self, policy: TenantPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Upper bound on concurrent cipher jobs; `0` means available parallelism.
    #[must_use]
    pub const fn max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = limit;
        self
    }

    #[must_use]
    pub fn build(self) -> FieldInterceptor {
        let max_concurrency = if self.max_concurrency == 0 {
            std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
        } else {
            self.max_concurrency
        };
        debug!(max_concurrency, entities = self.registry.len(), policy = ?self.policy, "Field interceptor ready");

        FieldInterceptor {
            inner: Arc::new(InterceptorInner {
                cipher: self.cipher,
                registry: self.registry,
                policy: self.policy,
                permits: Arc::new(Semaphore::new(max_concurrency)),
                max_concurrency,
            }),
        }
    }
}
