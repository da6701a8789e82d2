//! In-memory registry backend with simulated network latency.
//!
//! DESIGN
//! ======
//! `MockRegistry` is the shared store; `MockRegistryClient` is a handle onto
//! it bound to one operator. Every entry is tagged with its owner, so listing
//! and revoking only ever see the caller's own entries.
//!
//! Each call sleeps for its configured latency before touching the store and
//! then applies its mutation under a single write lock. Two concurrent
//! registrations can complete in either order but each gets its own outpoint.

#[cfg(test)]
#[path = "mock_test.rs"]
mod mock_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use super::client::{ClientError, RegistryClient};
use super::types::{Outpoint, RecordData, RecordDraft, RegistryKind, RegistryRecord};
use crate::util::hex::bytes_to_hex;

/// Owner used by [`MockRegistryClient::new`].
pub const LOCAL_OWNER: &str = "local";

const MAX_VOUT: u32 = 100;

// =============================================================================
// LATENCY
// =============================================================================

/// Artificial delay applied before each operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockLatency {
    pub register: Duration,
    pub list: Duration,
    pub revoke: Duration,
}

impl MockLatency {
    pub const DEFAULT_REGISTER_MS: u64 = 800;
    pub const DEFAULT_LIST_MS: u64 = 500;
    pub const DEFAULT_REVOKE_MS: u64 = 600;

    /// No delay at all.
    #[must_use]
    pub fn none() -> Self {
        Self { register: Duration::ZERO, list: Duration::ZERO, revoke: Duration::ZERO }
    }
}

impl Default for MockLatency {
    fn default() -> Self {
        Self {
            register: Duration::from_millis(Self::DEFAULT_REGISTER_MS),
            list: Duration::from_millis(Self::DEFAULT_LIST_MS),
            revoke: Duration::from_millis(Self::DEFAULT_REVOKE_MS),
        }
    }
}

// =============================================================================
// STORE
// =============================================================================

#[derive(Debug, Clone)]
struct StoredRecord {
    owner: String,
    record: RegistryRecord,
}

/// Shared in-memory registry. Cloning yields another handle to the same store.
#[derive(Debug, Clone, Default)]
pub struct MockRegistry {
    entries: Arc<RwLock<Vec<StoredRecord>>>,
}

impl MockRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A client acting on behalf of `owner`.
    #[must_use]
    pub fn client(&self, owner: impl Into<String>, latency: MockLatency) -> MockRegistryClient {
        MockRegistryClient {
            registry: self.clone(),
            owner: owner.into(),
            latency,
            calls: Arc::new(CallCounters::default()),
            pending_failure: Arc::new(Mutex::new(None)),
        }
    }

    /// Number of live entries across all owners.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Debug, Default)]
struct CallCounters {
    register: AtomicUsize,
    list: AtomicUsize,
    revoke: AtomicUsize,
}

/// Per-operator handle onto a [`MockRegistry`].
#[derive(Debug, Clone)]
pub struct MockRegistryClient {
    registry: MockRegistry,
    owner: String,
    latency: MockLatency,
    calls: Arc<CallCounters>,
    pending_failure: Arc<Mutex<Option<ClientError>>>,
}

impl MockRegistryClient {
    /// A client over a fresh private registry with default latency.
    #[must_use]
    pub fn new() -> Self {
        MockRegistry::new().client(LOCAL_OWNER, MockLatency::default())
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn registry(&self) -> &MockRegistry {
        &self.registry
    }

    #[must_use]
    pub fn register_calls(&self) -> usize {
        self.calls.register.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn list_calls(&self) -> usize {
        self.calls.list.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn revoke_calls(&self) -> usize {
        self.calls.revoke.load(Ordering::Relaxed)
    }

    /// Make the next call on this client (or any clone of it) fail with `err`.
    pub async fn fail_next(&self, err: ClientError) {
        *self.pending_failure.lock().await = Some(err);
    }

    async fn take_failure(&self) -> Result<(), ClientError> {
        match self.pending_failure.lock().await.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for MockRegistryClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RegistryClient for MockRegistryClient {
    async fn register(&self, draft: RecordDraft) -> Result<RegistryRecord, ClientError> {
        self.calls.register.fetch_add(1, Ordering::Relaxed);
        tokio::time::sleep(self.latency.register).await;
        self.take_failure().await?;
        validate_draft(&draft)?;

        let mut entries = self.registry.entries.write().await;
        let duplicate = entries
            .iter()
            .any(|e| e.owner == self.owner && e.record.data.same_identity(&draft.data));
        if duplicate {
            return Err(ClientError::registration(format!(
                "{} '{}' is already registered",
                draft.kind(),
                draft.data.identifier()
            )));
        }

        let outpoint = loop {
            let candidate = generate_outpoint();
            if !entries.iter().any(|e| e.record.outpoint == candidate) {
                break candidate;
            }
            debug!(%candidate, "outpoint collision; regenerating");
        };

        let record = draft.into_record(outpoint);
        entries.push(StoredRecord { owner: self.owner.clone(), record: record.clone() });
        info!(
            owner = %self.owner,
            kind = %record.kind(),
            identifier = record.data.identifier(),
            outpoint = %record.outpoint,
            "registry entry registered"
        );
        Ok(record)
    }

    async fn list(&self, kind: RegistryKind) -> Result<Vec<RegistryRecord>, ClientError> {
        self.calls.list.fetch_add(1, Ordering::Relaxed);
        tokio::time::sleep(self.latency.list).await;
        self.take_failure().await?;

        let entries = self.registry.entries.read().await;
        let records: Vec<RegistryRecord> = entries
            .iter()
            .filter(|e| e.owner == self.owner && e.record.kind() == kind)
            .map(|e| e.record.clone())
            .collect();
        debug!(owner = %self.owner, %kind, count = records.len(), "registry entries listed");
        Ok(records)
    }

    async fn revoke(&self, kind: RegistryKind, record: &RegistryRecord) -> Result<(), ClientError> {
        self.calls.revoke.fetch_add(1, Ordering::Relaxed);
        tokio::time::sleep(self.latency.revoke).await;
        self.take_failure().await?;

        let mut entries = self.registry.entries.write().await;
        let position = entries.iter().position(|e| {
            e.owner == self.owner && e.record.kind() == kind && e.record.outpoint == record.outpoint
        });
        let Some(index) = position else {
            return Err(ClientError::NotFound { kind, outpoint: record.outpoint.clone() });
        };
        entries.remove(index);
        info!(owner = %self.owner, %kind, outpoint = %record.outpoint, "registry entry revoked");
        Ok(())
    }
}

fn generate_outpoint() -> Outpoint {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    Outpoint { txid: bytes_to_hex(&bytes), vout: rng.random_range(0..MAX_VOUT) }
}

fn validate_draft(draft: &RecordDraft) -> Result<(), ClientError> {
    if draft.meta.name.trim().is_empty() {
        return Err(ClientError::registration("name is required"));
    }
    if draft.data.identifier().trim().is_empty() {
        let field = match &draft.data {
            RecordData::Basket { .. } => "basketID",
            RecordData::Protocol { .. } => "protocolID",
            RecordData::Certificate { .. } => "type",
        };
        return Err(ClientError::registration(format!("{field} is required")));
    }
    if let RecordData::Certificate { fields, .. } = &draft.data {
        if fields.keys().any(|name| name.trim().is_empty()) {
            return Err(ClientError::registration("certificate field names must not be empty"));
        }
    }
    Ok(())
}
