//! Registry client contract.
//!
//! SYSTEM CONTEXT
//! ==============
//! Page controllers only ever talk to `dyn RegistryClient`, so the mock
//! backend and a real wallet-backed backend are interchangeable. Every call
//! is a suspension point; implementations apply mutations atomically once
//! their (real or simulated) network round trip completes.
//!
//! ERROR HANDLING
//! ==============
//! Client failures are values, never panics. Callers at the page boundary
//! turn them into destructive notifications.

use async_trait::async_trait;

use super::types::{Outpoint, RecordDraft, RegistryKind, RegistryRecord};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The registry refused to create the entry.
    #[error("registration failed: {reason}")]
    Registration { reason: String },

    /// No live entry of `kind` anchored at `outpoint`.
    #[error("{kind} entry not found: {outpoint}")]
    NotFound { kind: RegistryKind, outpoint: Outpoint },

    /// The caller has no authenticated operator.
    #[error("not authenticated")]
    Unauthenticated,

    /// Transport or backend failure.
    #[error("registry backend error: {0}")]
    Backend(String),
}

impl ClientError {
    pub(crate) fn registration(reason: impl Into<String>) -> Self {
        Self::Registration { reason: reason.into() }
    }
}

impl crate::error::ErrorCode for ClientError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Registration { .. } => "E_REGISTRATION",
            Self::NotFound { .. } => "E_NOT_FOUND",
            Self::Unauthenticated => "E_UNAUTHENTICATED",
            Self::Backend(_) => "E_BACKEND",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Backend(_))
    }
}

/// Operations a registry backend must support.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Create a new entry and return it with its freshly assigned outpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Registration`] when a required field is missing
    /// or the entry's identifier is already registered.
    async fn register(&self, draft: RecordDraft) -> Result<RegistryRecord, ClientError>;

    /// All live entries of `kind` owned by this client's operator, in
    /// registration order. An empty registry yields an empty vector.
    ///
    /// # Errors
    ///
    /// Returns an error only for transport or backend failures.
    async fn list(&self, kind: RegistryKind) -> Result<Vec<RegistryRecord>, ClientError>;

    /// Remove the live entry matching `record`'s outpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when no such live entry exists.
    async fn revoke(&self, kind: RegistryKind, record: &RegistryRecord) -> Result<(), ClientError>;
}
