//! Auth-session state for the current operator.
//!
//! SYSTEM CONTEXT
//! ==============
//! The start page writes to `AuthStore`; the app reads it to pick a route and
//! to bind the registry client to an operator identity. The store is an
//! owned value, so tests construct as many isolated instances as they need.
//!
//! TRADE-OFFS
//! ==========
//! Optional persistence writes only `{isAuthenticated, method}`. Raw key
//! material never reaches disk, so a private-key session cannot survive a
//! restart and must be re-entered; wallet sessions are restored.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::error::ErrorCode;
use crate::util::hex::{bytes_to_hex, is_hex_of_len};
use crate::util::persistence::{self, PersistenceError};

/// Hex digits in a 32-byte private key.
pub const PRIVATE_KEY_HEX_LEN: usize = 64;

/// Bytes of the key digest used as an operator identity.
const OPERATOR_ID_BYTES: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("private key must be 64 hex characters")]
    InvalidPrivateKey,
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl ErrorCode for AuthError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPrivateKey => "E_INVALID_PRIVATE_KEY",
            Self::Persistence(e) => e.error_code(),
        }
    }
}

// =============================================================================
// CREDENTIALS
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthMethod {
    #[serde(rename = "wallet")]
    Wallet,
    #[serde(rename = "privateKey")]
    PrivateKey,
}

/// A validated 32-byte private key, held as lowercase hex.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey(String);

impl PrivateKey {
    /// Validate `raw` against the strict 64-hex-character format.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidPrivateKey`] for any other length or any
    /// non-hex character. Surrounding whitespace is not tolerated.
    pub fn parse(raw: &str) -> Result<Self, AuthError> {
        if !is_hex_of_len(raw, PRIVATE_KEY_HEX_LEN) {
            return Err(AuthError::InvalidPrivateKey);
        }
        Ok(Self(raw.to_ascii_lowercase()))
    }

    #[must_use]
    pub fn expose_hex(&self) -> &str {
        &self.0
    }

    /// Stable, non-reversible identity derived from the key.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.0.as_bytes());
        bytes_to_hex(&digest[..OPERATOR_ID_BYTES])
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// Opaque handle to a connected wallet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalletHandle {
    pub identity: String,
}

impl WalletHandle {
    pub const LOCAL_IDENTITY: &'static str = "local-wallet";

    /// The wallet running alongside this process.
    #[must_use]
    pub fn local() -> Self {
        Self { identity: Self::LOCAL_IDENTITY.to_owned() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credential {
    Wallet(WalletHandle),
    PrivateKey(PrivateKey),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthSession {
    pub credential: Credential,
}

impl AuthSession {
    #[must_use]
    pub fn method(&self) -> AuthMethod {
        match self.credential {
            Credential::Wallet(_) => AuthMethod::Wallet,
            Credential::PrivateKey(_) => AuthMethod::PrivateKey,
        }
    }

    /// Identity the registry uses to scope this operator's entries.
    #[must_use]
    pub fn operator_id(&self) -> String {
        match &self.credential {
            Credential::Wallet(handle) => format!("wallet:{}", handle.identity),
            Credential::PrivateKey(key) => format!("key:{}", key.fingerprint()),
        }
    }
}

// =============================================================================
// STATE
// =============================================================================

/// Whether someone is logged in, and how.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub session: Option<AuthSession>,
}

impl AuthState {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn method(&self) -> Option<AuthMethod> {
        self.session.as_ref().map(AuthSession::method)
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot { is_authenticated: self.is_authenticated(), method: self.method() }
    }
}

/// Persisted shape of the auth state. Never carries key material.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub is_authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<AuthMethod>,
}

impl SessionSnapshot {
    /// The state a snapshot can restore to.
    #[must_use]
    pub fn restore(self) -> AuthState {
        match (self.is_authenticated, self.method) {
            (true, Some(AuthMethod::Wallet)) => {
                AuthState { session: Some(AuthSession { credential: Credential::Wallet(WalletHandle::local()) }) }
            }
            _ => AuthState::default(),
        }
    }
}

// =============================================================================
// STORE
// =============================================================================

/// Owner of the auth state, with optional snapshot persistence.
#[derive(Debug, Default)]
pub struct AuthStore {
    state: AuthState,
    snapshot_path: Option<PathBuf>,
}

impl AuthStore {
    /// A logged-out store that persists nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store backed by a snapshot file, restored from it when present.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot file exists but cannot be read.
    pub fn with_snapshot_file(path: impl Into<PathBuf>) -> Result<Self, AuthError> {
        let path = path.into();
        let snapshot: Option<SessionSnapshot> = persistence::load_json(&path)?;
        let state = snapshot.map(SessionSnapshot::restore).unwrap_or_default();
        if let Some(method) = state.method() {
            info!(?method, path = %path.display(), "auth session restored");
        }
        Ok(Self { state, snapshot_path: Some(path) })
    }

    #[must_use]
    pub fn state(&self) -> &AuthState {
        &self.state
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    #[must_use]
    pub fn operator_id(&self) -> Option<String> {
        self.state.session.as_ref().map(AuthSession::operator_id)
    }

    pub fn login_wallet(&mut self, handle: WalletHandle) {
        self.set_session(Some(AuthSession { credential: Credential::Wallet(handle) }));
    }

    /// Log in with a raw hex private key.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidPrivateKey`] without touching state when
    /// `raw` is malformed.
    pub fn login_private_key(&mut self, raw: &str) -> Result<(), AuthError> {
        let key = PrivateKey::parse(raw)?;
        self.set_session(Some(AuthSession { credential: Credential::PrivateKey(key) }));
        Ok(())
    }

    pub fn logout(&mut self) {
        self.set_session(None);
    }

    fn set_session(&mut self, session: Option<AuthSession>) {
        self.state.session = session;
        match self.state.method() {
            Some(method) => info!(?method, "logged in"),
            None => info!("logged out"),
        }
        self.persist();
    }

    fn persist(&self) {
        let Some(path) = &self.snapshot_path else {
            return;
        };
        if let Err(e) = persistence::save_json(path, &self.state.snapshot()) {
            warn!(error = %e, "failed to persist auth snapshot");
        }
    }
}
