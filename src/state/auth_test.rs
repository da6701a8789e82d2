use super::*;

const KEY: &str = "0123456789abcdef0123456789ABCDEF0123456789abcdef0123456789abcdef";

#[test]
fn new_store_is_logged_out() {
    let store = AuthStore::new();
    assert!(!store.is_authenticated());
    assert_eq!(store.state().method(), None);
    assert_eq!(store.operator_id(), None);
}

#[test]
fn login_wallet_sets_method_and_operator() {
    let mut store = AuthStore::new();
    store.login_wallet(WalletHandle::local());
    assert!(store.is_authenticated());
    assert_eq!(store.state().method(), Some(AuthMethod::Wallet));
    assert_eq!(store.operator_id().as_deref(), Some("wallet:local-wallet"));
}

#[test]
fn login_private_key_normalizes_to_lowercase() {
    let mut store = AuthStore::new();
    store.login_private_key(KEY).unwrap();
    assert_eq!(store.state().method(), Some(AuthMethod::PrivateKey));
    let Some(AuthSession { credential: Credential::PrivateKey(key) }) = &store.state().session else {
        panic!("expected private key session");
    };
    assert_eq!(key.expose_hex(), KEY.to_ascii_lowercase());
}

#[test]
fn private_key_operator_id_is_stable_fingerprint() {
    let mut a = AuthStore::new();
    let mut b = AuthStore::new();
    a.login_private_key(KEY).unwrap();
    b.login_private_key(&KEY.to_ascii_lowercase()).unwrap();
    let id = a.operator_id().unwrap();
    assert_eq!(Some(id.clone()), b.operator_id());
    assert!(id.starts_with("key:"));
    assert_eq!(id.len(), "key:".len() + 32);
    assert!(!id.contains(&KEY.to_ascii_lowercase()[..16]));
}

#[test]
fn invalid_private_keys_leave_state_untouched() {
    let mut store = AuthStore::new();
    store.login_wallet(WalletHandle::local());
    let before = store.state().clone();

    let bad_keys = vec![
        String::new(),
        "abc".to_owned(),
        KEY[..63].to_owned(),
        format!("{KEY}0"),
        format!("{}g", &KEY[..63]),
        format!(" {}", &KEY[..63]),
    ];
    for bad in &bad_keys {
        let err = store.login_private_key(bad).unwrap_err();
        assert!(matches!(err, AuthError::InvalidPrivateKey));
        assert_eq!(store.state(), &before);
    }
}

#[test]
fn logout_clears_session() {
    let mut store = AuthStore::new();
    store.login_private_key(KEY).unwrap();
    store.logout();
    assert!(!store.is_authenticated());
}

#[test]
fn private_key_debug_is_redacted() {
    let key = PrivateKey::parse(KEY).unwrap();
    let rendered = format!("{key:?}");
    assert_eq!(rendered, "PrivateKey(<redacted>)");
}

// =============================================================
// Snapshot persistence
// =============================================================

#[test]
fn snapshot_json_never_contains_key_material() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let mut store = AuthStore::with_snapshot_file(&path).unwrap();
    store.login_private_key(KEY).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(!raw.to_ascii_lowercase().contains(&KEY.to_ascii_lowercase()));
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value, serde_json::json!({ "isAuthenticated": true, "method": "privateKey" }));
}

#[test]
fn wallet_snapshot_is_restored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    {
        let mut store = AuthStore::with_snapshot_file(&path).unwrap();
        store.login_wallet(WalletHandle::local());
    }
    let restored = AuthStore::with_snapshot_file(&path).unwrap();
    assert_eq!(restored.state().method(), Some(AuthMethod::Wallet));
}

#[test]
fn private_key_snapshot_restores_logged_out() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    {
        let mut store = AuthStore::with_snapshot_file(&path).unwrap();
        store.login_private_key(KEY).unwrap();
    }
    let restored = AuthStore::with_snapshot_file(&path).unwrap();
    assert!(!restored.is_authenticated());
}

#[test]
fn logout_overwrites_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let mut store = AuthStore::with_snapshot_file(&path).unwrap();
    store.login_wallet(WalletHandle::local());
    store.logout();
    let snapshot: Option<SessionSnapshot> = persistence::load_json(&path).unwrap();
    assert_eq!(snapshot, Some(SessionSnapshot { is_authenticated: false, method: None }));
}

#[test]
fn corrupt_snapshot_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "nope").unwrap();
    let err = AuthStore::with_snapshot_file(&path).unwrap_err();
    assert_eq!(err.error_code(), "E_PERSIST_JSON");
}
