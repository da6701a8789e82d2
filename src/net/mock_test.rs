use super::*;
use crate::net::types::{
    CertificateFieldDescriptor, CertificateFieldType, CertificateFields, RecordMeta, SecurityLevel,
};

fn meta(name: &str) -> RecordMeta {
    RecordMeta { name: name.to_owned(), ..RecordMeta::default() }
}

fn basket(id: &str, name: &str) -> RecordDraft {
    RecordDraft { meta: meta(name), data: RecordData::Basket { basket_id: id.to_owned() } }
}

fn protocol(id: &str, level: SecurityLevel) -> RecordDraft {
    RecordDraft {
        meta: meta("Protocol"),
        data: RecordData::Protocol { protocol_id: id.to_owned(), security_level: level },
    }
}

fn instant_client() -> MockRegistryClient {
    MockRegistry::new().client(LOCAL_OWNER, MockLatency::none())
}

// =============================================================
// register / list
// =============================================================

#[tokio::test]
async fn register_then_list_returns_record_with_assigned_outpoint() {
    let client = instant_client();
    let draft = basket("B1", "Wallet Basket");
    let record = client.register(draft.clone()).await.unwrap();

    assert_eq!(record.draft(), draft);
    assert_eq!(record.outpoint.txid.len(), 64);
    assert!(record.outpoint.vout < 100);

    let listed = client.list(RegistryKind::Basket).await.unwrap();
    assert_eq!(listed, vec![record]);
    assert_eq!(listed[0].kind(), RegistryKind::Basket);
    assert_eq!(listed[0].data.identifier(), "B1");
}

#[tokio::test]
async fn list_is_filtered_by_kind_and_keeps_insertion_order() {
    let client = instant_client();
    let a = client.register(basket("A", "a")).await.unwrap();
    client.register(protocol("p", SecurityLevel::Basic)).await.unwrap();
    let b = client.register(basket("B", "b")).await.unwrap();

    let baskets = client.list(RegistryKind::Basket).await.unwrap();
    assert_eq!(baskets, vec![a, b]);
    assert_eq!(client.list(RegistryKind::Protocol).await.unwrap().len(), 1);
}

#[tokio::test]
async fn list_empty_kind_is_empty_not_error() {
    let client = instant_client();
    for kind in RegistryKind::ALL {
        assert!(client.list(kind).await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn register_then_list_protocol_round_trips_exactly() {
    let client = instant_client();
    let draft = protocol("payments", SecurityLevel::Enhanced);
    let record = client.register(draft.clone()).await.unwrap();
    assert_eq!(record.draft(), draft);

    let listed = client.list(RegistryKind::Protocol).await.unwrap();
    assert_eq!(listed, vec![record]);
    assert!(client.list(RegistryKind::Basket).await.unwrap().is_empty());
}

#[tokio::test]
async fn certificate_fields_are_persisted_exactly() {
    let client = instant_client();
    let mut fields = CertificateFields::new();
    fields.insert(
        "dob".to_owned(),
        CertificateFieldDescriptor {
            friendly_name: "Date of birth".to_owned(),
            field_type: CertificateFieldType::Text,
            ..CertificateFieldDescriptor::default()
        },
    );
    fields.insert(
        "photo".to_owned(),
        CertificateFieldDescriptor {
            friendly_name: "Photo".to_owned(),
            field_type: CertificateFieldType::ImageUrl,
            ..CertificateFieldDescriptor::default()
        },
    );
    let draft = RecordDraft {
        meta: meta("KYC"),
        data: RecordData::Certificate { cert_type: "KYC".to_owned(), fields: fields.clone() },
    };
    let record = client.register(draft).await.unwrap();

    let listed = client.list(RegistryKind::Certificate).await.unwrap();
    assert_eq!(listed, vec![record]);
    let RecordData::Certificate { cert_type, fields: stored } = &listed[0].data else {
        panic!("expected certificate record");
    };
    assert_eq!(cert_type, "KYC");
    assert_eq!(stored.keys().collect::<Vec<_>>(), vec!["dob", "photo"]);
    assert_eq!(stored, &fields);
}

#[tokio::test]
async fn register_rejects_missing_required_fields() {
    let client = instant_client();
    let err = client.register(basket("", "name")).await.unwrap_err();
    assert_eq!(err, ClientError::registration("basketID is required"));

    let err = client.register(basket("B1", "  ")).await.unwrap_err();
    assert_eq!(err, ClientError::registration("name is required"));
    assert!(client.registry().is_empty().await);
}

#[tokio::test]
async fn register_rejects_duplicate_identifier_for_same_owner() {
    let client = instant_client();
    client.register(basket("B1", "first")).await.unwrap();
    let err = client.register(basket("B1", "second")).await.unwrap_err();
    assert!(matches!(err, ClientError::Registration { .. }));
    assert_eq!(client.list(RegistryKind::Basket).await.unwrap().len(), 1);
}

#[tokio::test]
async fn protocol_may_repeat_at_different_levels() {
    let client = instant_client();
    client.register(protocol("p", SecurityLevel::Basic)).await.unwrap();
    client.register(protocol("p", SecurityLevel::Maximum)).await.unwrap();
    assert_eq!(client.list(RegistryKind::Protocol).await.unwrap().len(), 2);
}

#[tokio::test]
async fn concurrent_registrations_get_distinct_outpoints() {
    let client = instant_client();
    let (a, b) = tokio::join!(client.register(basket("A", "a")), client.register(basket("B", "b")));
    assert_ne!(a.unwrap().outpoint, b.unwrap().outpoint);
    assert_eq!(client.list(RegistryKind::Basket).await.unwrap().len(), 2);
}

// =============================================================
// revoke
// =============================================================

#[tokio::test]
async fn revoke_removes_record_and_second_revoke_is_not_found() {
    let client = instant_client();
    let record = client.register(basket("B1", "b")).await.unwrap();

    client.revoke(RegistryKind::Basket, &record).await.unwrap();
    assert!(client.list(RegistryKind::Basket).await.unwrap().is_empty());

    let err = client.revoke(RegistryKind::Basket, &record).await.unwrap_err();
    assert_eq!(err, ClientError::NotFound { kind: RegistryKind::Basket, outpoint: record.outpoint.clone() });
    assert_eq!(crate::error::ErrorCode::error_code(&err), "E_NOT_FOUND");
}

#[tokio::test]
async fn revoke_with_wrong_kind_is_not_found() {
    let client = instant_client();
    let record = client.register(basket("B1", "b")).await.unwrap();
    let err = client.revoke(RegistryKind::Protocol, &record).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound { .. }));
    assert_eq!(client.list(RegistryKind::Basket).await.unwrap().len(), 1);
}

#[tokio::test]
async fn revoke_removes_only_the_matching_record() {
    let client = instant_client();
    let a = client.register(basket("A", "a")).await.unwrap();
    let b = client.register(basket("B", "b")).await.unwrap();
    client.revoke(RegistryKind::Basket, &a).await.unwrap();
    assert_eq!(client.list(RegistryKind::Basket).await.unwrap(), vec![b]);
}

// =============================================================
// ownership
// =============================================================

#[tokio::test]
async fn owners_only_see_and_revoke_their_own_entries() {
    let registry = MockRegistry::new();
    let alice = registry.client("alice", MockLatency::none());
    let bob = registry.client("bob", MockLatency::none());

    let record = alice.register(basket("B1", "shared id")).await.unwrap();
    assert!(bob.list(RegistryKind::Basket).await.unwrap().is_empty());
    assert!(bob.revoke(RegistryKind::Basket, &record).await.is_err());

    bob.register(basket("B1", "same id, other owner")).await.unwrap();
    assert_eq!(registry.len().await, 2);
}

// =============================================================
// latency, counters, failure injection
// =============================================================

#[tokio::test(start_paused = true)]
async fn default_latency_delays_each_call() {
    let client = MockRegistryClient::new();
    let start = tokio::time::Instant::now();
    let record = client.register(basket("B1", "b")).await.unwrap();
    assert!(start.elapsed() >= Duration::from_millis(MockLatency::DEFAULT_REGISTER_MS));

    let start = tokio::time::Instant::now();
    client.list(RegistryKind::Basket).await.unwrap();
    assert!(start.elapsed() >= Duration::from_millis(MockLatency::DEFAULT_LIST_MS));

    let start = tokio::time::Instant::now();
    client.revoke(RegistryKind::Basket, &record).await.unwrap();
    assert!(start.elapsed() >= Duration::from_millis(MockLatency::DEFAULT_REVOKE_MS));
}

#[tokio::test]
async fn call_counters_track_each_operation() {
    let client = instant_client();
    let record = client.register(basket("B1", "b")).await.unwrap();
    client.list(RegistryKind::Basket).await.unwrap();
    client.list(RegistryKind::Protocol).await.unwrap();
    client.revoke(RegistryKind::Basket, &record).await.unwrap();
    assert_eq!(client.register_calls(), 1);
    assert_eq!(client.list_calls(), 2);
    assert_eq!(client.revoke_calls(), 1);
}

#[tokio::test]
async fn fail_next_applies_to_exactly_one_call() {
    let client = instant_client();
    client.fail_next(ClientError::Backend("offline".to_owned())).await;
    let err = client.list(RegistryKind::Basket).await.unwrap_err();
    assert_eq!(err, ClientError::Backend("offline".to_owned()));
    assert!(crate::error::ErrorCode::retryable(&err));
    assert!(client.list(RegistryKind::Basket).await.is_ok());
}
