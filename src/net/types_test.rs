use super::*;
use serde_json::json;

fn basket_record() -> RegistryRecord {
    RecordDraft {
        meta: RecordMeta { name: "Wallet Basket".to_owned(), ..RecordMeta::default() },
        data: RecordData::Basket { basket_id: "B1".to_owned() },
    }
    .into_record(Outpoint { txid: "abc".to_owned(), vout: 3 })
}

// =============================================================
// RegistryKind
// =============================================================

#[test]
fn kind_default_is_basket() {
    assert_eq!(RegistryKind::default(), RegistryKind::Basket);
}

#[test]
fn kind_parses_wire_and_long_spellings() {
    assert_eq!("basket".parse::<RegistryKind>(), Ok(RegistryKind::Basket));
    assert_eq!("proto".parse::<RegistryKind>(), Ok(RegistryKind::Protocol));
    assert_eq!("Protocol".parse::<RegistryKind>(), Ok(RegistryKind::Protocol));
    assert_eq!("cert".parse::<RegistryKind>(), Ok(RegistryKind::Certificate));
    assert_eq!(
        "widget".parse::<RegistryKind>(),
        Err(KindParseError("widget".to_owned()))
    );
}

#[test]
fn kind_serializes_to_wire_spelling() {
    for kind in RegistryKind::ALL {
        assert_eq!(serde_json::to_value(kind).unwrap(), json!(kind.as_str()));
    }
}

#[test]
fn kind_labels() {
    assert_eq!(RegistryKind::Certificate.label(), "Certificate Type");
    assert_eq!(RegistryKind::Protocol.tab_label(), "Protocols");
}

// =============================================================
// SecurityLevel
// =============================================================

#[test]
fn security_level_accepts_only_zero_to_two() {
    assert_eq!(SecurityLevel::try_from(0), Ok(SecurityLevel::Basic));
    assert_eq!(SecurityLevel::try_from(2), Ok(SecurityLevel::Maximum));
    assert!(SecurityLevel::try_from(3).is_err());
    assert_eq!("1".parse::<SecurityLevel>(), Ok(SecurityLevel::Enhanced));
    assert!("high".parse::<SecurityLevel>().is_err());
}

#[test]
fn security_level_serializes_as_integer() {
    assert_eq!(serde_json::to_value(SecurityLevel::Enhanced).unwrap(), json!(1));
    assert!(serde_json::from_value::<SecurityLevel>(json!(7)).is_err());
}

// =============================================================
// Records
// =============================================================

#[test]
fn basket_record_serializes_flat_with_kind_tag() {
    let value = serde_json::to_value(basket_record()).unwrap();
    assert_eq!(
        value,
        json!({
            "kind": "basket",
            "basketID": "B1",
            "name": "Wallet Basket",
            "txid": "abc",
            "vout": 3,
        })
    );
}

#[test]
fn protocol_record_deserializes_from_flat_json() {
    let record: RegistryRecord = serde_json::from_value(json!({
        "kind": "proto",
        "protocolID": "todo list",
        "securityLevel": 2,
        "name": "Todo",
        "description": "Tracks tasks",
        "documentationURL": "https://docs.example/todo",
        "txid": "ff00",
        "vout": 0,
    }))
    .unwrap();
    assert_eq!(record.kind(), RegistryKind::Protocol);
    assert_eq!(
        record.data,
        RecordData::Protocol { protocol_id: "todo list".to_owned(), security_level: SecurityLevel::Maximum }
    );
    assert_eq!(record.meta.description.as_deref(), Some("Tracks tasks"));
    assert_eq!(record.meta.icon_url, None);
    assert_eq!(record.outpoint.to_string(), "ff00.0");
}

#[test]
fn certificate_fields_use_camel_case_descriptors() {
    let mut fields = CertificateFields::new();
    fields.insert(
        "photo".to_owned(),
        CertificateFieldDescriptor {
            friendly_name: "Photo".to_owned(),
            field_type: CertificateFieldType::ImageUrl,
            ..CertificateFieldDescriptor::default()
        },
    );
    let data = RecordData::Certificate { cert_type: "KYC".to_owned(), fields };
    let value = serde_json::to_value(&data).unwrap();
    assert_eq!(
        value,
        json!({
            "kind": "cert",
            "type": "KYC",
            "fields": {
                "photo": { "friendlyName": "Photo", "description": "", "type": "imageURL", "fieldIcon": "" }
            }
        })
    );
}

#[test]
fn same_identity_is_per_kind() {
    let a = RecordData::Basket { basket_id: "x".to_owned() };
    let b = RecordData::Certificate { cert_type: "x".to_owned(), fields: CertificateFields::new() };
    assert!(a.same_identity(&a.clone()));
    assert!(!a.same_identity(&b));
}

#[test]
fn protocol_identity_includes_security_level() {
    let p0 = RecordData::Protocol { protocol_id: "p".to_owned(), security_level: SecurityLevel::Basic };
    let p1 = RecordData::Protocol { protocol_id: "p".to_owned(), security_level: SecurityLevel::Enhanced };
    assert!(!p0.same_identity(&p1));
    assert_eq!(p0.identifier(), "p");
}

#[test]
fn draft_round_trips_through_record() {
    let record = basket_record();
    assert_eq!(record.draft().into_record(record.outpoint.clone()), record);
}

#[test]
fn field_type_parses_case_insensitively() {
    assert_eq!("imageURL".parse::<CertificateFieldType>(), Ok(CertificateFieldType::ImageUrl));
    assert_eq!("TEXT".parse::<CertificateFieldType>(), Ok(CertificateFieldType::Text));
    assert!("blob".parse::<CertificateFieldType>().is_err());
}
