//! Registry record model.
//!
//! DESIGN
//! ======
//! A record is `meta` (shared descriptive fields) + `data` (the per-kind
//! payload, a sum type tagged by `kind`) + `outpoint` (the ledger anchor).
//! Registration payloads (`RecordDraft`) carry no outpoint at all, so only
//! the registry client can assign `txid`/`vout`.
//!
//! The JSON shape is flat: `kind`, shared fields, variant fields, `txid`,
//! `vout`, with absent optional fields omitted.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// =============================================================================
// KIND
// =============================================================================

/// The three record families managed by the registry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RegistryKind {
    #[default]
    #[serde(rename = "basket")]
    Basket,
    #[serde(rename = "proto")]
    Protocol,
    #[serde(rename = "cert")]
    Certificate,
}

impl RegistryKind {
    pub const ALL: [Self; 3] = [Self::Basket, Self::Protocol, Self::Certificate];

    /// Wire spelling of the discriminant.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basket => "basket",
            Self::Protocol => "proto",
            Self::Certificate => "cert",
        }
    }

    /// Singular human label, used in form titles.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Basket => "Basket",
            Self::Protocol => "Protocol",
            Self::Certificate => "Certificate Type",
        }
    }

    /// Tab label.
    #[must_use]
    pub fn tab_label(self) -> &'static str {
        match self {
            Self::Basket => "Baskets",
            Self::Protocol => "Protocols",
            Self::Certificate => "Certificate Types",
        }
    }
}

impl fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown registry kind: {0}")]
pub struct KindParseError(pub String);

impl FromStr for RegistryKind {
    type Err = KindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basket" | "baskets" => Ok(Self::Basket),
            "proto" | "protocol" | "protocols" => Ok(Self::Protocol),
            "cert" | "certificate" | "certificates" => Ok(Self::Certificate),
            other => Err(KindParseError(other.to_owned())),
        }
    }
}

// =============================================================================
// SECURITY LEVEL
// =============================================================================

/// Permission strictness tier for a protocol. Serialized as the bare integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SecurityLevel {
    Basic,
    Enhanced,
    Maximum,
}

impl SecurityLevel {
    pub const ALL: [Self; 3] = [Self::Basic, Self::Enhanced, Self::Maximum];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Basic => "Level 0 (Basic)",
            Self::Enhanced => "Level 1 (Enhanced)",
            Self::Maximum => "Level 2 (Maximum)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("security level must be 0, 1, or 2 (got {0})")]
pub struct SecurityLevelError(pub String);

impl TryFrom<u8> for SecurityLevel {
    type Error = SecurityLevelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Basic),
            1 => Ok(Self::Enhanced),
            2 => Ok(Self::Maximum),
            other => Err(SecurityLevelError(other.to_string())),
        }
    }
}

impl From<SecurityLevel> for u8 {
    fn from(level: SecurityLevel) -> Self {
        match level {
            SecurityLevel::Basic => 0,
            SecurityLevel::Enhanced => 1,
            SecurityLevel::Maximum => 2,
        }
    }
}

impl FromStr for SecurityLevel {
    type Err = SecurityLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        raw.parse::<u8>()
            .map_err(|_| SecurityLevelError(raw.to_owned()))
            .and_then(Self::try_from)
    }
}

impl fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

// =============================================================================
// CERTIFICATE FIELDS
// =============================================================================

/// How a certificate field's value should be presented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CertificateFieldType {
    #[default]
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "imageURL")]
    ImageUrl,
    #[serde(rename = "other")]
    Other,
}

impl CertificateFieldType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::ImageUrl => "imageURL",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("field type must be text, imageURL, or other (got {0})")]
pub struct FieldTypeParseError(pub String);

impl FromStr for CertificateFieldType {
    type Err = FieldTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "imageurl" | "image" => Ok(Self::ImageUrl),
            "other" => Ok(Self::Other),
            other => Err(FieldTypeParseError(other.to_owned())),
        }
    }
}

/// Schema entry for one field of a certificate type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateFieldDescriptor {
    pub friendly_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub field_type: CertificateFieldType,
    #[serde(default)]
    pub field_icon: String,
}

/// Certificate field schema keyed by field name. Keys are unique by construction.
pub type CertificateFields = BTreeMap<String, CertificateFieldDescriptor>;

// =============================================================================
// RECORD PARTS
// =============================================================================

/// Per-kind payload. The `kind` tag is the only discriminant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum RecordData {
    #[serde(rename = "basket")]
    Basket {
        #[serde(rename = "basketID")]
        basket_id: String,
    },
    #[serde(rename = "proto")]
    Protocol {
        #[serde(rename = "protocolID")]
        protocol_id: String,
        #[serde(rename = "securityLevel")]
        security_level: SecurityLevel,
    },
    #[serde(rename = "cert")]
    Certificate {
        #[serde(rename = "type")]
        cert_type: String,
        #[serde(default)]
        fields: CertificateFields,
    },
}

impl RecordData {
    #[must_use]
    pub fn kind(&self) -> RegistryKind {
        match self {
            Self::Basket { .. } => RegistryKind::Basket,
            Self::Protocol { .. } => RegistryKind::Protocol,
            Self::Certificate { .. } => RegistryKind::Certificate,
        }
    }

    /// The user-supplied identifier for this record.
    #[must_use]
    pub fn identifier(&self) -> &str {
        match self {
            Self::Basket { basket_id } => basket_id,
            Self::Protocol { protocol_id, .. } => protocol_id,
            Self::Certificate { cert_type, .. } => cert_type,
        }
    }

    /// Whether two payloads name the same registry entry.
    ///
    /// Protocol identity includes the security level: the same protocol name
    /// may be registered once per level.
    #[must_use]
    pub fn same_identity(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Basket { basket_id: a }, Self::Basket { basket_id: b }) => a == b,
            (
                Self::Protocol { protocol_id: a, security_level: la },
                Self::Protocol { protocol_id: b, security_level: lb },
            ) => a == b && la == lb,
            (Self::Certificate { cert_type: a, .. }, Self::Certificate { cert_type: b, .. }) => a == b,
            _ => false,
        }
    }
}

/// Descriptive fields shared by every kind.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMeta {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "iconURL", default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(rename = "documentationURL", default, skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,
}

/// Ledger anchor assigned at registration.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Outpoint {
    pub txid: String,
    pub vout: u32,
}

impl fmt::Display for Outpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.txid, self.vout)
    }
}

// =============================================================================
// DRAFT / RECORD
// =============================================================================

/// A registration payload: everything except the ledger anchor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDraft {
    #[serde(flatten)]
    pub meta: RecordMeta,
    #[serde(flatten)]
    pub data: RecordData,
}

impl RecordDraft {
    #[must_use]
    pub fn kind(&self) -> RegistryKind {
        self.data.kind()
    }

    /// Attach the anchor assigned by the registry.
    #[must_use]
    pub fn into_record(self, outpoint: Outpoint) -> RegistryRecord {
        RegistryRecord { meta: self.meta, data: self.data, outpoint }
    }
}

/// A live registry entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryRecord {
    #[serde(flatten)]
    pub meta: RecordMeta,
    #[serde(flatten)]
    pub data: RecordData,
    #[serde(flatten)]
    pub outpoint: Outpoint,
}

impl RegistryRecord {
    #[must_use]
    pub fn kind(&self) -> RegistryKind {
        self.data.kind()
    }

    /// The draft this record was registered from.
    #[must_use]
    pub fn draft(&self) -> RecordDraft {
        RecordDraft { meta: self.meta.clone(), data: self.data.clone() }
    }
}
