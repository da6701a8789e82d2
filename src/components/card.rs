//! Card view for a single registry entry.
//!
//! DESIGN
//! ======
//! The title and per-kind details come from matching on the record's
//! `RecordData`, never from probing which optional fields happen to be set.
//! The card owns no behavior beyond naming its revoke target.

#[cfg(test)]
#[path = "card_test.rs"]
mod card_test;

use std::fmt::Write;

use crate::net::types::{Outpoint, RecordData, RegistryRecord};

/// Display model for one entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistryCard {
    pub title: String,
    pub description: Option<String>,
    pub name: String,
    pub documentation_url: Option<String>,
    pub security_level: Option<String>,
    /// Pretty-printed certificate field schema, when there is one.
    pub fields_json: Option<String>,
    pub outpoint: Outpoint,
}

impl RegistryCard {
    #[must_use]
    pub fn from_record(record: &RegistryRecord) -> Self {
        let (title, security_level, fields_json) = match &record.data {
            RecordData::Basket { basket_id } => (format!("Basket: {basket_id}"), None, None),
            RecordData::Protocol { protocol_id, security_level } => {
                (format!("Protocol: {protocol_id}"), Some(security_level.label().to_owned()), None)
            }
            RecordData::Certificate { cert_type, fields } => {
                let json = if fields.is_empty() { None } else { serde_json::to_string_pretty(fields).ok() };
                (format!("Certificate: {cert_type}"), None, json)
            }
        };
        Self {
            title,
            description: record.meta.description.clone(),
            name: record.meta.name.clone(),
            documentation_url: record.meta.documentation_url.clone(),
            security_level,
            fields_json,
            outpoint: record.outpoint.clone(),
        }
    }

    /// What the card's revoke action targets.
    #[must_use]
    pub fn revoke_target(&self) -> &Outpoint {
        &self.outpoint
    }

    /// Plain-text rendering for terminal output.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.title);
        if let Some(description) = &self.description {
            let _ = writeln!(out, "  {description}");
        }
        let _ = writeln!(out, "  Name: {}", self.name);
        if let Some(level) = &self.security_level {
            let _ = writeln!(out, "  Security: {level}");
        }
        if let Some(url) = &self.documentation_url {
            let _ = writeln!(out, "  Documentation: {url}");
        }
        if let Some(json) = &self.fields_json {
            let _ = writeln!(out, "  Fields:");
            for line in json.lines() {
                let _ = writeln!(out, "    {line}");
            }
        }
        let _ = writeln!(out, "  TXID: {}", self.outpoint.txid);
        out
    }
}
