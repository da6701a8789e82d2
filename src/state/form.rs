//! Registration form state machine.
//!
//! DESIGN
//! ======
//! `Closed -> Editing` on open, `Editing -> Closed` on cancel (all edits
//! discarded), `Editing -> Submitting` on a submit that passes validation,
//! then `Submitting -> Closed` or back to `Editing` with the failure
//! surfaced, depending on how the host resolves the submission.
//!
//! Validation failures never leave `Editing` and never produce a payload, so
//! they cannot reach the registry client.

#[cfg(test)]
#[path = "form_test.rs"]
mod form_test;

use std::collections::HashSet;
use std::str::FromStr;

use crate::net::types::{
    CertificateFieldDescriptor, CertificateFieldType, CertificateFields, RecordData, RecordDraft, RecordMeta,
    RegistryKind, SecurityLevel,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("select a security level")]
    MissingSecurityLevel,
    #[error("{field} must be an http:// or https:// URL")]
    InvalidUrl { field: &'static str, value: String },
    #[error("certificate field #{} needs a name", .index + 1)]
    EmptyCertificateFieldName { index: usize },
    #[error("duplicate certificate field name: {0}")]
    DuplicateCertificateField(String),
    #[error("{input} does not apply to {kind} entries")]
    NotApplicable { input: &'static str, kind: RegistryKind },
    #[error("no certificate field #{}", .0 + 1)]
    NoSuchCertificateField(usize),
    #[error("{0}")]
    InvalidValue(String),
    #[error("form is not open for editing")]
    NotEditing,
}

impl crate::error::ErrorCode for ValidationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingField(_) | Self::MissingSecurityLevel => "E_VALIDATION_REQUIRED",
            Self::InvalidUrl { .. } => "E_VALIDATION_URL",
            Self::EmptyCertificateFieldName { .. } | Self::DuplicateCertificateField(_) => "E_VALIDATION_CERT_FIELD",
            Self::NotApplicable { .. } | Self::NoSuchCertificateField(_) | Self::InvalidValue(_) => {
                "E_VALIDATION_INPUT"
            }
            Self::NotEditing => "E_FORM_NOT_EDITING",
        }
    }
}

// =============================================================================
// INPUTS
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormPhase {
    #[default]
    Closed,
    Editing,
    Submitting,
}

/// Free-text inputs on the form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormInput {
    Name,
    Description,
    IconUrl,
    DocumentationUrl,
    BasketId,
    ProtocolId,
    CertificateType,
}

impl FormInput {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::IconUrl => "iconURL",
            Self::DocumentationUrl => "documentationURL",
            Self::BasketId => "basketID",
            Self::ProtocolId => "protocolID",
            Self::CertificateType => "type",
        }
    }

    #[must_use]
    pub fn applies_to(self, kind: RegistryKind) -> bool {
        match self {
            Self::Name | Self::Description | Self::IconUrl | Self::DocumentationUrl => true,
            Self::BasketId => kind == RegistryKind::Basket,
            Self::ProtocolId => kind == RegistryKind::Protocol,
            Self::CertificateType => kind == RegistryKind::Certificate,
        }
    }
}

impl FromStr for FormInput {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "description" | "desc" => Ok(Self::Description),
            "iconurl" | "icon" => Ok(Self::IconUrl),
            "documentationurl" | "docs" | "documentation" => Ok(Self::DocumentationUrl),
            "basketid" | "basket" => Ok(Self::BasketId),
            "protocolid" | "protocol" => Ok(Self::ProtocolId),
            "type" | "certtype" => Ok(Self::CertificateType),
            other => Err(ValidationError::InvalidValue(format!("unknown form input: {other}"))),
        }
    }
}

/// Attributes of one certificate field row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CertFieldAttr {
    Name,
    FriendlyName,
    Description,
    Type,
    Icon,
}

impl FromStr for CertFieldAttr {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "friendly" | "friendlyname" => Ok(Self::FriendlyName),
            "description" | "desc" => Ok(Self::Description),
            "type" => Ok(Self::Type),
            "icon" | "fieldicon" => Ok(Self::Icon),
            other => Err(ValidationError::InvalidValue(format!("unknown field attribute: {other}"))),
        }
    }
}

/// One editable row in the certificate field list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CertFieldDraft {
    pub name: String,
    pub friendly_name: String,
    pub description: String,
    pub field_type: CertificateFieldType,
    pub field_icon: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct FormInputs {
    name: String,
    description: String,
    icon_url: String,
    documentation_url: String,
    basket_id: String,
    protocol_id: String,
    cert_type: String,
}

impl FormInputs {
    fn slot(&mut self, input: FormInput) -> &mut String {
        match input {
            FormInput::Name => &mut self.name,
            FormInput::Description => &mut self.description,
            FormInput::IconUrl => &mut self.icon_url,
            FormInput::DocumentationUrl => &mut self.documentation_url,
            FormInput::BasketId => &mut self.basket_id,
            FormInput::ProtocolId => &mut self.protocol_id,
            FormInput::CertificateType => &mut self.cert_type,
        }
    }

    fn get(&self, input: FormInput) -> &str {
        match input {
            FormInput::Name => &self.name,
            FormInput::Description => &self.description,
            FormInput::IconUrl => &self.icon_url,
            FormInput::DocumentationUrl => &self.documentation_url,
            FormInput::BasketId => &self.basket_id,
            FormInput::ProtocolId => &self.protocol_id,
            FormInput::CertificateType => &self.cert_type,
        }
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

/// Modal registration form for one registry kind.
#[derive(Clone, Debug, Default)]
pub struct FormController {
    phase: FormPhase,
    kind: RegistryKind,
    inputs: FormInputs,
    security_level: Option<SecurityLevel>,
    cert_fields: Vec<CertFieldDraft>,
    error: Option<String>,
}

impl FormController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.phase != FormPhase::Closed
    }

    #[must_use]
    pub fn kind(&self) -> RegistryKind {
        self.kind
    }

    #[must_use]
    pub fn title(&self) -> String {
        format!("Register New {}", self.kind.label())
    }

    #[must_use]
    pub fn value(&self, input: FormInput) -> &str {
        self.inputs.get(input)
    }

    #[must_use]
    pub fn security_level(&self) -> Option<SecurityLevel> {
        self.security_level
    }

    #[must_use]
    pub fn cert_fields(&self) -> &[CertFieldDraft] {
        &self.cert_fields
    }

    /// Inline error from the last rejected submit or failed submission.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Open a blank form for `kind`.
    pub fn open(&mut self, kind: RegistryKind) {
        *self = Self { phase: FormPhase::Editing, kind, ..Self::default() };
    }

    /// Close the form, discarding every edit.
    pub fn cancel(&mut self) {
        *self = Self { kind: self.kind, ..Self::default() };
    }

    /// Set a free-text input.
    ///
    /// # Errors
    ///
    /// Rejects edits outside `Editing` and inputs that belong to another kind.
    pub fn set(&mut self, input: FormInput, value: &str) -> Result<(), ValidationError> {
        self.ensure_editing()?;
        if !input.applies_to(self.kind) {
            return Err(ValidationError::NotApplicable { input: input.as_str(), kind: self.kind });
        }
        value.clone_into(self.inputs.slot(input));
        self.error = None;
        Ok(())
    }

    /// Choose the protocol security level.
    ///
    /// # Errors
    ///
    /// Rejects edits outside `Editing` and on non-protocol forms.
    pub fn select_security_level(&mut self, level: SecurityLevel) -> Result<(), ValidationError> {
        self.ensure_editing()?;
        if self.kind != RegistryKind::Protocol {
            return Err(ValidationError::NotApplicable { input: "securityLevel", kind: self.kind });
        }
        self.security_level = Some(level);
        self.error = None;
        Ok(())
    }

    /// Append an empty certificate field row and return its index.
    ///
    /// # Errors
    ///
    /// Rejects edits outside `Editing` and on non-certificate forms.
    pub fn add_cert_field(&mut self) -> Result<usize, ValidationError> {
        self.ensure_cert_editing()?;
        self.cert_fields.push(CertFieldDraft::default());
        Ok(self.cert_fields.len() - 1)
    }

    /// Remove exactly the row at `index`; later rows shift down by one.
    ///
    /// # Errors
    ///
    /// Rejects out-of-range indexes and edits outside a certificate form.
    pub fn remove_cert_field(&mut self, index: usize) -> Result<CertFieldDraft, ValidationError> {
        self.ensure_cert_editing()?;
        if index >= self.cert_fields.len() {
            return Err(ValidationError::NoSuchCertificateField(index));
        }
        Ok(self.cert_fields.remove(index))
    }

    /// Update one attribute of the row at `index`.
    ///
    /// # Errors
    ///
    /// Rejects out-of-range indexes, unknown field types, and edits outside a
    /// certificate form.
    pub fn update_cert_field(&mut self, index: usize, attr: CertFieldAttr, value: &str) -> Result<(), ValidationError> {
        self.ensure_cert_editing()?;
        let field = self
            .cert_fields
            .get_mut(index)
            .ok_or(ValidationError::NoSuchCertificateField(index))?;
        match attr {
            CertFieldAttr::Name => value.clone_into(&mut field.name),
            CertFieldAttr::FriendlyName => value.clone_into(&mut field.friendly_name),
            CertFieldAttr::Description => value.clone_into(&mut field.description),
            CertFieldAttr::Icon => value.clone_into(&mut field.field_icon),
            CertFieldAttr::Type => {
                field.field_type = value
                    .parse()
                    .map_err(|e: crate::net::types::FieldTypeParseError| ValidationError::InvalidValue(e.to_string()))?;
            }
        }
        self.error = None;
        Ok(())
    }

    /// Validate and, on success, enter `Submitting` with the payload.
    ///
    /// # Errors
    ///
    /// On a validation failure the form stays in `Editing` and the error is
    /// also kept as the inline message.
    pub fn submit(&mut self) -> Result<RecordDraft, ValidationError> {
        self.ensure_editing()?;
        match self.build_draft() {
            Ok(draft) => {
                self.phase = FormPhase::Submitting;
                self.error = None;
                Ok(draft)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Finish a submission started by [`submit`](Self::submit).
    ///
    /// Success closes the form; failure returns to `Editing` with every input
    /// intact and `message` shown inline.
    pub fn resolve(&mut self, outcome: Result<(), String>) {
        if self.phase != FormPhase::Submitting {
            return;
        }
        match outcome {
            Ok(()) => self.cancel(),
            Err(message) => {
                self.phase = FormPhase::Editing;
                self.error = Some(message);
            }
        }
    }

    fn ensure_editing(&self) -> Result<(), ValidationError> {
        if self.phase == FormPhase::Editing { Ok(()) } else { Err(ValidationError::NotEditing) }
    }

    fn ensure_cert_editing(&self) -> Result<(), ValidationError> {
        self.ensure_editing()?;
        if self.kind != RegistryKind::Certificate {
            return Err(ValidationError::NotApplicable { input: "fields", kind: self.kind });
        }
        Ok(())
    }

    fn build_draft(&self) -> Result<RecordDraft, ValidationError> {
        let data = match self.kind {
            RegistryKind::Basket => RecordData::Basket { basket_id: required(&self.inputs, FormInput::BasketId)? },
            RegistryKind::Protocol => {
                let protocol_id = required(&self.inputs, FormInput::ProtocolId)?;
                let security_level = self.security_level.ok_or(ValidationError::MissingSecurityLevel)?;
                RecordData::Protocol { protocol_id, security_level }
            }
            RegistryKind::Certificate => RecordData::Certificate {
                cert_type: required(&self.inputs, FormInput::CertificateType)?,
                fields: build_cert_fields(&self.cert_fields)?,
            },
        };
        let meta = RecordMeta {
            name: required(&self.inputs, FormInput::Name)?,
            description: optional(self.inputs.get(FormInput::Description)),
            icon_url: optional_url(&self.inputs, FormInput::IconUrl)?,
            documentation_url: optional_url(&self.inputs, FormInput::DocumentationUrl)?,
        };
        Ok(RecordDraft { meta, data })
    }
}

fn required(inputs: &FormInputs, input: FormInput) -> Result<String, ValidationError> {
    optional(inputs.get(input)).ok_or(ValidationError::MissingField(input.as_str()))
}

fn optional(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

fn optional_url(inputs: &FormInputs, input: FormInput) -> Result<Option<String>, ValidationError> {
    let Some(url) = optional(inputs.get(input)) else {
        return Ok(None);
    };
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(Some(url))
    } else {
        Err(ValidationError::InvalidUrl { field: input.as_str(), value: url })
    }
}

fn build_cert_fields(rows: &[CertFieldDraft]) -> Result<CertificateFields, ValidationError> {
    let mut seen = HashSet::new();
    let mut fields = CertificateFields::new();
    for (index, row) in rows.iter().enumerate() {
        let name = row.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyCertificateFieldName { index });
        }
        if !seen.insert(name) {
            return Err(ValidationError::DuplicateCertificateField(name.to_owned()));
        }
        let friendly_name = optional(&row.friendly_name).unwrap_or_else(|| name.to_owned());
        fields.insert(
            name.to_owned(),
            CertificateFieldDescriptor {
                friendly_name,
                description: row.description.trim().to_owned(),
                field_type: row.field_type,
                field_icon: row.field_icon.trim().to_owned(),
            },
        );
    }
    Ok(fields)
}
