//! Text rendering of the registration dialog.

#[cfg(test)]
#[path = "form_panel_test.rs"]
mod form_panel_test;

use std::fmt::Write;

use crate::net::types::RegistryKind;
use crate::state::form::{FormController, FormInput, FormPhase};

#[must_use]
pub fn render_text(form: &FormController) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", form.title());
    let _ = writeln!(
        out,
        "Fill in the details below to register a new {} in the registry.",
        form.kind().label().to_ascii_lowercase()
    );

    let kind_inputs: &[FormInput] = match form.kind() {
        RegistryKind::Basket => &[FormInput::BasketId],
        RegistryKind::Protocol => &[FormInput::ProtocolId],
        RegistryKind::Certificate => &[FormInput::CertificateType],
    };
    let shared = [FormInput::Name, FormInput::Description, FormInput::IconUrl, FormInput::DocumentationUrl];
    for &input in kind_inputs {
        let _ = writeln!(out, "  {:<17} {}", input.as_str(), form.value(input));
    }
    if form.kind() == RegistryKind::Protocol {
        let level = form.security_level().map_or("(select security level)", |l| l.label());
        let _ = writeln!(out, "  {:<17} {level}", "securityLevel");
    }
    if form.kind() == RegistryKind::Certificate {
        if form.cert_fields().is_empty() {
            let _ = writeln!(out, "  fields            (none yet)");
        }
        for (i, field) in form.cert_fields().iter().enumerate() {
            let _ = writeln!(
                out,
                "  field #{:<10} {} [{}] {}",
                i + 1,
                if field.name.is_empty() { "(unnamed)" } else { field.name.as_str() },
                field.field_type.as_str(),
                field.friendly_name
            );
        }
    }
    for input in shared {
        let _ = writeln!(out, "  {:<17} {}", input.as_str(), form.value(input));
    }
    if let Some(error) = form.error() {
        let _ = writeln!(out, "  error: {error}");
    }
    if form.phase() == FormPhase::Submitting {
        let _ = writeln!(out, "  Registering...");
    }
    out
}
