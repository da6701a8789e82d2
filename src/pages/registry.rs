//! Registry page: tabbed lists of the operator's entries plus the
//! registration form.
//!
//! DESIGN
//! ======
//! The page never caches across kinds. Switching tabs clears the list and
//! fetches fresh; every successful mutation is followed by one re-fetch.
//! Each register/revoke/load completion pushes exactly one notification.
//!
//! ERROR HANDLING
//! ==============
//! Client failures stop here: they become destructive notifications and
//! the page stays usable. Form validation failures never reach the client;
//! they stay inline on the form.

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use std::fmt::Write;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::components::card::RegistryCard;
use crate::components::form_panel;
use crate::error::ErrorCode;
use crate::net::client::{ClientError, RegistryClient};
use crate::net::types::{Outpoint, RegistryKind, RegistryRecord};
use crate::state::form::FormController;
use crate::state::notice::Notification;

/// What the content area currently shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageView {
    Loading,
    Empty,
    Cards(Vec<RegistryCard>),
}

pub struct RegistryPage {
    client: Arc<dyn RegistryClient>,
    active_kind: RegistryKind,
    items: Vec<RegistryRecord>,
    loading: bool,
    form: FormController,
    notices: Vec<Notification>,
}

impl RegistryPage {
    /// A page on the basket tab, in the loading state until [`load`](Self::load) runs.
    #[must_use]
    pub fn new(client: Arc<dyn RegistryClient>) -> Self {
        Self {
            client,
            active_kind: RegistryKind::default(),
            items: Vec::new(),
            loading: true,
            form: FormController::new(),
            notices: Vec::new(),
        }
    }

    #[must_use]
    pub fn active_kind(&self) -> RegistryKind {
        self.active_kind
    }

    #[must_use]
    pub fn items(&self) -> &[RegistryRecord] {
        &self.items
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn form(&self) -> &FormController {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormController {
        &mut self.form
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notices)
    }

    #[must_use]
    pub fn view(&self) -> PageView {
        if self.loading {
            PageView::Loading
        } else if self.items.is_empty() {
            PageView::Empty
        } else {
            PageView::Cards(self.items.iter().map(RegistryCard::from_record).collect())
        }
    }

    /// Fetch the active kind's entries from scratch.
    pub async fn load(&mut self) {
        self.fetch(true).await;
    }

    /// Re-fetch after a register or revoke. The completion already queued its
    /// one notification, so a failed refresh is only logged.
    async fn refresh(&mut self) {
        self.fetch(false).await;
    }

    async fn fetch(&mut self, notify: bool) {
        self.loading = true;
        match self.client.list(self.active_kind).await {
            Ok(records) => {
                debug!(kind = %self.active_kind, count = records.len(), "registry list loaded");
                self.items = records;
            }
            Err(e) => {
                warn!(kind = %self.active_kind, code = e.error_code(), error = %e, "registry list failed");
                if notify {
                    self.notices.push(Notification::failure(
                        "Error loading items",
                        "Failed to load registry items. Please try again.",
                        &e,
                    ));
                }
            }
        }
        self.loading = false;
    }

    /// Switch tabs. Fetches only when `kind` differs from the active one.
    /// Returns whether a switch happened.
    pub async fn set_active_kind(&mut self, kind: RegistryKind) -> bool {
        if kind == self.active_kind {
            return false;
        }
        self.active_kind = kind;
        self.items.clear();
        if self.form.is_open() {
            self.form.cancel();
        }
        self.load().await;
        true
    }

    /// Open a blank form for the active kind.
    pub fn open_form(&mut self) {
        self.form.open(self.active_kind);
    }

    /// Submit the open form. Returns whether the entry was registered.
    ///
    /// A validation failure leaves the form open with its inline error and
    /// makes no client call. Otherwise the form closes immediately and the
    /// outcome is reported as a notification.
    pub async fn submit_form(&mut self) -> bool {
        let draft = match self.form.submit() {
            Ok(draft) => draft,
            Err(e) => {
                debug!(code = e.error_code(), error = %e, "form submit rejected");
                return false;
            }
        };
        self.form.resolve(Ok(()));

        let kind = draft.kind();
        match self.client.register(draft).await {
            Ok(record) => {
                info!(%kind, outpoint = %record.outpoint, "registered");
                self.notices.push(Notification::success("Success", "Item registered successfully"));
                self.refresh().await;
                true
            }
            Err(e) => {
                warn!(%kind, code = e.error_code(), error = %e, "registration failed");
                self.notices.push(Notification::failure(
                    "Registration failed",
                    "Failed to register item. Please try again.",
                    &e,
                ));
                false
            }
        }
    }

    /// Revoke the listed entry anchored at `outpoint`. Returns whether it was revoked.
    pub async fn revoke(&mut self, outpoint: &Outpoint) -> bool {
        let kind = self.active_kind;
        let result = match self.items.iter().find(|r| &r.outpoint == outpoint).cloned() {
            Some(record) => self.client.revoke(kind, &record).await,
            None => Err(ClientError::NotFound { kind, outpoint: outpoint.clone() }),
        };
        match result {
            Ok(()) => {
                info!(%kind, %outpoint, "revoked");
                self.notices.push(Notification::success("Success", "Item revoked successfully"));
                self.refresh().await;
                true
            }
            Err(e) => {
                warn!(%kind, %outpoint, code = e.error_code(), error = %e, "revocation failed");
                self.notices.push(Notification::failure(
                    "Revocation failed",
                    "Failed to revoke item. Please try again.",
                    &e,
                ));
                false
            }
        }
    }

    /// Listed entries whose txid starts with `prefix`.
    #[must_use]
    pub fn find_by_txid_prefix(&self, prefix: &str) -> Vec<&RegistryRecord> {
        let prefix = prefix.to_ascii_lowercase();
        self.items.iter().filter(|r| r.outpoint.txid.starts_with(&prefix)).collect()
    }

    /// Plain-text rendering of the whole page.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::from("Registrant\n");
        let tabs: Vec<String> = RegistryKind::ALL
            .iter()
            .map(|&kind| {
                if kind == self.active_kind { format!("[{}]", kind.tab_label()) } else { kind.tab_label().to_owned() }
            })
            .collect();
        let _ = writeln!(out, "{}", tabs.join("  "));
        let _ = writeln!(out);
        match self.view() {
            PageView::Loading => out.push_str("Loading...\n"),
            PageView::Empty => {
                out.push_str("No items registered yet\nRegister a new entry to get started\n");
            }
            PageView::Cards(cards) => {
                for card in cards {
                    out.push_str(&card.render_text());
                    out.push('\n');
                }
            }
        }
        if self.form.is_open() {
            let _ = writeln!(out);
            out.push_str(&form_panel::render_text(&self.form));
        }
        out
    }
}
