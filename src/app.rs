//! Top-level routing between the start page and the registry page.
//!
//! SYSTEM CONTEXT
//! ==============
//! Authenticated operators see the registry page; everyone else sees the
//! start page. The registry page's client is bound to the operator identity
//! at login and dropped at logout, so no entries leak across sessions.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::sync::Arc;

use tracing::info;

use crate::net::client::RegistryClient;
use crate::net::mock::{MockLatency, MockRegistry};
use crate::pages::registry::RegistryPage;
use crate::pages::start::StartPage;
use crate::state::auth::AuthStore;
use crate::state::notice::Notification;

/// Builds a registry client for an operator identity.
pub trait ClientFactory: Send + Sync {
    fn client_for(&self, operator_id: &str) -> Arc<dyn RegistryClient>;
}

/// Hands out per-operator clients onto one shared mock registry.
#[derive(Debug, Clone, Default)]
pub struct MockClientFactory {
    pub registry: MockRegistry,
    pub latency: MockLatency,
}

impl ClientFactory for MockClientFactory {
    fn client_for(&self, operator_id: &str) -> Arc<dyn RegistryClient> {
        Arc::new(self.registry.client(operator_id, self.latency))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Start,
    Registry,
}

pub struct App {
    auth: AuthStore,
    start: StartPage,
    registry: Option<RegistryPage>,
    mounted_for: Option<String>,
    factory: Box<dyn ClientFactory>,
}

impl App {
    #[must_use]
    pub fn new(auth: AuthStore, factory: Box<dyn ClientFactory>) -> Self {
        Self { auth, start: StartPage::new(), registry: None, mounted_for: None, factory }
    }

    #[must_use]
    pub fn route(&self) -> Route {
        if self.auth.is_authenticated() { Route::Registry } else { Route::Start }
    }

    #[must_use]
    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    pub fn auth_mut(&mut self) -> &mut AuthStore {
        &mut self.auth
    }

    pub fn start_mut(&mut self) -> &mut StartPage {
        &mut self.start
    }

    #[must_use]
    pub fn registry(&self) -> Option<&RegistryPage> {
        self.registry.as_ref()
    }

    pub fn registry_mut(&mut self) -> Option<&mut RegistryPage> {
        self.registry.as_mut()
    }

    /// Bring the registry page in line with the auth state: mount and load it
    /// after a login, drop it after a logout, and remount it when the
    /// operator changed without a logout in between.
    pub async fn sync(&mut self) {
        let operator = self.auth.operator_id();
        if operator == self.mounted_for {
            return;
        }
        if self.registry.take().is_some() {
            info!("unmounting registry page");
        }
        self.mounted_for = None;
        if let Some(operator) = operator {
            info!(%operator, "mounting registry page");
            let mut page = RegistryPage::new(self.factory.client_for(&operator));
            page.load().await;
            self.registry = Some(page);
            self.mounted_for = Some(operator);
        }
    }

    pub async fn login_wallet(&mut self) {
        self.start.use_wallet(&mut self.auth);
        self.sync().await;
    }

    pub async fn login_private_key(&mut self, raw: &str) -> bool {
        self.start.show_private_key_input();
        let ok = self.start.submit_private_key(&mut self.auth, raw);
        self.sync().await;
        ok
    }

    pub async fn logout(&mut self) {
        self.auth.logout();
        self.start.back();
        self.sync().await;
    }

    /// Drain notifications from every page.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        let mut notices = self.start.take_notifications();
        if let Some(page) = self.registry.as_mut() {
            notices.extend(page.take_notifications());
        }
        notices
    }

    #[must_use]
    pub fn render_text(&self) -> String {
        match (&self.registry, self.route()) {
            (Some(page), Route::Registry) => page.render_text(),
            _ => self.start.render_text(),
        }
    }
}
