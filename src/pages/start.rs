//! Start page: choose between the local wallet and a raw private key.

#[cfg(test)]
#[path = "start_test.rs"]
mod start_test;

use tracing::debug;

use crate::state::auth::{AuthStore, WalletHandle};
use crate::state::notice::Notification;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StartView {
    #[default]
    Choose,
    PrivateKeyEntry,
}

#[derive(Clone, Debug, Default)]
pub struct StartPage {
    view: StartView,
    notices: Vec<Notification>,
}

impl StartPage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn view(&self) -> StartView {
        self.view
    }

    pub fn use_wallet(&mut self, auth: &mut AuthStore) {
        auth.login_wallet(WalletHandle::local());
        self.view = StartView::Choose;
        self.notices
            .push(Notification::success("Connected to wallet", "Successfully connected to your local wallet"));
    }

    pub fn show_private_key_input(&mut self) {
        self.view = StartView::PrivateKeyEntry;
    }

    pub fn back(&mut self) {
        self.view = StartView::Choose;
    }

    /// Try to log in with `raw`. Returns whether the login succeeded.
    ///
    /// A malformed key produces a destructive notification and leaves `auth`
    /// untouched.
    pub fn submit_private_key(&mut self, auth: &mut AuthStore, raw: &str) -> bool {
        match auth.login_private_key(raw) {
            Ok(()) => {
                self.view = StartView::Choose;
                true
            }
            Err(e) => {
                debug!(error = %e, "private key rejected");
                self.notices.push(Notification::failure(
                    "Invalid private key",
                    "Please enter a valid 32-byte hex-encoded private key",
                    &e,
                ));
                false
            }
        }
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notices)
    }

    #[must_use]
    pub fn render_text(&self) -> String {
        match self.view {
            StartView::Choose => "Welcome to Registrant\n\
                 Register and manage your entries for baskets, protocols, and certificate types.\n\
                 \n  login wallet     Use Local Wallet\n  login key <hex>  Enter Private Key\n"
                .to_owned(),
            StartView::PrivateKeyEntry => "Enter Private Key\n\
                 Enter your private key to access the registry.\n\
                 Your private key never leaves this process and is only used to sign transactions.\n"
                .to_owned(),
        }
    }
}
