use super::*;
use crate::state::auth::AuthMethod;
use crate::state::notice::NoticeVariant;

const KEY: &str = "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff";

#[test]
fn starts_on_choose_view() {
    assert_eq!(StartPage::new().view(), StartView::Choose);
}

#[test]
fn use_wallet_logs_in_and_notifies() {
    let mut page = StartPage::new();
    let mut auth = AuthStore::new();
    page.use_wallet(&mut auth);
    assert_eq!(auth.state().method(), Some(AuthMethod::Wallet));
    let notices = page.take_notifications();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].title, "Connected to wallet");
    assert!(page.take_notifications().is_empty());
}

#[test]
fn private_key_entry_and_back() {
    let mut page = StartPage::new();
    page.show_private_key_input();
    assert_eq!(page.view(), StartView::PrivateKeyEntry);
    assert!(page.render_text().starts_with("Enter Private Key"));
    page.back();
    assert_eq!(page.view(), StartView::Choose);
}

#[test]
fn valid_private_key_logs_in() {
    let mut page = StartPage::new();
    let mut auth = AuthStore::new();
    page.show_private_key_input();
    assert!(page.submit_private_key(&mut auth, KEY));
    assert_eq!(auth.state().method(), Some(AuthMethod::PrivateKey));
    assert!(page.take_notifications().is_empty());
}

#[test]
fn invalid_private_key_notifies_without_state_change() {
    let mut page = StartPage::new();
    let mut auth = AuthStore::new();
    page.show_private_key_input();
    assert!(!page.submit_private_key(&mut auth, "not-a-key"));
    assert!(!auth.is_authenticated());
    assert_eq!(page.view(), StartView::PrivateKeyEntry);

    let notices = page.take_notifications();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].title, "Invalid private key");
    assert_eq!(notices[0].variant, NoticeVariant::Destructive);
    assert_eq!(notices[0].code, Some("E_INVALID_PRIVATE_KEY"));
}
