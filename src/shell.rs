//! Line-oriented terminal front end.
//!
//! DESIGN
//! ======
//! Parsing and execution are separate: `parse_command` turns one input line
//! into a `ShellCommand` without touching state, and `Shell::execute` applies
//! it to the `App`. A rejected line never changes state.

#[cfg(test)]
#[path = "shell_test.rs"]
mod shell_test;

use std::fmt::Write;

use crate::app::{App, Route};
use crate::error::ErrorCode;
use crate::net::types::{KindParseError, RegistryKind, SecurityLevel, SecurityLevelError};
use crate::state::form::{CertFieldAttr, FormInput, ValidationError};

pub const HELP: &str = "\
commands:
  login wallet               connect the local wallet
  login key [<hex>]          log in with a 64-hex-character private key
  back                       leave the private key prompt
  logout                     end the session
  tab <basket|proto|cert>    switch the active tab
  list                       reload the active tab
  new                        open the registration form
  set <input> <value...>     set name, description, iconURL, documentationURL,
                             basketID, protocolID, or type
  level <0|1|2>              choose the protocol security level
  field add                  add a certificate field
  field rm <n>               remove certificate field n
  field set <n> <attr> <v>   set name, friendly, description, type, or icon
  submit                     register the form's entry
  cancel                     close the form, discarding edits
  revoke <txid-prefix>       revoke a listed entry
  show                       redraw the current page
  help                       this text
  quit                       exit
";

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("log in first")]
    NotLoggedIn,
    #[error("already logged in; `logout` first")]
    AlreadyLoggedIn,
    #[error("no listed entry matches {0}")]
    NoMatch(String),
    #[error("{0} matches more than one listed entry")]
    Ambiguous(String),
    #[error(transparent)]
    Kind(#[from] KindParseError),
    #[error(transparent)]
    Level(#[from] SecurityLevelError),
    #[error(transparent)]
    Form(#[from] ValidationError),
}

impl ErrorCode for ShellError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Unknown(_) | Self::Usage(_) => "E_SHELL_USAGE",
            Self::NotLoggedIn => "E_UNAUTHENTICATED",
            Self::AlreadyLoggedIn => "E_ALREADY_AUTHENTICATED",
            Self::NoMatch(_) | Self::Ambiguous(_) => "E_SHELL_TARGET",
            Self::Kind(_) | Self::Level(_) => "E_SHELL_ARGUMENT",
            Self::Form(e) => e.error_code(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Help,
    LoginWallet,
    LoginKey(Option<String>),
    Back,
    Logout,
    Tab(RegistryKind),
    List,
    New,
    Set(FormInput, String),
    Level(SecurityLevel),
    FieldAdd,
    /// Zero-based index.
    FieldRemove(usize),
    /// Zero-based index.
    FieldSet(usize, CertFieldAttr, String),
    Submit,
    Cancel,
    Revoke(String),
    Show,
    Quit,
}

/// Parse one input line. Blank lines and `#` comments yield `Ok(None)`.
///
/// # Errors
///
/// Returns a [`ShellError`] describing why the line was rejected.
pub fn parse_command(line: &str) -> Result<Option<ShellCommand>, ShellError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let mut words = line.split_whitespace();
    let head = words.next().unwrap_or_default().to_ascii_lowercase();
    let rest: Vec<&str> = words.collect();

    let cmd = match (head.as_str(), rest.as_slice()) {
        ("help" | "?", []) => ShellCommand::Help,
        ("login", ["wallet"]) => ShellCommand::LoginWallet,
        ("login", ["key"]) => ShellCommand::LoginKey(None),
        ("login", ["key", key]) => ShellCommand::LoginKey(Some((*key).to_owned())),
        ("login", _) => return Err(ShellError::Usage("login wallet | login key [<hex>]")),
        ("back", []) => ShellCommand::Back,
        ("logout", []) => ShellCommand::Logout,
        ("tab", [kind]) => ShellCommand::Tab(kind.parse()?),
        ("tab", _) => return Err(ShellError::Usage("tab <basket|proto|cert>")),
        ("list", []) => ShellCommand::List,
        ("new", []) => ShellCommand::New,
        ("set", [input, value @ ..]) if !value.is_empty() => ShellCommand::Set(input.parse()?, value.join(" ")),
        ("set", [input]) => ShellCommand::Set(input.parse()?, String::new()),
        ("set", _) => return Err(ShellError::Usage("set <input> <value...>")),
        ("level", [level]) => ShellCommand::Level(level.parse()?),
        ("level", _) => return Err(ShellError::Usage("level <0|1|2>")),
        ("field", ["add"]) => ShellCommand::FieldAdd,
        ("field", ["rm", n]) => ShellCommand::FieldRemove(parse_position(n)?),
        ("field", ["set", n, attr, value @ ..]) => {
            ShellCommand::FieldSet(parse_position(n)?, attr.parse()?, value.join(" "))
        }
        ("field", _) => return Err(ShellError::Usage("field add | field rm <n> | field set <n> <attr> <value...>")),
        ("submit", []) => ShellCommand::Submit,
        ("cancel", []) => ShellCommand::Cancel,
        ("revoke", [prefix]) => ShellCommand::Revoke((*prefix).to_owned()),
        ("revoke", _) => return Err(ShellError::Usage("revoke <txid-prefix>")),
        ("show", []) => ShellCommand::Show,
        ("quit" | "exit", []) => ShellCommand::Quit,
        _ => return Err(ShellError::Unknown(line.to_owned())),
    };
    Ok(Some(cmd))
}

fn parse_position(raw: &str) -> Result<usize, ShellError> {
    match raw.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(ShellError::Usage("field numbers start at 1")),
    }
}

/// Result of executing one line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellOutput {
    pub text: String,
    pub quit: bool,
}

pub struct Shell {
    app: App,
}

impl Shell {
    #[must_use]
    pub fn new(app: App) -> Self {
        Self { app }
    }

    #[must_use]
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Parse and execute one line, folding errors into the output text.
    pub async fn run_line(&mut self, line: &str) -> ShellOutput {
        let result = match parse_command(line) {
            Ok(Some(cmd)) => self.execute(cmd).await,
            Ok(None) => Ok(ShellOutput::default()),
            Err(e) => Err(e),
        };
        match result {
            Ok(output) => output,
            Err(e) => ShellOutput { text: format!("error: {e}\n"), quit: false },
        }
    }

    /// Apply `cmd`, then report notifications and the redrawn page.
    ///
    /// # Errors
    ///
    /// Returns an error when the command does not apply to the current route
    /// or its target cannot be resolved. State is unchanged in that case.
    pub async fn execute(&mut self, cmd: ShellCommand) -> Result<ShellOutput, ShellError> {
        match cmd {
            ShellCommand::Help => return Ok(ShellOutput { text: HELP.to_owned(), quit: false }),
            ShellCommand::Quit => return Ok(ShellOutput { text: String::new(), quit: true }),
            ShellCommand::Show => {}
            ShellCommand::LoginWallet => {
                self.ensure_logged_out()?;
                self.app.login_wallet().await;
            }
            ShellCommand::LoginKey(None) => {
                self.ensure_logged_out()?;
                self.app.start_mut().show_private_key_input();
            }
            ShellCommand::LoginKey(Some(key)) => {
                self.ensure_logged_out()?;
                self.app.login_private_key(&key).await;
            }
            ShellCommand::Back => {
                self.ensure_logged_out()?;
                self.app.start_mut().back();
            }
            ShellCommand::Logout => {
                self.page()?;
                self.app.logout().await;
            }
            ShellCommand::Tab(kind) => {
                self.page()?.set_active_kind(kind).await;
            }
            ShellCommand::List => self.page()?.load().await,
            ShellCommand::New => self.page()?.open_form(),
            ShellCommand::Set(input, value) => self.page()?.form_mut().set(input, &value)?,
            ShellCommand::Level(level) => self.page()?.form_mut().select_security_level(level)?,
            ShellCommand::FieldAdd => {
                self.page()?.form_mut().add_cert_field()?;
            }
            ShellCommand::FieldRemove(index) => {
                self.page()?.form_mut().remove_cert_field(index)?;
            }
            ShellCommand::FieldSet(index, attr, value) => {
                self.page()?.form_mut().update_cert_field(index, attr, &value)?;
            }
            ShellCommand::Submit => {
                let page = self.page()?;
                if !page.form().is_open() {
                    return Err(ValidationError::NotEditing.into());
                }
                page.submit_form().await;
            }
            ShellCommand::Cancel => self.page()?.form_mut().cancel(),
            ShellCommand::Revoke(prefix) => {
                let page = self.page()?;
                let outpoint = {
                    let matches = page.find_by_txid_prefix(&prefix);
                    match matches.as_slice() {
                        [record] => record.outpoint.clone(),
                        [] => return Err(ShellError::NoMatch(prefix)),
                        _ => return Err(ShellError::Ambiguous(prefix)),
                    }
                };
                page.revoke(&outpoint).await;
            }
        }
        Ok(ShellOutput { text: self.report(), quit: false })
    }

    fn page(&mut self) -> Result<&mut crate::pages::registry::RegistryPage, ShellError> {
        self.app.registry_mut().ok_or(ShellError::NotLoggedIn)
    }

    fn ensure_logged_out(&self) -> Result<(), ShellError> {
        if self.app.route() == Route::Registry { Err(ShellError::AlreadyLoggedIn) } else { Ok(()) }
    }

    fn report(&mut self) -> String {
        let mut out = String::new();
        for notice in self.app.take_notifications() {
            let _ = writeln!(out, "{notice}");
        }
        out.push_str(&self.app.render_text());
        out
    }
}
