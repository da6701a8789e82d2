//! User-visible notifications.
//!
//! DESIGN
//! ======
//! Controllers push notifications into a queue they own; the front end drains
//! it after each interaction. Every completed operation produces exactly one.

use crate::error::ErrorCode;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NoticeVariant {
    #[default]
    Default,
    Destructive,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NoticeVariant,
    /// Error code when the notification reports a failure.
    pub code: Option<&'static str>,
}

impl Notification {
    #[must_use]
    pub fn success(title: &str, description: &str) -> Self {
        Self { title: title.to_owned(), description: description.to_owned(), variant: NoticeVariant::Default, code: None }
    }

    /// Destructive notification whose description carries the error detail.
    #[must_use]
    pub fn failure<E>(title: &str, description: &str, err: &E) -> Self
    where
        E: ErrorCode + std::fmt::Display,
    {
        Self {
            title: title.to_owned(),
            description: format!("{description} ({err})"),
            variant: NoticeVariant::Destructive,
            code: Some(err.error_code()),
        }
    }

    #[must_use]
    pub fn is_destructive(&self) -> bool {
        self.variant == NoticeVariant::Destructive
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let marker = match self.variant {
            NoticeVariant::Default => "*",
            NoticeVariant::Destructive => "!",
        };
        write!(f, "[{marker}] {}: {}", self.title, self.description)
    }
}
