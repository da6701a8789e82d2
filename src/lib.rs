//! Registrant: register, list, and revoke registry entries for baskets,
//! protocols, and certificate types.
//!
//! ARCHITECTURE
//! ============
//! `net` holds the record model and the registry-client contract (with an
//! in-memory mock backend). `state` holds owned controller state (auth,
//! form, notifications). `pages` composes those into the start and registry
//! screens, `components` renders individual records, and `shell` drives the
//! whole thing from a terminal.

pub mod app;
pub mod components;
pub mod config;
pub mod error;
pub mod net;
pub mod pages;
pub mod shell;
pub mod state;
pub mod util;
