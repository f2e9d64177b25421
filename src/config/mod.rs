//! Configuration module for ledgerdesk
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence (backend, API URL, user id, list defaults)
//! - The locale context

pub mod locale;
pub mod paths;
pub mod settings;

pub use locale::Locale;
pub use paths::LedgerPaths;
pub use settings::{BackendKind, Settings};
