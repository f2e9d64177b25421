//! ledgerdesk - administration of accounting master data
//!
//! This library provides the client side of a double-entry accounting
//! back-office: typed models for the master data, an API client speaking the
//! REST contract (over HTTP or to an in-process local backend), page
//! controllers for lists, forms and the accounting period workflow, and the
//! terminal display layer.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Paths, settings and the locale
//! - `error`: Custom error types
//! - `models`: Master data entities and the `Resource` trait
//! - `api`: Envelopes, query strings, transports and the API client
//! - `server`: The local backend answering the REST contract from JSON files
//! - `storage`: JSON collections used by the local backend
//! - `audit`: Audit logging system
//! - `services`: Typed entity services and stats aggregation
//! - `controller`: List, form and period workflow state machines
//! - `display`, `export`, `cli`: Terminal output and command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use ledgerdesk::api::ApiClient;
//! use ledgerdesk::config::{paths::LedgerPaths, settings::Settings};
//! use ledgerdesk::server::LocalServer;
//!
//! let paths = LedgerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let client = ApiClient::new(LocalServer::open(&paths, settings.effective_user_id())?);
//! ```

pub mod api;
pub mod audit;
pub mod cli;
pub mod config;
pub mod controller;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod server;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
