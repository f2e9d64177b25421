//! REST API client
//!
//! `ApiClient` speaks the ledger REST contract through a `Transport`: either
//! `HttpTransport` for a remote server or the in-process `LocalServer`.

pub mod client;
pub mod envelope;
pub mod http;
pub mod query;
pub mod transport;

pub use client::ApiClient;
pub use envelope::{ApiError, Page, Pagination};
pub use http::HttpTransport;
pub use query::ListQuery;
pub use transport::{ApiRequest, ApiResponse, Method, Transport};
