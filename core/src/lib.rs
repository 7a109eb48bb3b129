//! Synchronous API client core and page logic for the persons service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The host executes the HTTP
//! round-trip through a `Transport`, making the core fully deterministic and
//! testable.
//!
//! # Design
//! - `PersonClient` is stateless; it holds only the API URL.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - Responses are returned as the server's `Envelope` unchanged.
//! - `PersonsPage` is the view/controller state behind the table and form;
//!   it is generic over the `Transport` so tests can script the server.
//! - `ApiConfig` derives the API URL from the environment.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod page;
pub mod types;

pub use client::PersonClient;
pub use config::{ApiConfig, Mode};
pub use error::{ApiError, ConfigError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use page::{DeleteOutcome, FormField, PersonForm, PersonsPage, SubmitOutcome};
pub use types::{Envelope, FieldError, Person, PersonId, PersonRequest};
