//! Blocking client core for the cloud API.
//!
//! # Overview
//! Every resource method (servers, volumes, images) is a thin caller of one
//! request pipeline: optional option validation, path and query encoding,
//! body selection (none, JSON or multipart), dispatch through an injected
//! [`Transport`], and response mediation into a decoded value or a typed
//! [`Error`].
//!
//! # Design
//! - `ApiClient` holds only immutable configuration and collaborators, and all
//!   per-call state is local, so a client can be shared across threads.
//! - The transport and body factory are injected explicitly; `UreqTransport`
//!   (feature `ureq-transport`) is provided as a ready-made transport.
//! - Parameters are `serde_json` values in insertion order, consumed the same
//!   way by the query builder, the JSON encoder and the multipart encoder.
//! - Validation and encoding failures are raised before any network I/O.

pub mod backends;
pub mod body;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod options;
pub mod path;
pub mod query;
pub mod resources;
pub mod response;
pub mod types;

#[cfg(feature = "ureq-transport")]
pub use backends::UreqTransport;
pub use body::{FileAttachment, RequestBody};
pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::{ApiError, Error, Result, TransportError, ValidationError};
pub use crate::http::{Body, BodyFactory, DefaultBodyFactory, HttpMethod, HttpRequest, HttpResponse, Transport};
pub use options::{validate, ValidatedOptions};
pub use response::{decode, Decoded};
pub use types::{params_from, Parameters};
