//! The request pipeline shared by every resource method.
//!
//! # Design
//! `ApiClient` holds its configuration and two injected collaborators, a
//! [`Transport`] and a [`BodyFactory`], all immutable after construction.
//! Every call builds its URL, headers and body locally, dispatches once and
//! hands the response to the mediator, so one client can be shared across
//! threads without locking.
//!
//! Each call runs the same steps: URL (base + encoded path + query), body
//! selection, transport dispatch, then [`response::decode`]. Validation and
//! body errors surface before the transport is touched; transport errors are
//! returned as-is.

use std::fmt;
use std::sync::Arc;

use http::header::{ACCEPT, USER_AGENT};
use http::{HeaderMap, HeaderValue};
use tracing::debug;

use crate::body::{self, FileAttachment, RequestBody};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{BodyFactory, HttpMethod, Transport};
use crate::query;
use crate::resources::{ImagesResource, ServersResource, VolumesResource};
use crate::response::{self, Decoded};
use crate::types::Parameters;

/// Blocking client for the cloud API.
#[derive(Clone)]
pub struct ApiClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    bodies: Arc<dyn BodyFactory>,
}

impl ApiClient {
    pub fn new(
        mut config: ClientConfig,
        transport: Arc<dyn Transport>,
        bodies: Arc<dyn BodyFactory>,
    ) -> Self {
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Self {
            config,
            transport,
            bodies,
        }
    }

    /// A client over [`UreqTransport`](crate::UreqTransport) using the
    /// configured timeout.
    #[cfg(feature = "ureq-transport")]
    pub fn with_ureq(config: ClientConfig) -> Self {
        let transport = crate::backends::UreqTransport::new(config.timeout());
        Self::new(
            config,
            Arc::new(transport),
            Arc::new(crate::http::DefaultBodyFactory),
        )
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn servers(&self) -> ServersResource<'_> {
        ServersResource::new(self)
    }

    pub fn volumes(&self) -> VolumesResource<'_> {
        VolumesResource::new(self)
    }

    pub fn images(&self) -> ImagesResource<'_> {
        ImagesResource::new(self)
    }

    /// `path` must already have its dynamic segments run through
    /// [`path::encode`](crate::path::encode).
    pub fn get(&self, path: &str, query: &Parameters) -> Result<Decoded> {
        self.send(HttpMethod::Get, path, query, RequestBody::Empty)
    }

    pub fn delete(&self, path: &str, query: &Parameters) -> Result<Decoded> {
        self.send(HttpMethod::Delete, path, query, RequestBody::Empty)
    }

    pub fn post(
        &self,
        path: &str,
        params: &Parameters,
        files: &[FileAttachment],
    ) -> Result<Decoded> {
        let body = body::build(params, files, self.bodies.as_ref())?;
        self.send(HttpMethod::Post, path, &Parameters::new(), body)
    }

    pub fn put(
        &self,
        path: &str,
        params: &Parameters,
        files: &[FileAttachment],
    ) -> Result<Decoded> {
        let body = body::build(params, files, self.bodies.as_ref())?;
        self.send(HttpMethod::Put, path, &Parameters::new(), body)
    }

    fn send(
        &self,
        method: HttpMethod,
        path: &str,
        query: &Parameters,
        body: RequestBody,
    ) -> Result<Decoded> {
        let url = query::with_query(&format!("{}{}", self.config.base_url, path), query);
        let mut headers = self.default_headers()?;
        let kind = body.kind();
        let body = body.apply(&mut headers)?;

        debug!(%method, %url, body = kind, "dispatching request");
        let response = match method {
            HttpMethod::Get => self.transport.get(&url, headers),
            HttpMethod::Delete => self.transport.delete(&url, headers),
            HttpMethod::Post => self.transport.post(&url, headers, body),
            HttpMethod::Put => self.transport.put(&url, headers, body),
        }?;
        debug!(%method, %url, status = response.status.as_u16(), "received response");

        response::decode(response)
    }

    fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let agent = HeaderValue::from_str(&self.config.user_agent)
            .map_err(|e| Error::Config(format!("invalid user agent: {e}")))?;
        headers.insert(USER_AGENT, agent);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
