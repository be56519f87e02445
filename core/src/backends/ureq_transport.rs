//! Blocking [`Transport`] backed by `ureq`.

use std::io::{Cursor, Read as _};
use std::time::Duration;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse, Transport};

#[derive(Debug)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            // Status codes are interpreted by the response mediator.
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    pub fn from_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = http::Request::builder()
            .method(http::Method::from(request.method))
            .uri(&request.path);

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let result = match request.body {
            Some(body) => {
                let req = builder
                    .body(body.into_bytes().to_vec())
                    .map_err(|e| TransportError::Other(Box::new(e)))?;
                self.agent.run(req)
            }
            None => {
                let req = builder
                    .body(())
                    .map_err(|e| TransportError::Other(Box::new(e)))?;
                self.agent.run(req)
            }
        };

        match result {
            Ok(resp) => convert_response(resp),
            Err(ureq::Error::Timeout(_)) => Err(TransportError::Timeout),
            Err(ureq::Error::HostNotFound) => {
                Err(TransportError::Connection("host not found".to_owned()))
            }
            Err(ureq::Error::Io(e)) => Err(TransportError::Connection(e.to_string())),
            Err(e) => Err(TransportError::Other(Box::new(e))),
        }
    }
}

fn convert_response(response: http::Response<ureq::Body>) -> Result<HttpResponse, TransportError> {
    let (parts, body) = response.into_parts();

    let mut bytes = Vec::new();
    body.into_reader()
        .read_to_end(&mut bytes)
        .map_err(|e| TransportError::Connection(e.to_string()))?;

    Ok(HttpResponse::new(
        parts.status,
        parts.headers,
        Box::new(Cursor::new(bytes)),
    ))
}

#[cfg(test)]
mod tests {
    use http::HeaderMap;

    use super::*;

    #[test]
    fn unreachable_host_is_transport_error() {
        let transport = UreqTransport::new(Duration::from_secs(2));
        let err = transport
            .get("http://127.0.0.1:1/servers", HeaderMap::new())
            .unwrap_err();
        assert!(matches!(
            err,
            TransportError::Connection(_) | TransportError::Other(_)
        ));
    }
}
