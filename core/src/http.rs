//! HTTP transport types and the collaborator traits the client is built on.
//!
//! # Design
//! Requests and responses are plain data. The client never opens a socket
//! itself: it hands an `HttpRequest` to an injected [`Transport`] and feeds
//! the returned `HttpResponse` to the response mediator. Request bodies are
//! wrapped by an injected [`BodyFactory`], so the caller decides how payload
//! bytes are held. Both collaborators are passed in explicitly; nothing is
//! discovered at runtime.
//!
//! A response body is a reader that is consumed exactly once through
//! [`HttpResponse::into_bytes`], which takes the response by value.

use std::fmt;
use std::io::{Cursor, Read};

use bytes::Bytes;
use http::{HeaderMap, StatusCode};

use crate::error::TransportError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for http::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => http::Method::GET,
            HttpMethod::Post => http::Method::POST,
            HttpMethod::Put => http::Method::PUT,
            HttpMethod::Delete => http::Method::DELETE,
        }
    }
}

/// An encoded request payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body(Bytes);

impl Body {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

/// Creates request bodies from encoded payload bytes.
pub trait BodyFactory: Send + Sync {
    fn from_bytes(&self, bytes: Vec<u8>) -> Body;

    fn from_string(&self, text: String) -> Body {
        self.from_bytes(text.into_bytes())
    }
}

/// Wraps payloads in a shared `Bytes` buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultBodyFactory;

impl BodyFactory for DefaultBodyFactory {
    fn from_bytes(&self, bytes: Vec<u8>) -> Body {
        Body(Bytes::from(bytes))
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Fully-qualified URL including any query string.
    pub path: String,
    pub headers: HeaderMap,
    pub body: Option<Body>,
}

/// An HTTP response as handed back by a [`Transport`].
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    body: Box<dyn Read + Send>,
}

impl HttpResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Box<dyn Read + Send>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Build a response around an in-memory body.
    pub fn from_bytes(status: StatusCode, headers: HeaderMap, body: impl Into<Vec<u8>>) -> Self {
        Self::new(status, headers, Box::new(Cursor::new(body.into())))
    }

    /// Drain the body. A read failure is reported as a transport error since
    /// the bytes never fully arrived.
    pub fn into_bytes(mut self) -> Result<Bytes, TransportError> {
        let mut buf = Vec::new();
        self.body
            .read_to_end(&mut buf)
            .map_err(|e| TransportError::Connection(e.to_string()))?;
        Ok(Bytes::from(buf))
    }
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Blocking HTTP transport the client dispatches through.
///
/// Implementations own connection handling, TLS, timeouts and retries. A
/// non-2xx status is a normal response, not an error: only failures that
/// prevent a response from existing belong in `TransportError`.
pub trait Transport: Send + Sync {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;

    fn get(&self, path: &str, headers: HeaderMap) -> Result<HttpResponse, TransportError> {
        self.send(HttpRequest {
            method: HttpMethod::Get,
            path: path.to_string(),
            headers,
            body: None,
        })
    }

    fn post(
        &self,
        path: &str,
        headers: HeaderMap,
        body: Option<Body>,
    ) -> Result<HttpResponse, TransportError> {
        self.send(HttpRequest {
            method: HttpMethod::Post,
            path: path.to_string(),
            headers,
            body,
        })
    }

    fn put(
        &self,
        path: &str,
        headers: HeaderMap,
        body: Option<Body>,
    ) -> Result<HttpResponse, TransportError> {
        self.send(HttpRequest {
            method: HttpMethod::Put,
            path: path.to_string(),
            headers,
            body,
        })
    }

    fn delete(&self, path: &str, headers: HeaderMap) -> Result<HttpResponse, TransportError> {
        self.send(HttpRequest {
            method: HttpMethod::Delete,
            path: path.to_string(),
            headers,
            body: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Mutex;

    use super::*;

    struct Recording {
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl Transport for Recording {
        fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.seen.lock().unwrap().push(request);
            Ok(HttpResponse::from_bytes(StatusCode::NO_CONTENT, HeaderMap::new(), Vec::new()))
        }
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
        }
    }

    #[test]
    fn verb_methods_route_through_send() {
        let transport = Recording {
            seen: Mutex::new(Vec::new()),
        };
        let body = DefaultBodyFactory.from_string("{}".to_string());
        transport.get("http://h/a", HeaderMap::new()).unwrap();
        transport.post("http://h/b", HeaderMap::new(), Some(body.clone())).unwrap();
        transport.put("http://h/c", HeaderMap::new(), None).unwrap();
        transport.delete("http://h/d", HeaderMap::new()).unwrap();

        let seen = transport.seen.lock().unwrap();
        let methods: Vec<_> = seen.iter().map(|r| r.method).collect();
        assert_eq!(
            methods,
            vec![HttpMethod::Get, HttpMethod::Post, HttpMethod::Put, HttpMethod::Delete]
        );
        assert_eq!(seen[1].body, Some(body));
        assert!(seen[3].body.is_none());
    }

    #[test]
    fn body_factory_wraps_strings() {
        let body = DefaultBodyFactory.from_string("hello".to_string());
        assert_eq!(body.as_bytes(), b"hello");
        assert_eq!(body.len(), 5);
    }

    #[test]
    fn into_bytes_drains_body() {
        let resp = HttpResponse::from_bytes(StatusCode::OK, HeaderMap::new(), "abc");
        assert_eq!(resp.into_bytes().unwrap(), Bytes::from_static(b"abc"));
    }

    #[test]
    fn body_read_failure_is_transport_error() {
        let resp = HttpResponse::new(StatusCode::OK, HeaderMap::new(), Box::new(FailingReader));
        assert!(matches!(resp.into_bytes(), Err(TransportError::Connection(_))));
    }
}
