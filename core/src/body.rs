//! Request body selection and encoding.
//!
//! # Design
//! The body kind is decided from what the caller passed, in this order:
//! nothing at all gives no body and no `Content-Type`; any file attachment
//! gives `multipart/form-data` (parameters ride along as form fields); plain
//! parameters give a JSON object with `application/json`.
//!
//! Attachments are opened and read while the multipart body is assembled.
//! Each handle lives only for its own loop iteration, so a failure on one
//! file leaves no handle from earlier files open.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::http::{Body, BodyFactory};
use crate::query;
use crate::types::Parameters;

const OCTET_STREAM: &str = "application/octet-stream";

/// A named reference to a local file, read when the body is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttachment {
    /// Form field name.
    pub name: String,
    pub path: PathBuf,
}

impl FileAttachment {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Base name sent as the part's `filename`.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string())
    }
}

/// The encoded body for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    Empty,
    Json(Body),
    Multipart { body: Body, boundary: String },
}

impl RequestBody {
    /// Value for the `Content-Type` header, if the request has a body.
    pub fn content_type(&self) -> Option<String> {
        match self {
            RequestBody::Empty => None,
            RequestBody::Json(_) => Some("application/json".to_string()),
            RequestBody::Multipart { boundary, .. } => {
                Some(format!("multipart/form-data; boundary={boundary}"))
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RequestBody::Empty => "empty",
            RequestBody::Json(_) => "json",
            RequestBody::Multipart { .. } => "multipart",
        }
    }

    /// Set `Content-Type` on `headers` and hand back the payload.
    pub fn apply(self, headers: &mut HeaderMap) -> Result<Option<Body>> {
        if let Some(content_type) = self.content_type() {
            let value = HeaderValue::from_str(&content_type)
                .map_err(|e| Error::Serialization(e.to_string()))?;
            headers.insert(CONTENT_TYPE, value);
        }
        Ok(match self {
            RequestBody::Empty => None,
            RequestBody::Json(body) | RequestBody::Multipart { body, .. } => Some(body),
        })
    }
}

/// Choose and encode the body for `params` and `files`.
pub fn build(
    params: &Parameters,
    files: &[FileAttachment],
    bodies: &dyn BodyFactory,
) -> Result<RequestBody> {
    if !files.is_empty() {
        return multipart(params, files, bodies);
    }
    if params.is_empty() {
        return Ok(RequestBody::Empty);
    }
    let json = serde_json::to_vec(params).map_err(|e| Error::Serialization(e.to_string()))?;
    Ok(RequestBody::Json(bodies.from_bytes(json)))
}

fn multipart(
    params: &Parameters,
    files: &[FileAttachment],
    bodies: &dyn BodyFactory,
) -> Result<RequestBody> {
    let boundary = format!("----cloud-sdk-{}", Uuid::new_v4().simple());
    let mut out = Vec::new();

    for (name, value) in query::flatten(params, |k| k.to_string()) {
        out.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        out.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", quote(&name)).as_bytes(),
        );
        out.extend_from_slice(value.as_bytes());
        out.extend_from_slice(b"\r\n");
    }

    for file in files {
        let contents = read_attachment(&file.path)?;
        let content_type = infer::get(&contents)
            .map(|kind| kind.mime_type())
            .unwrap_or(OCTET_STREAM);

        out.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        out.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                quote(&file.name),
                quote(&file.file_name())
            )
            .as_bytes(),
        );
        out.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        out.extend_from_slice(&contents);
        out.extend_from_slice(b"\r\n");
    }

    out.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    Ok(RequestBody::Multipart {
        body: bodies.from_bytes(out),
        boundary,
    })
}

fn read_attachment(path: &Path) -> Result<Vec<u8>> {
    let io_err = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::open(path).map_err(io_err)?;
    let mut contents = Vec::new();
    file.read_to_end(&mut contents).map_err(io_err)?;
    Ok(contents)
}

/// Escape a value for a quoted `Content-Disposition` parameter.
fn quote(raw: &str) -> String {
    raw.replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
