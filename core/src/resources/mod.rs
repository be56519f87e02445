//! Thin per-resource wrappers over [`ApiClient`](crate::ApiClient).
//!
//! Identifiers always go through [`path::encode`](crate::path::encode), and
//! listing methods always run the pagination validator before dispatch.
//! Results are returned as `serde_json::Value`; callers interpret the shape.

mod images;
mod servers;
mod volumes;

pub use images::ImagesResource;
pub use servers::ServersResource;
pub use volumes::VolumesResource;

/// `/{collection}/{encoded id}`
fn item_path(collection: &str, id: &str) -> String {
    format!("/{collection}/{}", crate::path::encode(id))
}
