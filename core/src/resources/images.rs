//! Image resource, including multipart uploads.

use std::path::Path;

use serde_json::Value;

use super::item_path;
use crate::body::FileAttachment;
use crate::client::ApiClient;
use crate::error::Result;
use crate::options;
use crate::types::Parameters;

/// Form field carrying the uploaded image file.
const UPLOAD_FIELD: &str = "file";

/// Operations on machine images.
pub struct ImagesResource<'c> {
    client: &'c ApiClient,
}

impl<'c> ImagesResource<'c> {
    pub(crate) fn new(client: &'c ApiClient) -> Self {
        Self { client }
    }

    pub fn list(&self, options: &Parameters) -> Result<Value> {
        let options = options::validate(options)?;
        self.client.get("/images", options.as_params())?.into_json()
    }

    pub fn get(&self, id: &str) -> Result<Value> {
        self.client
            .get(&item_path("images", id), &Parameters::new())?
            .into_json()
    }

    /// Upload a local image file; `params` become form fields next to it.
    pub fn upload(&self, params: &Parameters, file: &Path) -> Result<Value> {
        let attachment = FileAttachment::new(UPLOAD_FIELD, file);
        self.client.post("/images", params, &[attachment])?.into_json()
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        self.client
            .delete(&item_path("images", id), &Parameters::new())?;
        Ok(())
    }
}
