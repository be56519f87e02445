//! Volume resource.

use serde_json::Value;

use super::item_path;
use crate::client::ApiClient;
use crate::error::Result;
use crate::options;
use crate::types::Parameters;

/// Operations on block-storage volumes.
pub struct VolumesResource<'c> {
    client: &'c ApiClient,
}

impl<'c> VolumesResource<'c> {
    pub(crate) fn new(client: &'c ApiClient) -> Self {
        Self { client }
    }

    pub fn list(&self, options: &Parameters) -> Result<Value> {
        let options = options::validate(options)?;
        self.client.get("/volumes", options.as_params())?.into_json()
    }

    pub fn get(&self, id: &str) -> Result<Value> {
        self.client
            .get(&item_path("volumes", id), &Parameters::new())?
            .into_json()
    }

    pub fn create(&self, params: &Parameters) -> Result<Value> {
        self.client.post("/volumes", params, &[])?.into_json()
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        self.client
            .delete(&item_path("volumes", id), &Parameters::new())?;
        Ok(())
    }
}
