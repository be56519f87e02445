//! Server resource.

use serde_json::Value;

use super::item_path;
use crate::client::ApiClient;
use crate::error::Result;
use crate::options;
use crate::types::Parameters;

/// Operations on servers.
pub struct ServersResource<'c> {
    client: &'c ApiClient,
}

impl<'c> ServersResource<'c> {
    pub(crate) fn new(client: &'c ApiClient) -> Self {
        Self { client }
    }

    /// List servers. `options` may carry `page` and `per_page`.
    pub fn list(&self, options: &Parameters) -> Result<Value> {
        let options = options::validate(options)?;
        self.client.get("/servers", options.as_params())?.into_json()
    }

    pub fn get(&self, id: &str) -> Result<Value> {
        self.client
            .get(&item_path("servers", id), &Parameters::new())?
            .into_json()
    }

    pub fn create(&self, params: &Parameters) -> Result<Value> {
        self.client.post("/servers", params, &[])?.into_json()
    }

    pub fn update(&self, id: &str, params: &Parameters) -> Result<Value> {
        self.client
            .put(&item_path("servers", id), params, &[])?
            .into_json()
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        self.client
            .delete(&item_path("servers", id), &Parameters::new())?;
        Ok(())
    }
}
