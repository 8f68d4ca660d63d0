use crate::{
    client::CrmaClient,
    error::CrmaResult,
    models::{DatasetVersionResponse, DatasetVersionsResponse},
};
use log::info;
use reqwest::Method;

/// Dataset API operations
pub struct DatasetApi<'a> {
    client: &'a CrmaClient,
}

impl<'a> DatasetApi<'a> {
    pub fn new(client: &'a CrmaClient) -> Self {
        Self { client }
    }

    /// List the versions of a dataset
    ///
    /// # Arguments
    /// * `identifier` - Dataset name or ID
    pub async fn list_dataset_versions(
        &self,
        identifier: &str,
    ) -> CrmaResult<DatasetVersionsResponse> {
        info!("Listing versions of dataset: {}", identifier);
        let path = format!("/wave/datasets/{}/versions", urlencoding::encode(identifier));
        let response = self.client.request(Method::GET, &path, None, None).await?;

        response.json()
    }

    /// Get a single dataset version with its main XMD
    ///
    /// # Arguments
    /// * `identifier` - Dataset name or ID
    /// * `version_id` - ID of the version
    pub async fn get_dataset_version(
        &self,
        identifier: &str,
        version_id: &str,
    ) -> CrmaResult<DatasetVersionResponse> {
        info!("Getting version {} of dataset: {}", version_id, identifier);
        let path = format!(
            "/wave/datasets/{}/versions/{}",
            urlencoding::encode(identifier),
            urlencoding::encode(version_id)
        );
        let response = self.client.request(Method::GET, &path, None, None).await?;

        response.json()
    }
}
