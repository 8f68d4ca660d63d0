use crate::{
    client::CrmaClient,
    encoder::Encodable,
    error::CrmaResult,
    models::{QueryRequest, QueryResponse},
};
use log::{debug, info};
use reqwest::Method;

/// Query API operations
pub struct QueryApi<'a> {
    client: &'a CrmaClient,
}

impl<'a> QueryApi<'a> {
    pub fn new(client: &'a CrmaClient) -> Self {
        Self { client }
    }

    /// Execute a query
    ///
    /// # Arguments
    /// * `request` - Query text, language, name and optional timezone
    pub async fn query(&self, request: QueryRequest) -> CrmaResult<QueryResponse> {
        info!("Running {} query: {}", request.query_language.as_str(), request.name);
        debug!("Query text: {}", request.query);
        let body = Encodable::object(request);
        let response = self.client.request(Method::POST, "/wave/query", Some(&body), None).await?;

        response.json()
    }

    /// Execute a SAQL query under a generated name
    pub async fn saql(&self, query: &str) -> CrmaResult<QueryResponse> {
        self.query(QueryRequest::new(query)).await
    }
}
