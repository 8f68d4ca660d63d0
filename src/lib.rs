/*
 * CRM Analytics API Client - async Rust client for the CRM Analytics (Wave) REST API
 */

// Internal modules
mod client;
pub mod models;
mod apis;
mod error;
mod auth;
pub mod case;
pub mod encoder;
mod retry;

// Re-export public types and interfaces
pub use client::{ClientConfig, CrmaClient, RawResponse, DEFAULT_API_VERSION};
pub use models::*;
pub use apis::*;
pub use error::{CrmaError, CrmaResult};
pub use auth::{ConnectionInfo, PasswordCredentials, TOKEN_URL};
pub use encoder::{Encodable, ToMapping};
pub use retry::RetryPolicy;

// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CrmaClient, ClientConfig, ConnectionInfo, PasswordCredentials, RetryPolicy,
        CrmaError, CrmaResult,
        // Common model types
        DatasetVersion, DatasetVersionsResponse, ProjectionField,
        QueryLanguage, QueryRequest, QueryResponse,
    };
}
