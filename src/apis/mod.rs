mod dataset;
mod query;

// Re-export all APIs
pub use dataset::DatasetApi;
pub use query::QueryApi;
