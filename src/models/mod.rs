pub mod dataset;
pub mod query;
pub mod user;

pub use dataset::{
    Dataset, DatasetVersion, DatasetVersionResponse, DatasetVersionsResponse, DatasetXmd, DateType,
    XmdDate, XmdDateFields, XmdDimension, XmdMeasure,
};
pub use query::{
    ForeachLineage, Lineage, LineageProjection, ProjectionField, QueryLanguage, QueryRequest,
    QueryResponse, QueryResults, QueryResultsMetadata, UnionLineage,
};
pub use user::User;
