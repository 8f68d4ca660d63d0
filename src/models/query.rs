use crate::encoder::{field, Encodable, ToMapping};
use crate::error::{CrmaError, CrmaResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::sync::OnceLock;
use uuid::Uuid;

/// Query language accepted by the query resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryLanguage {
    #[default]
    #[serde(rename = "SAQL")]
    Saql,
    #[serde(rename = "SQL")]
    Sql,
}

impl QueryLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Saql => "SAQL",
            Self::Sql => "SQL",
        }
    }
}

impl From<QueryLanguage> for Encodable {
    fn from(language: QueryLanguage) -> Self {
        Encodable::enumeration(language.as_str())
    }
}

fn generated_name() -> String {
    Uuid::new_v4().to_string()
}

/// Body of a query request
///
/// A request without a name, whether built with [`QueryRequest::new`] or
/// decoded without a `name` key, is named with a fresh UUID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    #[serde(default = "generated_name")]
    pub name: String,
    pub query: String,
    #[serde(default)]
    pub query_language: QueryLanguage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            name: generated_name(),
            query: query.into(),
            query_language: QueryLanguage::default(),
            timezone: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_language(mut self, language: QueryLanguage) -> Self {
        self.query_language = language;
        self
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }
}

impl ToMapping for QueryRequest {
    fn to_mapping(&self) -> Vec<(Encodable, Encodable)> {
        let mut entries = vec![
            field("name", self.name.as_str()),
            field("query", self.query.as_str()),
            field("query_language", self.query_language),
        ];
        if let Some(timezone) = &self.timezone {
            entries.push(field("timezone", timezone.as_str()));
        }
        entries
    }
}

/// Field projected in a query result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionField {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

impl ProjectionField {
    pub fn new(id: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            field_type: field_type.into(),
        }
    }

    /// Field name without the stream reference, `q.Category` -> `Category`
    pub fn name(&self) -> &str {
        self.id.rsplit_once('.').map_or(self.id.as_str(), |(_, name)| name)
    }
}

/// Field projection metadata container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageProjection {
    pub field: ProjectionField,
}

/// Projections produced by a single foreach step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeachLineage {
    pub projections: Vec<LineageProjection>,
}

/// Union of foreach steps sharing the same projection shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnionLineage {
    #[serde(
        serialize_with = "serialize_union_inputs",
        deserialize_with = "deserialize_union_inputs"
    )]
    pub inputs: Vec<ForeachLineage>,
}

// Union inputs carry their own `type` tag, which must be `foreach`.
#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum UnionInput<T> {
    Foreach(T),
}

fn serialize_union_inputs<S>(inputs: &[ForeachLineage], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(inputs.iter().map(UnionInput::Foreach))
}

fn deserialize_union_inputs<'de, D>(deserializer: D) -> Result<Vec<ForeachLineage>, D::Error>
where
    D: Deserializer<'de>,
{
    let inputs = Vec::<UnionInput<ForeachLineage>>::deserialize(deserializer)?;
    Ok(inputs.into_iter().map(|UnionInput::Foreach(foreach)| foreach).collect())
}

/// Lineage that describes field projections in a query result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Lineage {
    Foreach(ForeachLineage),
    Union(UnionLineage),
}

impl Lineage {
    /// Projected fields in output order
    ///
    /// A union takes its field order from the first input only. Returns
    /// `None` for a union with no inputs.
    pub fn projection_fields(&self) -> Option<Vec<ProjectionField>> {
        let foreach = match self {
            Self::Foreach(foreach) => foreach,
            Self::Union(union) => union.inputs.first()?,
        };
        Some(foreach.projections.iter().map(|p| p.field.clone()).collect())
    }
}

/// Query results metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResultsMetadata {
    pub lineage: Lineage,
    pub query_language: QueryLanguage,
}

/// Query results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResults {
    pub records: Vec<Map<String, Value>>,
    #[serde(default)]
    pub metadata: Vec<QueryResultsMetadata>,
}

/// Response of the query resource
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub action: String,
    pub response_id: String,
    pub query: String,
    pub response_time: u64,
    pub results: QueryResults,
    #[serde(skip)]
    fields: OnceLock<Vec<ProjectionField>>,
}

impl QueryResponse {
    /// Fields projected by the query, in record order
    ///
    /// Derived from the lineage of the first metadata entry and cached after
    /// the first successful call.
    pub fn fields(&self) -> CrmaResult<&[ProjectionField]> {
        if let Some(fields) = self.fields.get() {
            return Ok(fields);
        }

        let metadata = self
            .results
            .metadata
            .first()
            .ok_or_else(|| CrmaError::MissingMetadata(self.response_id.clone()))?;
        let fields = metadata.lineage.projection_fields().ok_or_else(|| {
            CrmaError::MissingMetadata(format!("{}: union lineage has no inputs", self.response_id))
        })?;

        Ok(self.fields.get_or_init(|| fields))
    }
}
