use super::user::User;
use chrono::{DateTime, Utc};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};

/// Dataset reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub id: String,
    pub url: String,
}

/// The type of an XMD date field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateType {
    Date,
    DateOnly,
    DateTime,
}

/// Date parts in the extended metadata format
///
/// The fiscal fields may be left out of the payload entirely, but when the
/// key is present its value must not be `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XmdDateFields {
    pub day: String,
    pub epoch_day: String,
    pub epoch_second: String,
    #[serde(default, deserialize_with = "non_null_fiscal", skip_serializing_if = "Option::is_none")]
    pub fiscal_month: Option<String>,
    #[serde(default, deserialize_with = "non_null_fiscal", skip_serializing_if = "Option::is_none")]
    pub fiscal_quarter: Option<String>,
    #[serde(default, deserialize_with = "non_null_fiscal", skip_serializing_if = "Option::is_none")]
    pub fiscal_week: Option<String>,
    #[serde(default, deserialize_with = "non_null_fiscal", skip_serializing_if = "Option::is_none")]
    pub fiscal_year: Option<String>,
    pub full_field: String,
    pub hour: String,
    pub minute: String,
    pub month: String,
    pub quarter: String,
    pub second: String,
    pub week: String,
    pub year: String,
}

// Only invoked when the key is present; an absent key takes the default.
fn non_null_fiscal<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) => Ok(Some(value)),
        None => Err(D::Error::custom("fiscal fields may not be null")),
    }
}

/// Date in the extended metadata format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XmdDate {
    pub alias: String,
    pub fields: XmdDateFields,
    pub first_day_of_week: i32,
    pub fiscal_month_offset: i32,
    pub fully_qualified_name: String,
    pub is_year_end_fiscal_year: bool,
    pub label: String,
    #[serde(rename = "type")]
    pub date_type: DateType,
}

/// Dimension in the extended metadata format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmdDimension {
    pub field: String,
    pub label: String,
}

/// Measure in the extended metadata format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmdMeasure {
    pub field: String,
    pub label: String,
}

/// Extended metadata (XMD) for a dataset version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetXmd {
    pub created_by: User,
    pub created_date: DateTime<Utc>,
    pub dates: Vec<XmdDate>,
    pub derived_dimensions: Vec<XmdDimension>,
    pub derived_measures: Vec<XmdMeasure>,
    pub dimensions: Vec<XmdDimension>,
    pub last_modified_by: User,
    pub last_modified_date: DateTime<Utc>,
    pub measures: Vec<XmdMeasure>,
    #[serde(rename = "type")]
    pub xmd_type: String,
    pub url: String,
}

/// Dataset version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetVersion {
    pub id: String,
    pub url: String,
    #[serde(rename = "type")]
    pub version_type: String,
    pub total_row_count: u64,
    pub created_date: DateTime<Utc>,
    pub created_by: User,
    pub last_modified_date: DateTime<Utc>,
    pub last_modified_by: User,
    pub dataset: Dataset,
}

/// Single dataset version including its main XMD
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetVersionResponse {
    #[serde(flatten)]
    pub version: DatasetVersion,
    pub xmd_main: DatasetXmd,
}

/// Collection of versions for a dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetVersionsResponse {
    pub url: String,
    pub versions: Vec<DatasetVersion>,
}
