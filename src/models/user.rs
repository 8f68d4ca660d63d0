use serde::{Deserialize, Serialize};

/// User referenced by dataset and XMD metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub profile_photo_url: String,
}
