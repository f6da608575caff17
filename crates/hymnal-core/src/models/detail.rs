use serde::{Deserialize, Serialize};

use super::catalog::{CatalogIndex, HymnDetail};

/// `{ "success": true, "data": ... }` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Resolved hymn record returned by the detail endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HymnDetailData {
    pub id: String,
    pub filename: String,
    pub index: CatalogIndex,
    #[serde(rename = "type")]
    pub file_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Image URL rebuilt from the object key convention
    pub url: String,
    pub detail: HymnDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HymnDetailResponse {
    pub success: bool,
    pub data: HymnDetailData,
    /// Whether existence verification was skipped
    pub fast_mode: bool,
}
