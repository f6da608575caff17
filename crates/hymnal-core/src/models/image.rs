use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Sentinel `total` meaning the listing was truncated before a full count.
pub const UNKNOWN_TOTAL: i64 = -1;

/// One image of a listing or search page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageItem {
    /// Catalog id, absent when no catalog entry matches the filename
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub index: String,
    pub filename: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationDescriptor {
    pub current: u32,
    pub page_size: u32,
    /// Exact count, or -1 when unknown
    pub total: i64,
    pub has_more: bool,
    /// Continuation marker for the next listing call (always serialized, `null` when none)
    pub next_marker: Option<String>,
}

impl PaginationDescriptor {
    pub fn total_is_known(&self) -> bool {
        self.total != UNKNOWN_TOTAL
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ImagePage {
    pub images: Vec<ImageItem>,
    pub pagination: PaginationDescriptor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_serializes_camel_case_with_null_marker() {
        let page = ImagePage {
            images: vec![ImageItem {
                id: None,
                index: "001".to_string(),
                filename: "恩典".to_string(),
                url: "https://b.r.aliyuncs.com/hymn-image/001.恩典.jpg".to_string(),
                last_modified: None,
                size: Some(10),
                tag: None,
            }],
            pagination: PaginationDescriptor {
                current: 1,
                page_size: 20,
                total: UNKNOWN_TOTAL,
                has_more: true,
                next_marker: None,
            },
        };

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["pagination"]["pageSize"], 20);
        assert_eq!(json["pagination"]["total"], -1);
        assert!(json["pagination"]["nextMarker"].is_null());
        assert!(json["images"][0].get("id").is_none());
        assert!(json["images"][0].get("tag").is_none());
        assert!(!page.pagination.total_is_known());
    }
}
