use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Ordinal of a catalog entry.
///
/// Catalog files written by hand carry a bare number (`7`), a zero-padded
/// string (`"007"`) or occasionally `null`; every form is kept as written
/// because the value is embedded verbatim in the object key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CatalogIndex {
    Number(Number),
    Text(String),
    Null,
}

impl Display for CatalogIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            CatalogIndex::Number(n) => write!(f, "{}", n),
            CatalogIndex::Text(s) => write!(f, "{}", s),
            CatalogIndex::Null => Ok(()),
        }
    }
}

impl Default for CatalogIndex {
    fn default() -> Self {
        CatalogIndex::Text(String::new())
    }
}

/// One media item of the catalog file.
///
/// Fields the service does not interpret are preserved in `extra` so that
/// `getContent` and catalog rewrites round-trip the file unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub index: CatalogIndex,
    #[serde(rename = "type", default)]
    pub file_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<HymnDetail>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CatalogEntry {
    /// Object name relative to its folder: `<index>.<filename>.<type>`.
    pub fn object_name(&self) -> String {
        format!("{}.{}.{}", self.index, self.filename, self.file_type)
    }

    /// Full object key under `folder`.
    pub fn object_key(&self, folder: &str) -> String {
        let folder = folder.trim_matches('/');
        if folder.is_empty() {
            self.object_name()
        } else {
            format!("{}/{}", folder, self.object_name())
        }
    }
}

/// Nested detail block of a catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HymnDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lyrics: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<Event>>,
    /// Legacy single-video field, a basename without extension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_file_note: Option<String>,
    /// `false` when `video_file` was rewritten without an existence check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_file_verified: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An ordered event of a hymn (a performance, a service) with its videos.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub videos: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_urls: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_key_follows_index_filename_type_convention() {
        let entry: CatalogEntry = serde_json::from_value(serde_json::json!({
            "id": "h7",
            "filename": "奇异恩典",
            "index": "007",
            "type": "jpg"
        }))
        .unwrap();
        assert_eq!(entry.object_key("hymn-image"), "hymn-image/007.奇异恩典.jpg");
        assert_eq!(entry.object_key("/hymn-image/"), "hymn-image/007.奇异恩典.jpg");
    }

    #[test]
    fn numeric_index_is_rendered_as_written() {
        let entry: CatalogEntry = serde_json::from_value(serde_json::json!({
            "id": "h12",
            "filename": "Amazing Grace",
            "index": 12,
            "type": "png"
        }))
        .unwrap();
        assert_eq!(entry.index, CatalogIndex::Number(Number::from(12u64)));
        assert_eq!(entry.object_name(), "12.Amazing Grace.png");
    }

    #[test]
    fn loose_index_forms_are_accepted() {
        let entry: CatalogEntry = serde_json::from_value(serde_json::json!({
            "id": "h2",
            "filename": "慈爱",
            "index": null,
            "type": "jpg"
        }))
        .unwrap();
        assert_eq!(entry.index, CatalogIndex::Null);
        assert_eq!(entry.index.to_string(), "");
        assert_eq!(serde_json::to_value(&entry).unwrap()["index"], Value::Null);

        let entry: CatalogEntry = serde_json::from_value(serde_json::json!({
            "id": "h3",
            "index": 2.5,
            "type": "jpg"
        }))
        .unwrap();
        assert_eq!(entry.filename, "");
        assert_eq!(entry.index.to_string(), "2.5");
    }

    #[test]
    fn unknown_fields_survive_round_trip() {
        let raw = serde_json::json!({
            "id": "h1",
            "filename": "恩典",
            "index": "001",
            "type": "jpg",
            "composer": "unknown",
            "detail": {
                "audio": "grace",
                "events": [{"title": "Easter", "videos": ["easter-1"]}],
                "credits": ["choir"]
            }
        });
        let entry: CatalogEntry = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(entry.extra.get("composer"), Some(&serde_json::json!("unknown")));
        assert_eq!(serde_json::to_value(&entry).unwrap(), raw);
    }
}
