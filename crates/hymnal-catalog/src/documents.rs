//! Activity and meeting-topic documents served verbatim from the data directory.

use crate::error::{CatalogError, CatalogResult};
use serde_json::Value;
use std::path::{Path, PathBuf};

pub const ACTIVITY_LIST: &str = "activityData/activityList.json";
pub const TOPIC_LIST: &str = "meetingData/topicList.json";
pub const TOPIC_DETAIL: &str = "meetingData/topicDetail.json";

#[derive(Debug, Clone)]
pub struct DataDocumentRepository {
    data_dir: PathBuf,
}

impl DataDocumentRepository {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        DataDocumentRepository {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Read and parse one JSON document relative to the data directory.
    #[tracing::instrument(skip(self), fields(document.operation = "load"))]
    pub async fn load(&self, relative: &str) -> CatalogResult<Value> {
        let path = self.data_dir.join(relative);
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(CatalogError::NotFound { tried: vec![path] });
        }

        let raw = tokio::fs::read(&path).await?;
        serde_json::from_slice(&raw).map_err(|source| CatalogError::Parse { path, source })
    }

    pub async fn activity_list(&self) -> CatalogResult<Value> {
        self.load(ACTIVITY_LIST).await
    }

    pub async fn topic_list(&self) -> CatalogResult<Value> {
        self.load(TOPIC_LIST).await
    }

    /// Topic whose `id` equals `id`, compared as text so `7` matches `"7"`.
    pub async fn topic_detail(&self, id: &str) -> CatalogResult<Option<Value>> {
        let document = self.load(TOPIC_DETAIL).await?;
        Ok(find_by_id(&document, id).cloned())
    }
}

fn find_by_id<'a>(document: &'a Value, id: &str) -> Option<&'a Value> {
    let items = match document {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("data") {
            Some(Value::Array(items)) => items,
            _ => return None,
        },
        _ => return None,
    };

    items.iter().find(|item| match item.get("id") {
        Some(Value::String(s)) => s == id,
        Some(Value::Number(n)) => n.to_string() == id,
        _ => false,
    })
}
