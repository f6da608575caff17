//! Catalog and document fixtures.

use serde_json::{json, Value};
use std::path::Path;

pub fn write_json(dir: &Path, relative: &str, value: &Value) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    std::fs::write(&path, serde_json::to_vec_pretty(value).unwrap())
        .expect("Failed to write fixture");
}

/// `count` entries `h1..hN` named `hymn-01..` with zero-padded indexes.
pub fn numbered_catalog(count: usize) -> Value {
    Value::Array(
        (1..=count)
            .map(|i| {
                json!({
                    "id": format!("h{}", i),
                    "filename": format!("hymn-{:02}", i),
                    "index": format!("{:03}", i),
                    "type": "jpg"
                })
            })
            .collect(),
    )
}

/// Two hymns matching the keys `001.恩典.jpg` and `002.慈爱.jpg`, only the first tagged.
pub fn grace_catalog() -> Value {
    json!([
        {
            "id": "grace",
            "filename": "恩典",
            "index": "001",
            "type": "jpg",
            "tag": "赞美",
            "detail": {
                "audio": "grace.mp3",
                "lyrics": "奇异恩典\n何等甘甜",
                "events": [
                    { "title": "复活节", "videos": ["easter-1", "easter-2.mov"] }
                ]
            }
        },
        {
            "id": "mercy",
            "filename": "慈爱",
            "index": "002",
            "type": "jpg",
            "detail": { "video_file": "mercy-live" }
        }
    ])
}
