//! Object key convention shared by listing, search, detail and upload.
//!
//! Keys are `<folder>/<index>.<filename>.<extension>`. Folders are stored
//! without surrounding slashes.

/// Image extensions recognised by listing and search (compared case-insensitively).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// Video extensions a basename may already carry.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi"];

/// Join a folder and a name into an object key.
pub fn join_key(folder: &str, name: &str) -> String {
    let folder = folder.trim_matches('/');
    let name = name.trim_start_matches('/');
    if folder.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", folder, name)
    }
}

/// Listing prefix for a folder: `<folder>/`, or empty for the bucket root.
pub fn folder_prefix(folder: &str) -> String {
    let folder = folder.trim_matches('/');
    if folder.is_empty() {
        String::new()
    } else {
        format!("{}/", folder)
    }
}

/// Strip the folder prefix from a key, if the key lives under it.
pub fn strip_folder<'a>(key: &'a str, folder: &str) -> Option<&'a str> {
    key.strip_prefix(&folder_prefix(folder))
}

/// Lowercased extension of a name, without the dot.
pub fn extension(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

pub fn has_image_extension(name: &str) -> bool {
    extension(name)
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

pub fn has_video_extension(name: &str) -> bool {
    extension(name)
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// A name with its final extension removed.
pub fn basename(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}

/// Components recovered from a stripped object name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub index: String,
    pub filename: String,
}

/// Recover `(index, filename)` from `<index>.<filename>.<extension>`.
///
/// Dots inside the filename are kept. Names with fewer than three parts have
/// no index; their filename is the name without its extension.
pub fn parse_object_name(name: &str) -> ParsedName {
    let parts: Vec<&str> = name.split('.').collect();
    if parts.len() < 3 {
        return ParsedName {
            index: String::new(),
            filename: basename(name).to_string(),
        };
    }

    ParsedName {
        index: parts[0].to_string(),
        filename: parts[1..parts.len() - 1].join("."),
    }
}

/// Builder of non-expiring object URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicUrl {
    base: String,
}

impl PublicUrl {
    pub fn new(base: impl Into<String>) -> Self {
        let base: String = base.into();
        PublicUrl {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    /// `https://<bucket>.<region>.aliyuncs.com`
    pub fn aliyun(bucket: &str, region: &str) -> Self {
        PublicUrl::new(format!("https://{}.{}.aliyuncs.com", bucket, region))
    }

    /// Public URL of `key`; root-relative when no base is known.
    pub fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.base, key.trim_start_matches('/'))
    }

    pub fn base(&self) -> &str {
        &self.base
    }
}
