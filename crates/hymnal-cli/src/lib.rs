use hymnal_core::models::CatalogEntry;
use std::collections::HashSet;

/// Collapse multi-line lyrics into one line with literal `\n` separators,
/// the form catalog `lyrics` fields are written in.
///
/// CRLF line endings count as one break. Every other character, trailing
/// newlines and lone `\r` included, is kept.
pub fn format_lyrics(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\n', "\\n")
}

/// Ids that occur more than once, in first-seen order. Empty ids are ignored.
pub fn duplicate_ids(entries: &[CatalogEntry]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for entry in entries {
        if entry.id.is_empty() {
            continue;
        }
        if !seen.insert(entry.id.as_str()) && !duplicates.contains(&entry.id) {
            duplicates.push(entry.id.clone());
        }
    }
    duplicates
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
