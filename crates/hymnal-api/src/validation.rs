//! Lenient query-parameter parsing for API handlers
//!
//! Paging parameters never reject a request: unparseable or non-positive values
//! fall back to the defaults, and page sizes are clamped.

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 1000;

/// 1-based page number.
pub fn parse_page(value: Option<&str>) -> u32 {
    parse_positive(value).unwrap_or(DEFAULT_PAGE)
}

/// Page size clamped to `1..=MAX_PAGE_SIZE`.
pub fn parse_page_size(value: Option<&str>) -> u32 {
    parse_positive(value)
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .min(MAX_PAGE_SIZE)
}

/// `true`, `1` and `yes` (any case) enable a flag; anything else disables it.
pub fn parse_flag(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_lowercase()).as_deref(),
        Some("true") | Some("1") | Some("yes")
    )
}

/// Trimmed value, `None` when absent or blank.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_positive(value: Option<&str>) -> Option<u32> {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v >= 1)
        .map(|v| v.min(u32::MAX as i64) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults_on_garbage() {
        assert_eq!(parse_page(None), 1);
        assert_eq!(parse_page(Some("abc")), 1);
        assert_eq!(parse_page(Some("0")), 1);
        assert_eq!(parse_page(Some("-3")), 1);
        assert_eq!(parse_page(Some(" 4 ")), 4);
    }

    #[test]
    fn test_page_size_is_clamped() {
        assert_eq!(parse_page_size(None), 20);
        assert_eq!(parse_page_size(Some("")), 20);
        assert_eq!(parse_page_size(Some("0")), 20);
        assert_eq!(parse_page_size(Some("50")), 50);
        assert_eq!(parse_page_size(Some("5000")), 1000);
    }

    #[test]
    fn test_flags() {
        assert!(parse_flag(Some("true")));
        assert!(parse_flag(Some("1")));
        assert!(parse_flag(Some("YES")));
        assert!(!parse_flag(Some("false")));
        assert!(!parse_flag(Some("")));
        assert!(!parse_flag(None));
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  ".to_string())), None);
        assert_eq!(non_blank(Some(" drama ".to_string())), Some("drama".to_string()));
        assert_eq!(non_blank(None), None);
    }
}
