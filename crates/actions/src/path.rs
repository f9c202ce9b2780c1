//! Action paths and filters.
//!
//! A path is a list of segments joined by [`SEGMENT_SEPARATOR`], e.g.
//! `Mupen64>Emulation>Pause`. A filter is a path whose final segment may be [`WILDCARD`],
//! matching every action below the prefix. Wildcards anywhere else are unsupported.

/// The character separating segments in action paths and filters.
pub const SEGMENT_SEPARATOR: &str = ">";

/// Segment suffix marking that a visual separator follows the item.
pub const SEPARATOR_SUFFIX: &str = "---";

/// Terminal filter segment matching any descendant.
pub const WILDCARD: &str = "*";

/// Split a filter into whitespace-trimmed segments.
///
/// Empty segments are preserved so callers can reject malformed paths; an empty or all-blank
/// input yields no segments.
pub fn get_segments(filter: &str) -> Vec<String> {
    if filter.trim().is_empty() {
        return Vec::new();
    }
    filter
        .split(SEGMENT_SEPARATOR)
        .map(|s| s.trim().to_string())
        .collect()
}

/// Join segments with the canonical separator.
pub fn join_segments<S: AsRef<str>>(segments: &[S]) -> String {
    let parts: Vec<&str> = segments.iter().map(AsRef::as_ref).collect();
    parts.join(SEGMENT_SEPARATOR)
}

/// Canonicalize a filter by splitting it into segments and joining them back.
pub fn normalize_filter(filter: &str) -> String {
    join_segments(&get_segments(filter))
}

/// Whether a segment name asks for a trailing separator.
pub fn has_separator(segment: &str) -> bool {
    segment.trim_end().ends_with(SEPARATOR_SUFFIX)
}

/// Display name derived from a single segment: the separator suffix is stripped and the result
/// trimmed.
pub fn segment_display_name(segment: &str) -> String {
    let trimmed = segment.trim();
    trimmed
        .strip_suffix(SEPARATOR_SUFFIX)
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}

/// The parent of a path (all segments but the last), or `None` for single-segment paths.
pub fn parent_of(path: &str) -> Option<String> {
    let segs = get_segments(path);
    if segs.len() <= 1 {
        return None;
    }
    Some(join_segments(&segs[..segs.len() - 1]))
}

/// A filter split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Filter {
    /// Matches exactly one path.
    Exact(Vec<String>),
    /// Matches every action strictly below the prefix (empty prefix: everything).
    Subtree(Vec<String>),
    /// Malformed or unsupported (empty, empty segment, mid-path wildcard).
    Invalid,
}

impl Filter {
    /// Parse a filter string.
    pub(crate) fn parse(filter: &str) -> Self {
        let mut segs = get_segments(filter);
        if segs.is_empty() || segs.iter().any(String::is_empty) {
            return Self::Invalid;
        }
        let wildcard = segs.last().is_some_and(|s| s == WILDCARD);
        if wildcard {
            segs.pop();
        }
        if segs.iter().any(|s| s == WILDCARD) {
            return Self::Invalid;
        }
        if wildcard {
            Self::Subtree(segs)
        } else {
            Self::Exact(segs)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_are_trimmed() {
        assert_eq!(
            get_segments("Mupen64 > File >Load ROM..."),
            vec!["Mupen64", "File", "Load ROM..."]
        );
        assert_eq!(get_segments("A>>B"), vec!["A", "", "B"]);
        assert!(get_segments("   ").is_empty());
    }

    #[test]
    fn normalize_canonicalizes_spacing() {
        assert_eq!(normalize_filter(" A > B >C "), "A>B>C");
        assert_eq!(normalize_filter("A>*"), "A>*");
        assert_eq!(normalize_filter(""), "");
    }

    #[test]
    fn separator_suffix() {
        assert!(has_separator("Recent ROMs ---"));
        assert!(!has_separator("Recent ROMs"));
        assert_eq!(segment_display_name("Recent ROMs ---"), "Recent ROMs");
        assert_eq!(segment_display_name(" Pause "), "Pause");
    }

    #[test]
    fn parent() {
        assert_eq!(parent_of("A>B>C").as_deref(), Some("A>B"));
        assert_eq!(parent_of("A"), None);
    }

    #[test]
    fn filter_parsing() {
        assert_eq!(Filter::parse("*"), Filter::Subtree(vec![]));
        assert_eq!(
            Filter::parse("A > *"),
            Filter::Subtree(vec!["A".to_string()])
        );
        assert_eq!(
            Filter::parse("A>B"),
            Filter::Exact(vec!["A".to_string(), "B".to_string()])
        );
        assert_eq!(Filter::parse("A>*>C"), Filter::Invalid);
        assert_eq!(Filter::parse("A>>C"), Filter::Invalid);
        assert_eq!(Filter::parse(""), Filter::Invalid);
    }
}
