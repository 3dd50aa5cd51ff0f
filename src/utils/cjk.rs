//! CJK text utilities.

/// Check if a string contains at least one CJK unified ideograph.
///
/// Only the base block (U+4E00..U+9FFF) and Extension A (U+3400..U+4DBF)
/// count. An empty string is never CJK.
pub fn is_cjk(s: &str) -> bool {
    s.chars().any(is_cjk_char)
}

fn is_cjk_char(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}' |  // CJK Unified Ideographs
        '\u{3400}'..='\u{4DBF}'    // CJK Unified Ideographs Extension A
    )
}
