//! Recognition of HTML character references.
//!
//! Entities are never decoded: a well-formed reference is passed through to
//! the output verbatim, anything else is escaped like ordinary text.

use crate::ctype::{isalnum, isdigit, isxdigit};

mod tables {
    include!(concat!(env!("OUT_DIR"), "/tables.rs"));
}

pub(crate) use tables::BLOCK_TAGS;

/// Longest run of digits accepted in a numeric reference.
const MAX_NUMERIC_DIGITS: usize = 8;

/// Returns the byte length of the character reference at the start of
/// `text`, which must begin with `&`. Accepts `&#NNN;`, `&#xHHH;` and
/// `&name;` where `name` is a known HTML5 entity name.
pub fn scan(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    if bytes.first() != Some(&b'&') {
        return None;
    }

    if bytes.get(1) == Some(&b'#') {
        let (start, digit): (usize, fn(u8) -> bool) = match bytes.get(2) {
            Some(b'x') | Some(b'X') => (3, isxdigit),
            _ => (2, isdigit),
        };
        let digits = bytes[start..].iter().take_while(|&&b| digit(b)).count();
        let end = start + digits;
        return if (1..=MAX_NUMERIC_DIGITS).contains(&digits) && bytes.get(end) == Some(&b';') {
            Some(end + 1)
        } else {
            None
        };
    }

    let name_len = bytes[1..]
        .iter()
        .take(tables::MAX_ENTITY_NAME + 1)
        .take_while(|&&b| isalnum(b))
        .count();
    let end = 1 + name_len;
    if name_len == 0 || bytes.get(end) != Some(&b';') {
        return None;
    }

    if tables::ENTITY_NAMES.contains(&text[1..end]) {
        Some(end + 1)
    } else {
        None
    }
}

/// Whether `name` is one of the block-level tags that may open a raw HTML
/// block. Matching is ASCII case-insensitive.
pub fn is_block_tag(name: &str) -> bool {
    if name.len() > 16 {
        return false;
    }
    let lower = name.to_ascii_lowercase();
    BLOCK_TAGS.contains(lower.as_str())
}

#[cfg(test)]
mod tests {
    use super::{is_block_tag, scan};

    #[test]
    fn numeric() {
        assert_eq!(scan("&#9731; snowman"), Some(7));
        assert_eq!(scan("&#x2603;"), Some(8));
        assert_eq!(scan("&#X2603;"), Some(8));
        assert_eq!(scan("&#;"), None);
        assert_eq!(scan("&#123456789;"), None);
        assert_eq!(scan("&#12"), None);
    }

    #[test]
    fn named() {
        assert_eq!(scan("&amp;"), Some(5));
        assert_eq!(scan("&copy; 2024"), Some(6));
        assert_eq!(scan("&bogus;"), None);
        assert_eq!(scan("&amp"), None);
        assert_eq!(scan("& amp;"), None);
        assert_eq!(scan("amp;"), None);
    }

    #[test]
    fn block_tags() {
        assert!(is_block_tag("div"));
        assert!(is_block_tag("DIV"));
        assert!(is_block_tag("h3"));
        assert!(!is_block_tag("span"));
        assert!(!is_block_tag("a"));
    }
}
