use crate::ctype::{ispunct, isspace};
use std::borrow::Cow;

/// Columns between tab stops.
pub const TAB_STOP: usize = 4;

/// Removes backslash escapes in front of ASCII punctuation, as applied to
/// link destinations before they reach the renderer.
pub fn unescape(v: &str) -> Cow<'_, str> {
    let bytes = v.as_bytes();
    if !bytes.contains(&b'\\') {
        return Cow::Borrowed(v);
    }

    let mut out = String::with_capacity(v.len());
    let mut org = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 1 < bytes.len() && ispunct(bytes[i + 1]) {
            out.push_str(&v[org..i]);
            org = i + 1;
            i += 2;
        } else {
            i += 1;
        }
    }
    out.push_str(&v[org..]);
    Cow::Owned(out)
}

/// Normalizes a reference label for lookup: surrounding whitespace is
/// dropped, interior whitespace runs collapse to a single space, and the
/// result is case folded.
pub fn normalize_label(i: &str) -> String {
    let i = i.trim_matches(|c: char| c.is_ascii() && isspace(c as u8));

    let mut v = String::with_capacity(i.len());
    let mut last_was_whitespace = false;
    for c in i.chars() {
        if c.is_whitespace() {
            if !last_was_whitespace {
                last_was_whitespace = true;
                v.push(' ');
            }
        } else {
            last_was_whitespace = false;
            v.push(c);
        }
    }
    caseless::default_case_fold_str(&v)
}

/// Whether the line consists only of spaces and tabs up to its newline.
pub fn is_blank(s: &[u8]) -> bool {
    for &c in s {
        match c {
            b'\n' | b'\r' => return true,
            b' ' | b'\t' => (),
            _ => return false,
        }
    }
    true
}

/// Length of the first line of `data` including its terminating newline, or
/// the whole remainder when there is none.
pub fn line_len(data: &[u8]) -> usize {
    jetscii::bytes!(b'\n')
        .find(data)
        .map_or(data.len(), |pos| pos + 1)
}

/// Appends `line` to `out`, expanding tabs to [`TAB_STOP`] columns. With
/// `leading_only`, only the tabs in the line's indentation are expanded.
pub fn expand_tabs(out: &mut String, line: &str, leading_only: bool) {
    let mut col = 0;
    let mut in_indent = true;
    for c in line.chars() {
        match c {
            '\t' if in_indent || !leading_only => {
                let width = TAB_STOP - (col % TAB_STOP);
                for _ in 0..width {
                    out.push(' ');
                }
                col += width;
            }
            ' ' => {
                out.push(' ');
                col += 1;
            }
            _ => {
                in_indent = false;
                out.push(c);
                // Columns count characters, not bytes.
                col += 1;
            }
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::{expand_tabs, is_blank, line_len, normalize_label, unescape};

    #[test]
    fn unescape_punctuation_only() {
        assert_eq!(unescape(r"a\_b\\c\d"), r"a_b\c\d");
        assert!(matches!(unescape("plain"), std::borrow::Cow::Borrowed(_)));
    }

    #[test]
    fn normalize_label_collapses_and_folds() {
        assert_eq!(normalize_label("  Foo \n  BAR "), "foo bar");
        assert_eq!(normalize_label("Straße"), "strasse");
    }

    #[test]
    fn blank_lines() {
        assert!(is_blank(b"  \t \nnext"));
        assert!(is_blank(b""));
        assert!(!is_blank(b"  x\n"));
    }

    #[test]
    fn line_lengths() {
        assert_eq!(line_len(b"ab\ncd"), 3);
        assert_eq!(line_len(b"abcd"), 4);
    }

    #[test]
    fn tab_expansion() {
        let mut s = String::new();
        expand_tabs(&mut s, "\tx\ty", true);
        assert_eq!(s, "    x\ty");

        let mut s = String::new();
        expand_tabs(&mut s, "ab\tc", false);
        assert_eq!(s, "ab  c");
    }
}
