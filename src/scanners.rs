//! Line-level recognizers for block constructs.
//!
//! Each scanner looks at the start of its input, which is positioned at the
//! beginning of a line, and either returns the length of what it matched or
//! reports no match. None of them allocate.

use crate::ctype::isspace;
use crate::entity;
use crate::strings::{is_blank, line_len};

/// Up to three leading spaces.
fn indent3(line: &[u8]) -> usize {
    line.iter().take(3).take_while(|&&c| c == b' ').count()
}

/// The length of `line`'s first line if it is blank, newline included.
pub fn blank_line(line: &[u8]) -> Option<usize> {
    let len = line_len(line);
    if len > 0 && is_blank(&line[..len]) {
        Some(len)
    } else {
        None
    }
}

/// `>` with up to three spaces of indent and one optional space after.
pub fn prefix_quote(line: &[u8]) -> Option<usize> {
    let i = indent3(line);
    if line.get(i) != Some(&b'>') {
        return None;
    }
    if line.get(i + 1) == Some(&b' ') {
        Some(i + 2)
    } else {
        Some(i + 1)
    }
}

/// Four spaces of indent.
pub fn prefix_code(line: &[u8]) -> Option<usize> {
    if line.len() >= 4 && line[..4] == *b"    " {
        Some(4)
    } else {
        None
    }
}

/// A setext underline: `===` for level 1, `---` for level 2.
pub fn setext_level(line: &[u8]) -> Option<u8> {
    let (c, level) = match line.first() {
        Some(b'=') => (b'=', 1),
        Some(b'-') => (b'-', 2),
        _ => return None,
    };
    let mut i = line.iter().take_while(|&&b| b == c).count();
    while i < line.len() && line[i] == b' ' {
        i += 1;
    }
    if i >= line.len() || line[i] == b'\n' {
        Some(level)
    } else {
        None
    }
}

/// Whether the line after this one is a setext underline.
fn next_is_setext(data: &[u8]) -> bool {
    let next = line_len(data);
    next < data.len() && setext_level(&data[next..]).is_some()
}

/// `*`, `+` or `-` followed by a space.
pub fn prefix_uli(data: &[u8]) -> Option<usize> {
    let i = indent3(data);
    if i + 1 >= data.len() || !matches!(data[i], b'*' | b'+' | b'-') || data[i + 1] != b' ' {
        return None;
    }
    if next_is_setext(&data[i..]) {
        return None;
    }
    Some(i + 2)
}

/// Digits, `.` and a space.
pub fn prefix_oli(data: &[u8]) -> Option<usize> {
    let mut i = indent3(data);
    let digits = data[i..].iter().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    i += digits;
    if i + 1 >= data.len() || data[i] != b'.' || data[i + 1] != b' ' {
        return None;
    }
    if next_is_setext(&data[i..]) {
        return None;
    }
    Some(i + 2)
}

/// Three or more of the same `*`, `-` or `_`, optionally space separated.
pub fn is_hrule(line: &[u8]) -> bool {
    let mut i = indent3(line);
    if i + 2 >= line.len() || !matches!(line[i], b'*' | b'-' | b'_') {
        return false;
    }
    let c = line[i];
    let mut n = 0;
    while i < line.len() && line[i] != b'\n' {
        if line[i] == c {
            n += 1;
        } else if line[i] != b' ' {
            return false;
        }
        i += 1;
    }
    n >= 3
}

/// A `#` run opening an ATX header. With `space_required`, the run must be
/// followed by a space.
pub fn is_atxheader(line: &[u8], space_required: bool) -> bool {
    if line.first() != Some(&b'#') {
        return false;
    }
    if space_required {
        let level = line.iter().take(6).take_while(|&&c| c == b'#').count();
        if level < line.len() && line[level] != b' ' {
            return false;
        }
    }
    true
}

/// An open code fence: the marker character and how many of it were used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeFence {
    pub marker: u8,
    pub width: usize,
    /// Where the info string starts within the opening line.
    pub info_start: usize,
}

impl CodeFence {
    /// Whether `line` closes this fence: the same marker, at least as many
    /// of it, and nothing else on the line.
    pub fn closed_by(&self, line: &[u8]) -> bool {
        let i = indent3(line);
        let run = line[i..].iter().take_while(|&&c| c == self.marker).count();
        run >= self.width && is_blank(&line[i + run..])
    }
}

/// Three or more backticks or tildes, with up to three spaces of indent.
/// A backtick fence may not have backticks in its info string.
pub fn is_codefence(line: &[u8]) -> Option<CodeFence> {
    let i = indent3(line);
    let marker = match line.get(i) {
        Some(&c @ b'`') | Some(&c @ b'~') => c,
        _ => return None,
    };
    let width = line[i..].iter().take_while(|&&c| c == marker).count();
    if width < 3 {
        return None;
    }

    let info_start = i + width;
    let rest = &line[info_start..line_len(line)];
    if marker == b'`' && rest.contains(&b'`') {
        return None;
    }

    Some(CodeFence {
        marker,
        width,
        info_start,
    })
}

/// The first word of a fence's info string.
pub fn fence_lang<'a>(line: &'a str, fence: &CodeFence) -> Option<&'a str> {
    let info = &line[fence.info_start..];
    let bytes = info.as_bytes();
    let start = bytes.iter().take_while(|&&c| isspace(c)).count();
    let len = bytes[start..].iter().take_while(|&&c| !isspace(c)).count();
    if len == 0 {
        None
    } else {
        Some(&info[start..start + len])
    }
}

/// Recognizes a raw HTML block at the start of `data` and returns its
/// length, including the blank line that ends it if there is one.
///
/// A block opens with a block-level tag and runs to the matching closing
/// tag, which must end its line. HTML comments and `<hr>` also form blocks
/// on their own.
pub fn html_block(data: &[u8]) -> Option<usize> {
    if data.len() < 2 || data[0] != b'<' {
        return None;
    }

    let name_len = data[1..]
        .iter()
        .take_while(|&&c| !matches!(c, b'>' | b' ' | b'\n' | b'/'))
        .count();
    let name = std::str::from_utf8(&data[1..1 + name_len]).ok();

    match name.filter(|n| entity::is_block_tag(n)) {
        Some(tag) => html_block_end(tag, data, true).or_else(|| {
            // The lax search may swallow a trailing paragraph, so `ins` and
            // `del` wrapping inline content don't get it.
            if tag.eq_ignore_ascii_case("ins") || tag.eq_ignore_ascii_case("del") {
                None
            } else {
                html_block_end(tag, data, false)
            }
        }),
        None => html_comment_block(data).or_else(|| html_hr_block(data)),
    }
}

fn html_comment_block(data: &[u8]) -> Option<usize> {
    if data.len() < 5 || &data[1..4] != b"!--" {
        return None;
    }
    let close = data[4..].windows(3).position(|w| w == b"-->")?;
    let i = 4 + close + 3;
    blank_line(&data[i..]).map(|w| i + w)
}

fn html_hr_block(data: &[u8]) -> Option<usize> {
    if data.len() < 4 || !data[1..3].eq_ignore_ascii_case(b"hr") {
        return None;
    }
    if !matches!(data[3], b' ' | b'/' | b'>') {
        return None;
    }
    let close = data[3..].iter().position(|&c| c == b'>')?;
    let i = 3 + close + 1;
    blank_line(&data[i..]).map(|w| i + w)
}

/// Finds the `</tag>` ending the block. In the strict pass the closing tag
/// must start a line once the block spans several; the lax pass takes the
/// first closing tag that ends its line.
fn html_block_end(tag: &str, data: &[u8], strict: bool) -> Option<usize> {
    let mut i = 1;
    let mut newlines = 0;

    while i < data.len() {
        i += 1;
        while i < data.len() && !(data[i - 1] == b'<' && data[i] == b'/') {
            if data[i] == b'\n' {
                newlines += 1;
            }
            i += 1;
        }
        if i >= data.len() {
            break;
        }

        if strict && newlines > 0 && data[i - 2] != b'\n' {
            continue;
        }

        if let Some(len) = html_end_tag(tag, &data[i - 1..]) {
            return Some(i - 1 + len);
        }
    }

    None
}

/// Matches `</tag>` followed by the rest of its line being blank, plus one
/// further blank line if present.
fn html_end_tag(tag: &str, data: &[u8]) -> Option<usize> {
    let tl = tag.len();
    if tl + 3 > data.len()
        || !data[2..2 + tl].eq_ignore_ascii_case(tag.as_bytes())
        || data[tl + 2] != b'>'
    {
        return None;
    }

    let mut i = tl + 3;
    if i < data.len() {
        i += blank_line(&data[i..])?;
    }
    if i < data.len() {
        if let Some(w) = blank_line(&data[i..]) {
            i += w;
        }
    }
    Some(i)
}
