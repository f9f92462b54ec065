//! The pre-scan: collects link reference and footnote definitions, removing
//! them from the text, and normalizes line endings and tabs in what remains.

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::parser::options::{Extensions, Options, RenderFlags};
use crate::scanners::{is_codefence, CodeFence};
use crate::strings::{expand_tabs, is_blank, line_len, normalize_label};

/// The target of a `[label]: url "title"` definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub url: String,
    pub title: Option<String>,
}

/// Link reference definitions, keyed by normalized label.
#[derive(Debug, Default)]
pub struct ReferenceTable {
    map: FxHashMap<String, Reference>,
}

impl ReferenceTable {
    /// Records a definition. The first definition of a label wins; returns
    /// whether this one was kept.
    pub fn insert(&mut self, label: &str, reference: Reference) -> bool {
        let key = normalize_label(label);
        if self.map.contains_key(&key) {
            trace!(label = %key, "duplicate reference definition ignored");
            return false;
        }
        self.map.insert(key, reference);
        true
    }

    pub fn get(&self, label: &str) -> Option<&Reference> {
        self.map.get(&normalize_label(label))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }
}

#[derive(Debug)]
struct Footnote {
    body: String,
    number: Option<u32>,
}

/// Footnote definitions, and the order in which they are first referenced.
#[derive(Debug, Default)]
pub struct FootnoteTable {
    defs: FxHashMap<String, Footnote>,
    used: Vec<String>,
    taken: usize,
}

impl FootnoteTable {
    /// Records a definition; as with references, the first one wins.
    pub fn define(&mut self, label: &str, body: String) -> bool {
        let key = normalize_label(label);
        if self.defs.contains_key(&key) {
            return false;
        }
        self.defs.insert(key, Footnote { body, number: None });
        true
    }

    /// The number of a defined footnote, assigning the next one on first use.
    /// Undefined labels have no number.
    pub fn number_for(&mut self, label: &str) -> Option<u32> {
        let key = normalize_label(label);
        let next = self.used.len() as u32 + 1;
        let footnote = self.defs.get_mut(&key)?;
        match footnote.number {
            Some(n) => Some(n),
            None => {
                footnote.number = Some(next);
                self.used.push(key);
                Some(next)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// The definitions referenced since the last call, as `(number, body)`
    /// in number order. Rendering a body may reference further footnotes,
    /// which the next call picks up.
    pub fn take_used(&mut self) -> Vec<(u32, String)> {
        let fresh = &self.used[self.taken..];
        let out = fresh
            .iter()
            .filter_map(|key| {
                let footnote = self.defs.get(key)?;
                Some((footnote.number?, footnote.body.clone()))
            })
            .collect();
        self.taken = self.used.len();
        out
    }
}

const UTF8_BOM: &str = "\u{feff}";

/// Runs the pre-scan over `md`, filling `refs` and `footnotes` and returning
/// the text left for block parsing: LF line endings, tabs expanded, and a
/// trailing newline.
pub fn prescan(
    md: &str,
    options: &Options,
    refs: &mut ReferenceTable,
    footnotes: &mut FootnoteTable,
) -> String {
    let md = md.strip_prefix(UTF8_BOM).unwrap_or(md);
    let text = normalize_newlines(md);

    let leading_only = !options.render.contains(RenderFlags::EXPAND_TABS);
    let footnotes_enabled = options.extension.contains(Extensions::FOOTNOTES);
    let fenced = options.extension.contains(Extensions::FENCED_CODE);

    let mut out = String::with_capacity(text.len());
    let mut fence: Option<CodeFence> = None;
    let bytes = text.as_bytes();
    let mut beg = 0;

    while beg < bytes.len() {
        let rest = &text[beg..];
        let end = beg + line_len(rest.as_bytes());

        if fenced {
            let line = &bytes[beg..end];
            match fence {
                Some(open) => {
                    if open.closed_by(line) {
                        fence = None;
                    }
                }
                None => fence = is_codefence(line),
            }
        }

        if fence.is_none() {
            if footnotes_enabled {
                if let Some((consumed, label, body)) = scan_footnote_def(rest) {
                    footnotes.define(label, body);
                    beg += consumed;
                    continue;
                }
            }

            if let Some((consumed, label, url, title)) = scan_reference_def(rest) {
                refs.insert(
                    label,
                    Reference {
                        url: url.to_string(),
                        title: title.map(str::to_string),
                    },
                );
                beg += consumed;
                continue;
            }
        }

        expand_tabs(&mut out, &text[beg..end], leading_only);
        beg = end;
    }

    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }

    debug!(
        references = refs.len(),
        footnotes = footnotes.len(),
        "prescan complete"
    );
    out
}

/// Converts CRLF and lone CR line endings to LF.
fn normalize_newlines(md: &str) -> String {
    let mut out = String::with_capacity(md.len());
    let bytes = md.as_bytes();
    let mut org = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\r' {
            out.push_str(&md[org..i]);
            out.push('\n');
            if bytes.get(i + 1) == Some(&b'\n') {
                i += 1;
            }
            org = i + 1;
        }
        i += 1;
    }
    out.push_str(&md[org..]);
    out
}

/// Up to three leading spaces; `None` for four or more.
fn leading_indent(b: &[u8]) -> Option<usize> {
    let n = b.iter().take(4).take_while(|&&c| c == b' ').count();
    if n > 3 {
        None
    } else {
        Some(n)
    }
}

fn skip_spaces(b: &[u8], mut i: usize) -> usize {
    while i < b.len() && b[i] == b' ' {
        i += 1;
    }
    i
}

/// Matches `[label]: url "title"` at the start of `data`. The title may sit
/// on the following line and be quoted with `"`, `'` or parentheses.
///
/// Returns the bytes consumed, the label, the url and the title.
fn scan_reference_def(data: &str) -> Option<(usize, &str, &str, Option<&str>)> {
    let b = data.as_bytes();
    let end = b.len();

    let mut i = leading_indent(b)?;
    if b.get(i) != Some(&b'[') {
        return None;
    }
    i += 1;

    let id_start = i;
    while i < end && b[i] != b'\n' && b[i] != b']' {
        i += 1;
    }
    if i >= end || b[i] != b']' {
        return None;
    }
    let id_end = i;

    i += 1;
    if b.get(i) != Some(&b':') {
        return None;
    }
    i = skip_spaces(b, i + 1);

    if i < end && b[i] == b'\n' {
        i = skip_spaces(b, i + 1);
    }
    if i >= end {
        return None;
    }

    if b[i] == b'<' {
        i += 1;
    }
    let link_start = i;
    while i < end && b[i] != b' ' && b[i] != b'\n' {
        i += 1;
    }
    let link_end = if i > link_start && b[i - 1] == b'>' {
        i - 1
    } else {
        i
    };
    if link_end == link_start {
        return None;
    }

    i = skip_spaces(b, i);
    if i < end && !matches!(b[i], b'\n' | b'\'' | b'"' | b'(') {
        return None;
    }

    let mut line_end = None;
    if i >= end || b[i] == b'\n' {
        line_end = Some(i);
        i = skip_spaces(b, i + 1);
    }

    let mut title = None;
    if i + 1 < end && matches!(b[i], b'\'' | b'"' | b'(') {
        i += 1;
        let title_start = i;
        while i < end && b[i] != b'\n' {
            i += 1;
        }
        let title_line_end = i;

        let mut j = i - 1;
        while j > title_start && b[j] == b' ' {
            j -= 1;
        }
        if j > title_start && matches!(b[j], b'\'' | b'"' | b')') {
            line_end = Some(title_line_end);
            title = Some(&data[title_start..j]);
        }
    }

    let line_end = line_end?;
    let consumed = (line_end + 1).min(end);
    Some((
        consumed,
        &data[id_start..id_end],
        &data[link_start..link_end],
        title,
    ))
}

/// Matches `[^label]: body` at the start of `data`. Continuation lines are
/// indented; blank lines are kept when more indented content follows them.
///
/// Returns the bytes consumed, the label, and the de-indented body.
fn scan_footnote_def(data: &str) -> Option<(usize, &str, String)> {
    let b = data.as_bytes();
    let end = b.len();

    let mut i = leading_indent(b)?;
    if b.get(i) != Some(&b'[') || b.get(i + 1) != Some(&b'^') {
        return None;
    }
    i += 2;

    let id_start = i;
    while i < end && b[i] != b'\n' && b[i] != b']' {
        i += 1;
    }
    if i >= end || b[i] != b']' || i == id_start {
        return None;
    }
    let id_end = i;

    i += 1;
    if b.get(i) != Some(&b':') {
        return None;
    }
    i = skip_spaces(b, i + 1);

    let mut body = String::new();
    let first_end = i + line_len(&b[i..]);
    body.push_str(&data[i..first_end]);
    if !body.is_empty() && !body.ends_with('\n') {
        body.push('\n');
    }

    let mut consumed = first_end;
    let mut beg = first_end;
    let mut pending_blank = false;

    while beg < end {
        let line_end = beg + line_len(&b[beg..]);
        let line = &b[beg..line_end];

        if is_blank(line) {
            pending_blank = true;
            beg = line_end;
            continue;
        }

        let indent = line.iter().take(4).take_while(|&&c| c == b' ').count();
        if indent == 0 {
            break;
        }

        if pending_blank {
            body.push('\n');
            pending_blank = false;
        }
        body.push_str(&data[beg + indent..line_end]);
        if !body.ends_with('\n') {
            body.push('\n');
        }

        beg = line_end;
        consumed = line_end;
    }

    Some((consumed, &data[id_start..id_end], body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_forms() {
        assert_eq!(
            scan_reference_def("[a]: /url\nrest"),
            Some((10, "a", "/url", None))
        );
        assert_eq!(
            scan_reference_def("   [Label]: <http://x> \"Title\"\n"),
            Some((31, "Label", "http://x", Some("Title")))
        );
        assert_eq!(
            scan_reference_def("[b]:\n  /next-line\n  (paren title)\nx\n"),
            Some((34, "b", "/next-line", Some("paren title")))
        );
        assert_eq!(scan_reference_def("    [a]: /url\n"), None);
        assert_eq!(scan_reference_def("[a] /url\n"), None);
        assert_eq!(
            scan_reference_def("[alert]: javascript:alert('it\\'s a trap');\n"),
            None
        );
    }

    #[test]
    fn title_on_next_line_is_optional() {
        // The following line isn't a title, so only the first line goes.
        assert_eq!(
            scan_reference_def("[a]: /u\n(not a title\n"),
            Some((8, "a", "/u", None))
        );
    }

    #[test]
    fn footnote_bodies() {
        let (consumed, label, body) =
            scan_footnote_def("[^1]: First.\n    Second.\n\n    Third.\n\nAfter.\n").unwrap();
        assert_eq!(label, "1");
        assert_eq!(body, "First.\nSecond.\n\nThird.\n");
        assert_eq!(consumed, 37);
        assert_eq!(scan_footnote_def("[^]: empty\n"), None);
    }

    #[test]
    fn first_definition_wins() {
        let mut refs = ReferenceTable::default();
        let r = |url: &str| Reference {
            url: url.into(),
            title: None,
        };
        assert!(refs.insert("Foo  Bar", r("/one")));
        assert!(!refs.insert("foo bar", r("/two")));
        assert_eq!(refs.get("FOO BAR").map(|r| r.url.as_str()), Some("/one"));
    }

    #[test]
    fn footnote_numbering() {
        let mut notes = FootnoteTable::default();
        notes.define("a", "A\n".into());
        notes.define("b", "B\n".into());
        notes.define("unused", "U\n".into());
        assert_eq!(notes.number_for("b"), Some(1));
        assert_eq!(notes.number_for("a"), Some(2));
        assert_eq!(notes.number_for("b"), Some(1));
        assert_eq!(notes.number_for("missing"), None);
        assert_eq!(
            notes.take_used(),
            vec![(1, "B\n".to_string()), (2, "A\n".to_string())]
        );
        assert!(notes.take_used().is_empty());

        // A reference from inside a rendered body comes out on the next pass.
        assert_eq!(notes.number_for("unused"), Some(3));
        assert_eq!(notes.number_for("a"), Some(2));
        assert_eq!(notes.take_used(), vec![(3, "U\n".to_string())]);
    }

    #[test]
    fn prescan_strips_definitions() {
        let mut refs = ReferenceTable::default();
        let mut notes = FootnoteTable::default();
        let options = Options::new(
            Extensions::FOOTNOTES | Extensions::FENCED_CODE,
            RenderFlags::empty(),
        );
        let text = prescan(
            "\u{feff}a\r\n[x]: /x\r\n\tb\r[^n]: note\n```\n[y]: /y\n```",
            &options,
            &mut refs,
            &mut notes,
        );
        assert_eq!(text, "a\n    b\n```\n[y]: /y\n```\n");
        assert_eq!(refs.len(), 1);
        assert!(refs.get("y").is_none());
        assert_eq!(notes.len(), 1);
    }
}
