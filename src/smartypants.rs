//! Typographic substitution over already-escaped HTML text.
//!
//! Straight quotes become curly ones, `--` and `---` become en and em dashes,
//! and `...` or `. . .` becomes an ellipsis. The input is text the default
//! renderer has escaped, so quotes may arrive as `&quot;`, `&#34;`, `&#39;`
//! or `&#x27;` as well as bare characters. The output is again escaped text,
//! and running the filter over its own output changes nothing.

use crate::buffer::Buffer;
use crate::ctype::isspace;

#[derive(Clone, Copy, PartialEq, Eq)]
enum QuoteKind {
    Single,
    Double,
}

impl QuoteKind {
    fn entity(self, opening: bool) -> &'static str {
        match (self, opening) {
            (QuoteKind::Single, true) => "&lsquo;",
            (QuoteKind::Single, false) => "&rsquo;",
            (QuoteKind::Double, true) => "&ldquo;",
            (QuoteKind::Double, false) => "&rdquo;",
        }
    }
}

/// Spellings of a straight quote in escaped text, longest first.
const QUOTES: [(&str, QuoteKind); 6] = [
    ("&quot;", QuoteKind::Double),
    ("&#x27;", QuoteKind::Single),
    ("&#34;", QuoteKind::Double),
    ("&#39;", QuoteKind::Single),
    ("\"", QuoteKind::Double),
    ("'", QuoteKind::Single),
];

/// A quote opens after whitespace, at the start of the text, after opening
/// punctuation, or right after another opening quote.
fn opens(prev: Option<u8>, after_open_quote: bool) -> bool {
    match prev {
        None => true,
        Some(c) => after_open_quote || isspace(c) || matches!(c, b'(' | b'[' | b'{'),
    }
}

/// Appends the typographic rendering of `text` to `ob`.
pub(crate) fn filter(ob: &mut Buffer, text: &str) {
    let bytes = text.as_bytes();
    let size = bytes.len();
    let mut i = 0;
    let mut org = 0;
    let mut prev: Option<u8> = None;
    let mut after_open_quote = false;

    while i < size {
        let rest = &bytes[i..];
        let c = bytes[i];

        let replacement = match c {
            b'"' | b'\'' | b'&' => QUOTES
                .iter()
                .find(|(spelling, _)| rest.starts_with(spelling.as_bytes()))
                .map(|&(spelling, kind)| {
                    let opening = opens(prev, after_open_quote);
                    (spelling.len(), kind.entity(opening), opening)
                }),
            b'-' if rest.starts_with(b"---") => Some((3, "&mdash;", false)),
            b'-' if rest.starts_with(b"--") => Some((2, "&ndash;", false)),
            b'.' if rest.starts_with(b"...") => Some((3, "&hellip;", false)),
            b'.' if rest.starts_with(b". . .") => Some((5, "&hellip;", false)),
            _ => None,
        };

        match replacement {
            Some((len, entity, opened)) => {
                if i > org {
                    ob.put(&text[org..i]);
                }
                ob.put(entity);
                prev = Some(bytes[i + len - 1]);
                after_open_quote = opened;
                i += len;
                org = i;
            }
            None => {
                prev = Some(c);
                after_open_quote = false;
                i += 1;
            }
        }
    }

    if size > org {
        ob.put(&text[org..]);
    }
}

/// Applies the typographic substitutions to escaped HTML text.
///
/// ```rust
/// assert_eq!(larkdown::smartypants("&quot;Wait---what&#39;s that...&quot;"),
///            "&ldquo;Wait&mdash;what&rsquo;s that&hellip;&rdquo;");
/// ```
pub fn smartypants(text: &str) -> String {
    let mut ob = Buffer::with_capacity(text.len() + text.len() / 4);
    filter(&mut ob, text);
    ob.into_string()
}

#[cfg(test)]
mod tests {
    use super::smartypants;

    #[test]
    fn quotes_by_context() {
        assert_eq!(smartypants("What&#39;s"), "What&rsquo;s");
        assert_eq!(
            smartypants("&quot;Air quotes are obnoxious.&quot;"),
            "&ldquo;Air quotes are obnoxious.&rdquo;"
        );
        assert_eq!(smartypants("say 'hi'"), "say &lsquo;hi&rsquo;");
        assert_eq!(smartypants("(\"x\")"), "(&ldquo;x&rdquo;)");
        assert_eq!(smartypants("\"'nested'\""), "&ldquo;&lsquo;nested&rsquo;&rdquo;");
    }

    #[test]
    fn dashes_and_ellipses() {
        assert_eq!(smartypants("the---"), "the&mdash;");
        assert_eq!(smartypants("Non--zero."), "Non&ndash;zero.");
        assert_eq!(smartypants("days..."), "days&hellip;");
        assert_eq!(smartypants("wait. . . what"), "wait&hellip; what");
        assert_eq!(smartypants("a-b"), "a-b");
    }

    #[test]
    fn multibyte_text() {
        assert_eq!(
            smartypants("Café &#39;crème&#39; -- déjà vu..."),
            "Café &lsquo;crème&rsquo; &ndash; déjà vu&hellip;"
        );
        assert_eq!(smartypants("日本語"), "日本語");
    }

    #[test]
    fn leaves_other_entities() {
        assert_eq!(smartypants("AT&amp;T &lt;3"), "AT&amp;T &lt;3");
    }

    #[test]
    fn idempotent() {
        let once = smartypants("&quot;It&#39;s---well... fine--ish&quot;");
        assert_eq!(smartypants(&once), once);
    }
}
