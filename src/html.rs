//! The default HTML renderer, and the escaping it is built on.

use std::fmt::Write;

use crate::buffer::Buffer;
use crate::character_set::{byte_table, character_set};
use crate::ctype::isalnum;
use crate::nodes::{AutolinkType, CellFlags, Node};
use crate::parser::options::RenderFlags;
use crate::smartypants;

const HTML_ESCAPE: [u8; 256] = byte_table!(
    b'&' => 1,
    b'<' => 2,
    b'>' => 3,
    b'"' => 4,
    b'\'' => 5,
);

const HTML_ESCAPED: [&str; 6] = ["", "&amp;", "&lt;", "&gt;", "&quot;", "&#39;"];

const HREF_SAFE: [bool; 256] = character_set!(
    b"-_.+!*(),%#@?=;:/$~",
    b"abcdefghijklmnopqrstuvwxyz",
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    b"0123456789"
);

/// URL prefixes considered safe under [`RenderFlags::SAFELINK`]. Each must be
/// followed by an alphanumeric character.
const SAFE_PREFIXES: [&str; 6] = ["http://", "https://", "ftp://", "mailto:", "/", "#"];

/// Writes `text` to `output`, escaping `& < > " '`.
pub(crate) fn escape(output: &mut Buffer, text: &str) {
    let bytes = text.as_bytes();
    let size = bytes.len();
    let mut i = 0;

    while i < size {
        let org = i;
        while i < size && HTML_ESCAPE[bytes[i] as usize] == 0 {
            i += 1;
        }

        if i > org {
            output.put(&text[org..i]);
        }

        if i >= size {
            break;
        }

        output.put(HTML_ESCAPED[HTML_ESCAPE[bytes[i] as usize] as usize]);
        i += 1;
    }
}

/// Writes a URL for use inside a double-quoted attribute. Bytes outside the
/// safe set are percent-encoded; `&` and `'` become character references.
pub(crate) fn escape_href(output: &mut Buffer, url: &str) {
    let bytes = url.as_bytes();
    let size = bytes.len();
    let mut i = 0;

    while i < size {
        let org = i;
        while i < size && HREF_SAFE[bytes[i] as usize] {
            i += 1;
        }

        if i > org {
            output.put(&url[org..i]);
        }

        if i >= size {
            break;
        }

        match bytes[i] {
            b'&' => output.put("&amp;"),
            b'\'' => output.put("&#x27;"),
            b => {
                let _ = write!(output, "%{:02X}", b);
            }
        }

        i += 1;
    }
}

/// Escapes `text` for HTML text or attribute content.
///
/// ```rust
/// assert_eq!(larkdown::escape_html("<a href='x'>&</a>"),
///            "&lt;a href=&#39;x&#39;&gt;&amp;&lt;/a&gt;");
/// ```
pub fn escape_html(text: &str) -> String {
    let mut b = Buffer::with_capacity(text.len() + text.len() / 8);
    escape(&mut b, text);
    b.into_string()
}

/// Whether `url` starts with one of the whitelisted schemes (or `/`, `#`)
/// followed by an alphanumeric character.
pub fn has_safe_prefix(url: &str) -> bool {
    let bytes = url.as_bytes();
    SAFE_PREFIXES.iter().any(|prefix| {
        let len = prefix.len();
        bytes.len() > len
            && bytes[..len].eq_ignore_ascii_case(prefix.as_bytes())
            && isalnum(bytes[len])
    })
}

/// Whether `url` may be linked to under [`RenderFlags::SAFELINK`]: a
/// whitelisted scheme, or a relative reference with no scheme at all.
///
/// ```rust
/// use larkdown::is_safe_link;
/// assert!(is_safe_link("https://example.org/"));
/// assert!(is_safe_link("images/spacer.gif"));
/// assert!(!is_safe_link("javascript:alert(1)"));
/// ```
pub fn is_safe_link(url: &str) -> bool {
    has_safe_prefix(url) || is_relative(url)
}

fn is_relative(url: &str) -> bool {
    let bytes = url.as_bytes();
    match bytes.first() {
        None => false,
        Some(c) if c.is_ascii_whitespace() => false,
        Some(_) => {
            // A scheme is a run of scheme characters terminated by ':'
            // before any path, query or fragment delimiter.
            let scheme_len = bytes
                .iter()
                .take_while(|&&c| c.is_ascii_alphanumeric() || matches!(c, b'+' | b'-' | b'.'))
                .count();
            scheme_len == 0 || bytes.get(scheme_len) != Some(&b':')
        }
    }
}

/// Whether a raw tag such as `<a href="..">` or `</STYLE>` names `tag_name`.
fn is_tag(tag: &str, tag_name: &str) -> bool {
    let bytes = tag.as_bytes();
    if bytes.len() < 3 || bytes[0] != b'<' {
        return false;
    }

    let mut i = 1;
    if bytes[i] == b'/' {
        i += 1;
    }

    let name = tag_name.as_bytes();
    if bytes.len() < i + name.len() || !bytes[i..i + name.len()].eq_ignore_ascii_case(name) {
        return false;
    }

    match bytes.get(i + name.len()) {
        Some(c) => c.is_ascii_whitespace() || *c == b'>' || *c == b'/',
        None => false,
    }
}

/// Default rendering for every [`Node`] kind.
///
/// Holds the per-document state the defaults need; a fresh instance is used
/// for every render.
#[derive(Debug)]
pub struct HtmlRenderer {
    flags: RenderFlags,
    header_count: u32,
}

impl HtmlRenderer {
    pub fn new(flags: RenderFlags) -> Self {
        HtmlRenderer {
            flags,
            header_count: 0,
        }
    }

    pub fn flags(&self) -> RenderFlags {
        self.flags
    }

    fn xhtml(&self) -> bool {
        self.flags.contains(RenderFlags::USE_XHTML)
    }

    /// Block elements are separated from whatever precedes them in their
    /// container by a newline.
    fn cr(ob: &mut Buffer) {
        if !ob.is_empty() {
            ob.putc('\n');
        }
    }

    /// Appends the default rendering of `node` to `ob`. Returns `false` when
    /// an inline node is declined, in which case nothing was written and the
    /// caller keeps the source text literal.
    pub fn render(&mut self, ob: &mut Buffer, node: &Node<'_>) -> bool {
        match *node {
            Node::BlockCode { text, lang } => {
                Self::cr(ob);
                match lang {
                    Some(lang) => {
                        ob.put("<pre><code class=\"language-");
                        escape(ob, lang);
                        ob.put("\">");
                    }
                    None => ob.put("<pre><code>"),
                }
                escape(ob, text);
                ob.put("</code></pre>\n");
            }
            Node::BlockQuote { content } => {
                Self::cr(ob);
                ob.put("<blockquote>\n");
                ob.put(content);
                ob.put("</blockquote>\n");
            }
            Node::BlockHtml { text } => {
                let text = text.trim_matches('\n');
                if !text.is_empty() {
                    Self::cr(ob);
                    ob.put(text);
                    ob.putc('\n');
                }
            }
            Node::Header { content, level } => {
                Self::cr(ob);
                if self.flags.contains(RenderFlags::TOC) {
                    let _ = write!(ob, "<h{} id=\"toc_{}\">", level, self.header_count);
                    self.header_count += 1;
                } else {
                    let _ = write!(ob, "<h{}>", level);
                }
                ob.put(content);
                let _ = writeln!(ob, "</h{}>", level);
            }
            Node::HRule => {
                Self::cr(ob);
                ob.put(if self.xhtml() { "<hr/>\n" } else { "<hr>\n" });
            }
            Node::List { content, ordered } => {
                Self::cr(ob);
                ob.put(if ordered { "<ol>\n" } else { "<ul>\n" });
                ob.put(content);
                ob.put(if ordered { "</ol>\n" } else { "</ul>\n" });
            }
            Node::ListItem { content, .. } => {
                ob.put("<li>");
                ob.put(content.trim_end_matches('\n'));
                ob.put("</li>\n");
            }
            Node::Paragraph { content } => self.paragraph(ob, content),
            Node::Table { header, body } => {
                Self::cr(ob);
                ob.put("<table><thead>\n");
                ob.put(header);
                ob.put("</thead><tbody>\n");
                ob.put(body);
                ob.put("</tbody></table>\n");
            }
            Node::TableRow { content } => {
                ob.put("<tr>\n");
                ob.put(content);
                ob.put("</tr>\n");
            }
            Node::TableCell { content, flags } => Self::table_cell(ob, content, flags),
            Node::Footnotes { content } => {
                Self::cr(ob);
                ob.put("<div class=\"footnotes\">\n");
                ob.put(if self.xhtml() { "<hr/>\n" } else { "<hr>\n" });
                ob.put("<ol>\n");
                ob.put(content);
                ob.put("\n</ol>\n</div>\n");
            }
            Node::FootnoteDef { content, number } => Self::footnote_def(ob, content, number),

            Node::Autolink { link, kind } => return self.autolink(ob, link, kind),
            Node::CodeSpan { text } => {
                ob.put("<code>");
                escape(ob, text);
                ob.put("</code>");
            }
            Node::DoubleEmphasis { content } => return wrap(ob, "strong", content),
            Node::Emphasis { content } => return wrap(ob, "em", content),
            Node::Underline { content } => return wrap(ob, "u", content),
            Node::Highlight { content } => return wrap(ob, "mark", content),
            Node::Quote { content } => return wrap(ob, "q", content),
            Node::Strikethrough { content } => return wrap(ob, "del", content),
            Node::Superscript { content } => return wrap(ob, "sup", content),
            Node::TripleEmphasis { content } => {
                if content.is_empty() {
                    return false;
                }
                ob.put("<strong><em>");
                ob.put(content);
                ob.put("</em></strong>");
            }
            Node::Image { link, title, alt } => {
                if link.is_empty() {
                    return false;
                }
                ob.put("<img src=\"");
                escape_href(ob, link);
                ob.put("\" alt=\"");
                escape(ob, alt);
                if let Some(title) = title.filter(|t| !t.is_empty()) {
                    ob.put("\" title=\"");
                    escape(ob, title);
                }
                ob.put(if self.xhtml() { "\"/>" } else { "\">" });
            }
            Node::LineBreak => self.line_break(ob),
            Node::Link {
                link,
                title,
                content,
            } => {
                if self.flags.contains(RenderFlags::SAFELINK) && !is_safe_link(link) {
                    return false;
                }
                ob.put("<a href=\"");
                escape_href(ob, link);
                if let Some(title) = title.filter(|t| !t.is_empty()) {
                    ob.put("\" title=\"");
                    escape(ob, title);
                }
                ob.put("\">");
                ob.put(content);
                ob.put("</a>");
            }
            Node::RawHtmlTag { tag } => self.raw_html_tag(ob, tag),
            Node::FootnoteRef { number } => {
                let _ = write!(
                    ob,
                    "<sup id=\"fnref{0}\"><a href=\"#fn{0}\" rel=\"footnote\">{0}</a></sup>",
                    number
                );
            }

            Node::Entity { text } => ob.put(text),
            Node::NormalText { text } => {
                if self.flags.contains(RenderFlags::SMARTYPANTS) {
                    let mut escaped = Buffer::with_capacity(text.len());
                    escape(&mut escaped, text);
                    smartypants::filter(ob, &escaped);
                } else {
                    escape(ob, text);
                }
            }

            Node::DocHeader | Node::DocFooter => (),
        }
        true
    }

    fn paragraph(&self, ob: &mut Buffer, content: &str) {
        let content = content.trim_start_matches(|c: char| c.is_ascii_whitespace());
        if content.is_empty() {
            return;
        }
        Self::cr(ob);

        ob.put("<p>");
        if self.flags.contains(RenderFlags::HARD_WRAP) {
            let bytes = content.as_bytes();
            let mut i = 0;
            while i < bytes.len() {
                let org = i;
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
                ob.put(&content[org..i]);

                // A newline ending the paragraph is not a break.
                if i + 1 >= bytes.len() {
                    break;
                }
                self.line_break(ob);
                i += 1;
            }
        } else {
            ob.put(content);
        }
        ob.put("</p>\n");
    }

    fn line_break(&self, ob: &mut Buffer) {
        ob.put(if self.xhtml() { "<br/>\n" } else { "<br>\n" });
    }

    fn table_cell(ob: &mut Buffer, content: &str, flags: CellFlags) {
        let tag = if flags.header { "th" } else { "td" };
        match flags.alignment.css_name() {
            Some(align) => {
                let _ = write!(ob, "<{} style=\"text-align: {}\">", tag, align);
            }
            None => {
                let _ = write!(ob, "<{}>", tag);
            }
        }
        ob.put(content);
        let _ = writeln!(ob, "</{}>", tag);
    }

    fn footnote_def(ob: &mut Buffer, content: &str, number: u32) {
        let _ = write!(ob, "\n<li id=\"fn{}\">\n", number);
        let backlink = format!(
            "&nbsp;<a href=\"#fnref{}\" rev=\"footnote\">&#8617;</a>",
            number
        );
        match find_ascii_ci(content, "</p>") {
            Some(i) => {
                ob.put(&content[..i]);
                ob.put(&backlink);
                ob.put(&content[i..]);
            }
            None => {
                ob.put(content);
                ob.put(&backlink);
            }
        }
        ob.put("</li>\n");
    }

    fn autolink(&self, ob: &mut Buffer, link: &str, kind: AutolinkType) -> bool {
        if link.is_empty() {
            return false;
        }
        if self.flags.contains(RenderFlags::SAFELINK)
            && kind != AutolinkType::Email
            && !has_safe_prefix(link)
        {
            return false;
        }

        ob.put("<a href=\"");
        if kind == AutolinkType::Email {
            ob.put("mailto:");
        }
        escape_href(ob, link);
        ob.put("\">");

        // Don't repeat an explicit `mailto:` in the visible text.
        let shown = match link.get(..7) {
            Some(prefix) if prefix.eq_ignore_ascii_case("mailto:") => &link[7..],
            _ => link,
        };
        escape(ob, shown);
        ob.put("</a>");
        true
    }

    fn raw_html_tag(&self, ob: &mut Buffer, tag: &str) {
        let flags = self.flags;
        if flags.contains(RenderFlags::ESCAPE) {
            escape(ob, tag);
            return;
        }
        if flags.contains(RenderFlags::SKIP_HTML)
            || (flags.contains(RenderFlags::SKIP_STYLE) && is_tag(tag, "style"))
            || (flags.contains(RenderFlags::SKIP_LINKS) && is_tag(tag, "a"))
            || (flags.contains(RenderFlags::SKIP_IMAGES) && is_tag(tag, "img"))
        {
            return;
        }
        ob.put(tag);
    }
}

fn wrap(ob: &mut Buffer, element: &str, content: &str) -> bool {
    if content.is_empty() {
        return false;
    }
    let _ = write!(ob, "<{0}>{1}</{0}>", element, content);
    true
}

fn find_ascii_ci(haystack: &str, needle: &str) -> Option<usize> {
    let n = needle.as_bytes();
    haystack
        .as_bytes()
        .windows(n.len())
        .position(|w| w.eq_ignore_ascii_case(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escaped(f: fn(&mut Buffer, &str), s: &str) -> String {
        let mut b = Buffer::default();
        f(&mut b, s);
        b.into_string()
    }

    #[test]
    fn escapes_all_five() {
        assert_eq!(
            escaped(escape, "<\"Tom\" & 'Jerry'>"),
            "&lt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&gt;"
        );
        assert_eq!(escaped(escape, "plain ünïcode"), "plain ünïcode");
    }

    #[test]
    fn href_escaping() {
        assert_eq!(
            escaped(escape_href, "http://a.b/c d?e=1&f='g'"),
            "http://a.b/c%20d?e=1&amp;f=&#x27;g&#x27;"
        );
        assert_eq!(escaped(escape_href, "/wiki/Ü"), "/wiki/%C3%9C");
        assert_eq!(escaped(escape_href, "a\"b<c>"), "a%22b%3Cc%3E");
    }

    #[test]
    fn blank_paragraph_writes_nothing() {
        let mut r = HtmlRenderer::new(RenderFlags::empty());
        let mut ob = Buffer::default();
        ob.put("<hr>\n");
        assert!(r.render(&mut ob, &Node::Paragraph { content: " \n\t" }));
        assert_eq!(ob.as_str(), "<hr>\n");

        assert!(r.render(&mut ob, &Node::Paragraph { content: "x" }));
        assert_eq!(ob.as_str(), "<hr>\n\n<p>x</p>\n");
    }

    #[test]
    fn dropped_tags() {
        let mut ob = Buffer::default();
        let r = HtmlRenderer::new(RenderFlags::SKIP_LINKS);
        r.raw_html_tag(&mut ob, "<a href=\"x\">");
        r.raw_html_tag(&mut ob, "<em>");
        let r = HtmlRenderer::new(RenderFlags::ESCAPE | RenderFlags::SKIP_HTML);
        r.raw_html_tag(&mut ob, "<b>");
        assert_eq!(ob.as_str(), "<em>&lt;b&gt;");
    }

    #[test]
    fn safe_links() {
        assert!(is_safe_link("http://x"));
        assert!(is_safe_link("MAILTO:me@example.org"));
        assert!(is_safe_link("#anchor"));
        assert!(is_safe_link("../up/one"));
        assert!(is_safe_link("a/b:c"));
        assert!(!is_safe_link("javascript:alert(1)"));
        assert!(!is_safe_link("data:text/html,x"));
        assert!(!is_safe_link("http://"));
        assert!(!is_safe_link(""));
        assert!(!has_safe_prefix("spacer.gif"));
    }

    #[test]
    fn tag_names() {
        assert!(is_tag("<style type=\"text/css\">", "style"));
        assert!(is_tag("</STYLE>", "style"));
        assert!(is_tag("<a href=\"x\">", "a"));
        assert!(is_tag("<img/>", "img"));
        assert!(!is_tag("<abbr>", "a"));
        assert!(!is_tag("<styles>", "style"));
    }

    #[test]
    fn declines_empty_spans() {
        let mut r = HtmlRenderer::new(RenderFlags::empty());
        let mut ob = Buffer::default();
        assert!(!r.render(&mut ob, &Node::Emphasis { content: "" }));
        assert!(!r.render(
            &mut ob,
            &Node::Image {
                link: "",
                title: None,
                alt: "x"
            }
        ));
        assert!(ob.is_empty());
    }

    #[test]
    fn footnote_backlink_without_paragraph() {
        let mut ob = Buffer::default();
        HtmlRenderer::footnote_def(&mut ob, "<pre><code>x\n</code></pre>\n", 2);
        assert_eq!(
            ob.as_str(),
            "\n<li id=\"fn2\">\n<pre><code>x\n</code></pre>\n\
             &nbsp;<a href=\"#fnref2\" rev=\"footnote\">&#8617;</a></li>\n"
        );
    }
}
