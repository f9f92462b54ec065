mod autolink;
mod inlines;
pub mod options;
pub(crate) mod references;
mod table;

use tracing::debug;

use crate::buffer::{Buffer, BLOCK_UNIT, SPAN_UNIT};
use crate::ctype::isalnum;
use crate::nodes::Node;
use crate::renderer::Dispatch;
use crate::scanners;
use crate::strings::{is_blank, line_len};

use self::inlines::Trigger;
use self::options::{Extensions, Options};
use self::references::{FootnoteTable, ReferenceTable};

/// Per-document parsing state. A parser renders a single document.
pub(crate) struct Parser<'p, 'c> {
    options: &'p Options,
    dispatch: Dispatch<'p, 'c>,
    refs: ReferenceTable,
    footnotes: FootnoteTable,
    /// Current combined block and span nesting.
    depth: usize,
    /// Set while the text of a link is parsed, so that bare autolinks don't
    /// nest inside it.
    in_link_body: bool,
    special_chars: [Option<Trigger>; 256],
}

/// List state shared by the items of one list.
struct ListState {
    ordered: bool,
    /// Items render their content as blocks once one of them holds a blank
    /// line.
    block: bool,
    /// Set by an item that found the end of the list.
    end: bool,
}

impl<'p, 'c> Parser<'p, 'c> {
    pub(crate) fn new(options: &'p Options, dispatch: Dispatch<'p, 'c>) -> Self {
        Parser {
            options,
            dispatch,
            refs: ReferenceTable::default(),
            footnotes: FootnoteTable::default(),
            depth: 0,
            in_link_body: false,
            special_chars: inlines::special_chars(options.extension),
        }
    }

    pub(crate) fn into_dispatch(self) -> Dispatch<'p, 'c> {
        self.dispatch
    }

    /// Renders `md` as a whole document.
    pub(crate) fn render(&mut self, md: &str) -> String {
        debug!(
            extensions = self.options.extension.bits(),
            render = self.options.render.bits(),
            max_nesting = self.options.max_nesting,
            "render start"
        );

        let text = references::prescan(md, self.options, &mut self.refs, &mut self.footnotes);
        let mut ob = Buffer::with_capacity(text.len() + text.len() / 2);

        self.dispatch.render(&mut ob, Node::DocHeader);
        if !text.is_empty() {
            self.parse_block(&mut ob, &text);
        }
        if self.options.extension.contains(Extensions::FOOTNOTES) {
            self.render_footnotes(&mut ob);
        }
        self.dispatch.render(&mut ob, Node::DocFooter);

        ob.into_string()
    }

    fn descend(&mut self) -> bool {
        self.depth += 1;
        if self.depth > self.options.max_nesting {
            debug!(depth = self.depth, "nesting ceiling reached");
            false
        } else {
            true
        }
    }

    /// Parses `data` as a sequence of blocks. Past the nesting ceiling it is
    /// emitted as plain text instead.
    pub(crate) fn parse_block(&mut self, ob: &mut Buffer, data: &str) {
        if self.descend() {
            self.scan_blocks(ob, data);
        } else {
            self.normal_text(ob, data);
        }
        self.depth -= 1;
    }

    /// Parses `data` as span content, with the same ceiling as
    /// [`Parser::parse_block`].
    pub(crate) fn parse_inline(&mut self, ob: &mut Buffer, data: &str) {
        if self.descend() {
            self.scan_inline(ob, data);
        } else {
            self.normal_text(ob, data);
        }
        self.depth -= 1;
    }

    pub(crate) fn normal_text(&mut self, ob: &mut Buffer, text: &str) {
        self.dispatch.render(ob, Node::NormalText { text });
    }

    fn scan_blocks(&mut self, ob: &mut Buffer, data: &str) {
        let mut beg = 0;
        while beg < data.len() {
            beg += self.parse_one_block(ob, &data[beg..]);
        }
    }

    /// Parses the block at the start of `data` and returns its length.
    fn parse_one_block(&mut self, ob: &mut Buffer, data: &str) -> usize {
        let b = data.as_bytes();
        let ext = self.options.extension;

        if let Some(len) = scanners::blank_line(b) {
            return len;
        }

        if ext.contains(Extensions::FENCED_CODE) {
            if let Some(len) = self.parse_fenced_code(ob, data) {
                return len;
            }
        }

        if !ext.contains(Extensions::DISABLE_INDENTED_CODE) && scanners::prefix_code(b).is_some() {
            return self.parse_indented_code(ob, data);
        }

        if b[0] == b'<' && self.dispatch.block_html_enabled() {
            if let Some(len) = scanners::html_block(b) {
                self.dispatch
                    .render(ob, Node::BlockHtml { text: &data[..len] });
                return len;
            }
        }

        if scanners::is_hrule(b) {
            self.dispatch.render(ob, Node::HRule);
            return line_len(b);
        }

        if scanners::is_atxheader(b, ext.contains(Extensions::SPACE_HEADERS)) {
            return self.parse_atx_header(ob, data);
        }

        if scanners::prefix_quote(b).is_some() {
            return self.parse_blockquote(ob, data);
        }

        if scanners::prefix_uli(b).is_some() {
            return self.parse_list(ob, data, false);
        }

        if scanners::prefix_oli(b).is_some() {
            return self.parse_list(ob, data, true);
        }

        if ext.contains(Extensions::TABLES) {
            if let Some(len) = self.parse_table(ob, data) {
                return len;
            }
        }

        self.parse_paragraph(ob, data)
    }

    fn parse_fenced_code(&mut self, ob: &mut Buffer, data: &str) -> Option<usize> {
        let b = data.as_bytes();
        let first = line_len(b);
        let fence = scanners::is_codefence(&b[..first])?;
        let lang = scanners::fence_lang(&data[..first], &fence);

        let mut beg = first;
        let mut text_end = b.len();
        let mut end = b.len();
        while beg < b.len() {
            let line_end = beg + line_len(&b[beg..]);
            if fence.closed_by(&b[beg..line_end]) {
                text_end = beg;
                end = line_end;
                break;
            }
            beg = line_end;
        }

        self.dispatch.render(
            ob,
            Node::BlockCode {
                text: &data[first..text_end],
                lang,
            },
        );
        Some(end)
    }

    fn parse_indented_code(&mut self, ob: &mut Buffer, data: &str) -> usize {
        let b = data.as_bytes();
        let mut work = Buffer::with_capacity(BLOCK_UNIT);
        let mut beg = 0;

        while beg < b.len() {
            let end = beg + line_len(&b[beg..]);
            let line = &b[beg..end];
            let start = match scanners::prefix_code(line) {
                Some(pre) => beg + pre,
                None if is_blank(line) => beg,
                None => break,
            };

            if is_blank(&b[start..end]) {
                work.putc('\n');
            } else {
                work.put(&data[start..end]);
            }
            beg = end;
        }

        let keep = work.trim_end_matches('\n').len();
        work.truncate(keep);
        work.putc('\n');

        self.dispatch.render(
            ob,
            Node::BlockCode {
                text: &work,
                lang: None,
            },
        );
        beg
    }

    fn parse_atx_header(&mut self, ob: &mut Buffer, data: &str) -> usize {
        let b = data.as_bytes();
        let skip = line_len(b);
        let line_end = if b[skip - 1] == b'\n' { skip - 1 } else { skip };
        let level = b.iter().take(6).take_while(|&&c| c == b'#').count();

        let mut i = level;
        while i < line_end && b[i] == b' ' {
            i += 1;
        }

        let mut end = line_end;
        while end > i && b[end - 1] == b' ' {
            end -= 1;
        }
        // A closing run of `#` goes only when it stands apart from the text.
        let mut closing = end;
        while closing > i && b[closing - 1] == b'#' {
            closing -= 1;
        }
        if closing == i || b[closing - 1] == b' ' {
            end = closing;
        }
        while end > i && b[end - 1] == b' ' {
            end -= 1;
        }

        let mut work = Buffer::with_capacity(SPAN_UNIT);
        if end > i {
            self.parse_inline(&mut work, &data[i..end]);
        }
        self.dispatch.render(
            ob,
            Node::Header {
                content: &work,
                level: level as u8,
            },
        );
        skip
    }

    fn parse_blockquote(&mut self, ob: &mut Buffer, data: &str) -> usize {
        let b = data.as_bytes();
        let mut work = String::with_capacity(data.len());
        let mut beg = 0;
        let mut end = 0;

        while beg < b.len() {
            end = beg + line_len(&b[beg..]);
            let line = &b[beg..end];

            let start = match scanners::prefix_quote(line) {
                Some(pre) => beg + pre,
                None => {
                    // A blank line ends the quote unless more of it follows.
                    if is_blank(line)
                        && (end >= b.len()
                            || (scanners::prefix_quote(&b[end..]).is_none()
                                && !is_blank(&b[end..end + line_len(&b[end..])])))
                    {
                        break;
                    }
                    beg
                }
            };

            work.push_str(&data[start..end]);
            beg = end;
        }

        let mut out = Buffer::with_capacity(BLOCK_UNIT);
        self.parse_block(&mut out, &work);
        self.dispatch
            .render(ob, Node::BlockQuote { content: &out });
        end
    }

    fn parse_list(&mut self, ob: &mut Buffer, data: &str, ordered: bool) -> usize {
        let mut work = Buffer::with_capacity(BLOCK_UNIT);
        let mut state = ListState {
            ordered,
            block: false,
            end: false,
        };

        let mut i = 0;
        while i < data.len() {
            let consumed = self.parse_list_item(&mut work, &data[i..], &mut state);
            i += consumed;
            if consumed == 0 || state.end {
                break;
            }
        }

        self.dispatch.render(
            ob,
            Node::List {
                content: &work,
                ordered,
            },
        );
        i
    }

    /// Parses one item and returns its length, or 0 if `data` doesn't
    /// start with one.
    fn parse_list_item(&mut self, ob: &mut Buffer, data: &str, state: &mut ListState) -> usize {
        let b = data.as_bytes();
        let size = b.len();
        let fenced = self.options.extension.contains(Extensions::FENCED_CODE);

        let orgpre = b.iter().take(3).take_while(|&&c| c == b' ').count();
        let marker = match scanners::prefix_uli(b).or_else(|| scanners::prefix_oli(b)) {
            Some(marker) => marker,
            None => return 0,
        };

        let first_end = line_len(b);
        let mut work = String::with_capacity(SPAN_UNIT);
        work.push_str(&data[marker..first_end]);

        let mut beg = first_end;
        let mut sublist = 0;
        let mut in_empty = false;
        let mut has_inside_empty = false;
        let mut in_fence = false;

        while beg < size {
            let end = beg + line_len(&b[beg..]);
            let line = &b[beg..end];

            if is_blank(line) {
                in_empty = true;
                beg = end;
                continue;
            }

            let pre = line.iter().take(4).take_while(|&&c| c == b' ').count();
            let rest = &line[pre..];

            if fenced && scanners::is_codefence(rest).is_some() {
                in_fence = !in_fence;
            }

            let (next_uli, next_oli) = if in_fence {
                (false, false)
            } else {
                (
                    scanners::prefix_uli(rest).is_some(),
                    scanners::prefix_oli(rest).is_some(),
                )
            };

            if (next_uli && !scanners::is_hrule(rest)) || next_oli {
                if in_empty {
                    has_inside_empty = true;
                }

                // a sibling item, or the start of another list
                if pre <= orgpre {
                    if in_empty
                        && ((state.ordered && next_uli) || (!state.ordered && next_oli))
                    {
                        state.end = true;
                        has_inside_empty = false;
                    }
                    break;
                }

                if sublist == 0 {
                    sublist = work.len();
                }
            } else if in_empty && pre == 0 {
                state.end = true;
                break;
            }

            if in_empty {
                work.push('\n');
                has_inside_empty = true;
                in_empty = false;
            }

            work.push_str(&data[beg + pre..end]);
            beg = end;
        }

        if has_inside_empty {
            state.block = true;
        }

        let mut inter = Buffer::with_capacity(SPAN_UNIT);
        let split = sublist > 0 && sublist < work.len();
        match (state.block, split) {
            (true, true) => {
                self.parse_block(&mut inter, &work[..sublist]);
                self.parse_block(&mut inter, &work[sublist..]);
            }
            (true, false) => self.parse_block(&mut inter, &work),
            (false, true) => {
                self.parse_inline(&mut inter, &work[..sublist]);
                self.parse_block(&mut inter, &work[sublist..]);
            }
            (false, false) => self.parse_inline(&mut inter, &work),
        }

        self.dispatch.render(
            ob,
            Node::ListItem {
                content: &inter,
                ordered: state.ordered,
            },
        );
        beg
    }

    /// A paragraph, or a paragraph whose last line is underlined into a
    /// setext header.
    fn parse_paragraph(&mut self, ob: &mut Buffer, data: &str) -> usize {
        let b = data.as_bytes();
        let ext = self.options.extension;
        let mut i = 0;
        let mut end = 0;
        let mut level = None;

        while i < b.len() {
            end = i + line_len(&b[i..]);
            let line = &b[i..];

            if i > 0 {
                if is_blank(&b[i..end]) {
                    break;
                }

                if let Some(l) = scanners::setext_level(line) {
                    level = Some(l);
                    break;
                }

                if scanners::is_atxheader(line, ext.contains(Extensions::SPACE_HEADERS))
                    || scanners::is_hrule(line)
                    || scanners::prefix_quote(line).is_some()
                {
                    end = i;
                    break;
                }

                if ext.contains(Extensions::FENCED_CODE)
                    && scanners::is_codefence(&b[i..end]).is_some()
                {
                    end = i;
                    break;
                }

                if ext.contains(Extensions::LAX_SPACING) && !isalnum(line[0]) {
                    if scanners::prefix_oli(line).is_some() || scanners::prefix_uli(line).is_some()
                    {
                        end = i;
                        break;
                    }

                    if line[0] == b'<'
                        && self.dispatch.block_html_enabled()
                        && scanners::html_block(line).is_some()
                    {
                        end = i;
                        break;
                    }
                }
            }

            i = end;
        }

        let text = data[..i].trim_end_matches('\n');

        match level {
            None => {
                let mut tmp = Buffer::with_capacity(BLOCK_UNIT);
                self.parse_inline(&mut tmp, text);
                self.dispatch
                    .render(ob, Node::Paragraph { content: &tmp });
            }
            Some(level) => {
                let (para, header) = match text.rfind('\n') {
                    Some(nl) => (text[..nl].trim_end_matches('\n'), &text[nl + 1..]),
                    None => ("", text),
                };

                if !para.is_empty() {
                    let mut tmp = Buffer::with_capacity(BLOCK_UNIT);
                    self.parse_inline(&mut tmp, para);
                    self.dispatch
                        .render(ob, Node::Paragraph { content: &tmp });
                }

                let mut work = Buffer::with_capacity(SPAN_UNIT);
                self.parse_inline(&mut work, header);
                self.dispatch.render(
                    ob,
                    Node::Header {
                        content: &work,
                        level,
                    },
                );
            }
        }

        end
    }

    /// Renders the definitions of every referenced footnote, in order of
    /// first reference. Bodies may reference further footnotes.
    fn render_footnotes(&mut self, ob: &mut Buffer) {
        let mut work = Buffer::with_capacity(BLOCK_UNIT);
        let mut rendered = 0;

        loop {
            let batch = self.footnotes.take_used();
            if batch.is_empty() {
                break;
            }
            for (number, body) in batch {
                let mut content = Buffer::with_capacity(SPAN_UNIT);
                self.parse_block(&mut content, &body);
                self.dispatch.render(
                    &mut work,
                    Node::FootnoteDef {
                        content: &content,
                        number,
                    },
                );
                rendered += 1;
            }
        }

        if rendered > 0 {
            debug!(footnotes = rendered, "footnotes rendered");
            self.dispatch
                .render(ob, Node::Footnotes { content: &work });
        }
    }
}
