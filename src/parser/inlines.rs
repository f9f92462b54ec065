//! The inline scanner.
//!
//! Span content is walked left to right looking for active characters. Text
//! between constructs is handed to the renderer lazily as `normal_text`, so a
//! construct that turns out not to match leaves its source in the pending
//! run, and literal text coming out of one run is coalesced.

use std::borrow::Cow;

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::buffer::{Buffer, SPAN_UNIT};
use crate::character_set::character_set;
use crate::ctype::{isalnum, isspace};
use crate::entity;
use crate::nodes::{AutolinkType, Node};
use crate::parser::autolink::{self, AutolinkKind};
use crate::parser::options::Extensions;
use crate::parser::references::Reference;
use crate::parser::Parser;
use crate::strings::unescape;

/// What an active character may start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Trigger {
    Emphasis,
    CodeSpan,
    LineBreak,
    Link,
    Image,
    AngleBracket,
    Escape,
    Entity,
    AutolinkUrl,
    AutolinkEmail,
    AutolinkWww,
    Superscript,
    Quote,
}

/// The active characters for a set of extensions.
pub(crate) fn special_chars(ext: Extensions) -> [Option<Trigger>; 256] {
    let mut table = [None; 256];
    let mut set = |c: u8, t: Trigger| table[c as usize] = Some(t);

    set(b'*', Trigger::Emphasis);
    set(b'_', Trigger::Emphasis);
    set(b'`', Trigger::CodeSpan);
    set(b'\n', Trigger::LineBreak);
    set(b'[', Trigger::Link);
    set(b'!', Trigger::Image);
    set(b'<', Trigger::AngleBracket);
    set(b'\\', Trigger::Escape);
    set(b'&', Trigger::Entity);

    if ext.contains(Extensions::STRIKETHROUGH) {
        set(b'~', Trigger::Emphasis);
    }
    if ext.contains(Extensions::HIGHLIGHT) {
        set(b'=', Trigger::Emphasis);
    }
    if ext.contains(Extensions::QUOTE) {
        set(b'"', Trigger::Quote);
    }
    if ext.contains(Extensions::SUPERSCRIPT) {
        set(b'^', Trigger::Superscript);
    }
    if ext.contains(Extensions::AUTOLINK) {
        set(b':', Trigger::AutolinkUrl);
        set(b'@', Trigger::AutolinkEmail);
        set(b'w', Trigger::AutolinkWww);
    }

    table
}

const ESCAPE_CHARS: [bool; 256] = character_set!(b"\\`*_{}[]()#+-.!:|&<>^~=\"$");

/// Closer searches whose failure is remembered, indexed into
/// `Subject::floors`. Emphasis takes one slot per marker and run length.
const CARET_FLOOR: usize = 12;
const QUOTE_FLOOR: usize = 13;
const FLOORS: usize = 14;

fn emph_floor(c: u8, run: usize) -> usize {
    let marker = match c {
        b'*' => 0,
        b'_' => 1,
        b'~' => 2,
        _ => 3,
    };
    marker * 3 + run - 1
}

/// The first match at or after some position, remembered so that later
/// searches starting inside the already searched range are answered
/// without rescanning. Searches move forward through a run, so each byte is
/// looked at about once.
#[derive(Default)]
struct Lookahead {
    from: usize,
    found: Option<Option<usize>>,
}

impl Lookahead {
    fn next(&mut self, from: usize, search: impl FnOnce(usize) -> Option<usize>) -> Option<usize> {
        if let Some(found) = self.found {
            if from >= self.from && found.map_or(true, |f| from <= f) {
                return found;
            }
        }
        let found = search(from);
        self.from = from;
        self.found = Some(found);
        found
    }
}

/// One run of span content being scanned.
pub(crate) struct Subject<'i> {
    input: &'i str,
    /// Start of the text not yet handed to the renderer.
    mark: usize,
    /// Whether the pending text was emitted for the construct being tried.
    flushed: bool,
    /// Per closer kind, the content start from which a search for the
    /// closer is known to fail.
    floors: [usize; FLOORS],
    /// Unescaped `[` and `(` mapped to their matching `]` and `)`.
    pairs: Option<FxHashMap<usize, usize>>,
    /// A quote preceded by whitespace, which ends a link destination.
    title_start: Lookahead,
    /// Unescaped `'` and `"`.
    quotes: [Lookahead; 2],
    /// Unescaped `)`.
    close_paren: Lookahead,
    /// `>`, which every tag and angle autolink ends with.
    close_angle: Lookahead,
    /// `-->`.
    close_comment: Lookahead,
}

impl<'i> Subject<'i> {
    fn new(input: &'i str) -> Self {
        Subject {
            input,
            mark: 0,
            flushed: false,
            floors: [usize::MAX; FLOORS],
            pairs: None,
            title_start: Lookahead::default(),
            quotes: Default::default(),
            close_paren: Lookahead::default(),
            close_angle: Lookahead::default(),
            close_comment: Lookahead::default(),
        }
    }

    /// Whether a closer search of kind `floor` starting at `from` is known
    /// to fail.
    fn exhausted(&self, floor: usize, from: usize) -> bool {
        from >= self.floors[floor]
    }

    /// Records that a closer search of kind `floor` failed, having seen every
    /// candidate from `seen` onwards.
    fn exhaust(&mut self, floor: usize, seen: usize) {
        self.floors[floor] = self.floors[floor].min(seen);
    }

    /// The `]` or `)` matching the unescaped `[` or `(` at `open`.
    fn matching(&mut self, open: usize) -> Option<usize> {
        let input = self.input;
        self.pairs
            .get_or_insert_with(|| match_pairs(input.as_bytes()))
            .get(&open)
            .copied()
    }

    /// The first unescaped byte at or after `from` accepted by `pred`.
    fn find_unescaped(&self, from: usize, pred: impl Fn(&[u8], usize) -> bool) -> Option<usize> {
        let b = self.input.as_bytes();
        (from..b.len()).find(|&j| pred(b, j) && !is_escaped(b, j))
    }

    fn next_title_start(&mut self, from: usize) -> Option<usize> {
        let mut la = std::mem::take(&mut self.title_start);
        let found = la.next(from, |from| {
            self.find_unescaped(from, |b, j| {
                matches!(b[j], b'\'' | b'"') && j > 0 && isspace(b[j - 1])
            })
        });
        self.title_start = la;
        found
    }

    fn next_quote(&mut self, from: usize, q: u8) -> Option<usize> {
        let k = usize::from(q == b'"');
        let mut la = std::mem::take(&mut self.quotes[k]);
        let found = la.next(from, |from| self.find_unescaped(from, |b, j| b[j] == q));
        self.quotes[k] = la;
        found
    }

    fn next_close_paren(&mut self, from: usize) -> Option<usize> {
        let mut la = std::mem::take(&mut self.close_paren);
        let found = la.next(from, |from| self.find_unescaped(from, |b, j| b[j] == b')'));
        self.close_paren = la;
        found
    }

    fn next_close_angle(&mut self, from: usize) -> Option<usize> {
        let input = self.input;
        self.close_angle
            .next(from, |from| input.get(from..)?.find('>').map(|j| from + j))
    }

    fn next_close_comment(&mut self, from: usize) -> Option<usize> {
        let input = self.input;
        self.close_comment
            .next(from, |from| input.get(from..)?.find("-->").map(|j| from + j))
    }

    /// The length of an HTML tag or `<...>` autolink at `pos`, and which
    /// kind of autolink it is, if any.
    fn tag_length(&mut self, pos: usize) -> Option<(usize, Option<AutolinkType>)> {
        let data = &self.input.as_bytes()[pos..];
        let size = data.len();
        if size < 3 || data[0] != b'<' {
            return None;
        }
        let close = self.next_close_angle(pos + 1)? - pos;

        if size > 5 && data[1] == b'!' && data[2] == b'-' && data[3] == b'-' {
            if let Some(end) = self.next_close_comment(pos + 3) {
                return Some((end + 3 - pos, None));
            }
        }

        let mut i = if data[1] == b'/' { 2 } else { 1 };
        if !isalnum(data[i]) {
            return None;
        }

        while i < size && (isalnum(data[i]) || matches!(data[i], b'.' | b'+' | b'-')) {
            i += 1;
        }

        if i > 1 && i < size && data[i] == b'@' {
            if let Some(j) = is_mail_autolink(&data[i..]) {
                return Some((i + j, Some(AutolinkType::Email)));
            }
        }

        if i > 2 && i < size && data[i] == b':' {
            i += 1;
            let j = i;
            while i < size {
                if data[i] == b'\\' {
                    i += 2;
                } else if matches!(data[i], b'>' | b'\'' | b'"' | b' ' | b'\n') {
                    break;
                } else {
                    i += 1;
                }
            }
            if i >= size {
                return None;
            }
            if i > j && data[i] == b'>' {
                return Some((i + 1, Some(AutolinkType::Uri)));
            }
        }

        // An escape in an autolink-looking scheme can step over `close`.
        let end = if i > close {
            self.next_close_angle(pos + i)? - pos
        } else {
            close
        };
        Some((end + 1, None))
    }
}

impl<'p, 'c> Parser<'p, 'c> {
    /// Scans `input` as span content, rendering into `ob`.
    pub(crate) fn scan_inline(&mut self, ob: &mut Buffer, input: &str) {
        let mut subj = Subject::new(input);
        let mut pos = 0;

        while let Some((at, trigger)) = self.find_special_char(&subj, pos) {
            match self.handle(ob, &mut subj, trigger, at) {
                Some(consumed) => {
                    subj.mark = at + consumed;
                    pos = subj.mark;
                }
                None => pos = at + 1,
            }
            subj.flushed = false;
        }

        if subj.mark < input.len() {
            self.normal_text(ob, &input[subj.mark..]);
        }
    }

    /// The next active character at or after `from` whose construct could
    /// plausibly start there.
    fn find_special_char(&self, subj: &Subject<'_>, from: usize) -> Option<(usize, Trigger)> {
        let bytes = subj.input.as_bytes();
        (from..bytes.len()).find_map(|i| {
            let trigger = self.special_chars[bytes[i] as usize]?;
            if self.plausible(trigger, bytes, i) {
                Some((i, trigger))
            } else {
                None
            }
        })
    }

    fn plausible(&self, trigger: Trigger, bytes: &[u8], i: usize) -> bool {
        match trigger {
            Trigger::LineBreak => i >= 2 && bytes[i - 1] == b' ' && bytes[i - 2] == b' ',
            Trigger::Image => bytes.get(i + 1) == Some(&b'['),
            Trigger::AutolinkUrl => !self.in_link_body && bytes[i + 1..].starts_with(b"//"),
            Trigger::AutolinkEmail => !self.in_link_body,
            Trigger::AutolinkWww => !self.in_link_body && bytes[i..].starts_with(b"www."),
            _ => true,
        }
    }

    fn handle(
        &mut self,
        ob: &mut Buffer,
        subj: &mut Subject<'_>,
        trigger: Trigger,
        pos: usize,
    ) -> Option<usize> {
        match trigger {
            Trigger::Emphasis => self.handle_emphasis(ob, subj, pos),
            Trigger::CodeSpan => self.handle_backticks(ob, subj, pos),
            Trigger::LineBreak => self.handle_newline(ob, subj, pos),
            Trigger::Link => self.handle_open_bracket(ob, subj, pos),
            Trigger::Image => self.handle_bang(ob, subj, pos),
            Trigger::AngleBracket => self.handle_pointy_brace(ob, subj, pos),
            Trigger::Escape => self.handle_backslash(ob, subj, pos),
            Trigger::Entity => self.handle_entity(ob, subj, pos),
            Trigger::AutolinkUrl | Trigger::AutolinkEmail | Trigger::AutolinkWww => {
                self.handle_autolink(ob, subj, trigger, pos)
            }
            Trigger::Superscript => self.handle_caret(ob, subj, pos),
            Trigger::Quote => self.handle_quote(ob, subj, pos),
        }
    }

    /// Emits the pending text up to `upto`, once per construct attempt.
    fn flush(&mut self, ob: &mut Buffer, subj: &mut Subject<'_>, upto: usize) {
        if !subj.flushed {
            let input = subj.input;
            self.normal_text(ob, &input[subj.mark..upto]);
            subj.mark = upto;
            subj.flushed = true;
        }
    }

    fn no_intra_emphasis(&self) -> bool {
        self.options
            .extension
            .contains(Extensions::NO_INTRA_EMPHASIS)
    }

    fn handle_emphasis(
        &mut self,
        ob: &mut Buffer,
        subj: &mut Subject<'_>,
        pos: usize,
    ) -> Option<usize> {
        let input = subj.input;
        let b = &input.as_bytes()[pos..];
        let size = b.len();
        let c = b[0];

        if self.no_intra_emphasis() && pos > 0 && isalnum(input.as_bytes()[pos - 1]) {
            return None;
        }

        if size > 2 && b[1] != c {
            if c == b'~' || c == b'=' || isspace(b[1]) {
                return None;
            }
            return self.emph1(ob, subj, pos, pos + 1, c).map(|n| n + 1);
        }

        if size > 3 && b[1] == c && b[2] != c {
            if isspace(b[2]) {
                return None;
            }
            return self.emph2(ob, subj, pos, pos + 2, c).map(|n| n + 2);
        }

        if size > 4 && b[1] == c && b[2] == c && b[3] != c {
            if c == b'~' || c == b'=' || isspace(b[3]) {
                return None;
            }
            return self.emph3(ob, subj, pos, pos + 3, c).map(|n| n + 3);
        }

        None
    }

    /// Single emphasis whose content starts at `start`. Returns the length
    /// from `start` through the closer.
    fn emph1(
        &mut self,
        ob: &mut Buffer,
        subj: &mut Subject<'_>,
        open: usize,
        start: usize,
        c: u8,
    ) -> Option<usize> {
        let floor = emph_floor(c, 1);
        if subj.exhausted(floor, start) {
            return None;
        }

        let input = subj.input;
        let data = &input[start..];
        let b = data.as_bytes();
        let size = b.len();
        let mut i = 0;
        let mut seen = start;

        // skip one symbol if coming from emph3
        if size > 1 && b[0] == c && b[1] == c {
            i = 1;
        }

        while i < size {
            let (len, skipped) = scan_emph_char(&b[i..], c);
            if skipped > 0 {
                seen = seen.max(start + i + skipped);
            }
            if len == 0 {
                break;
            }
            i += len;
            if i >= size {
                break;
            }

            if b[i] == c && !isspace(b[i - 1]) {
                if self.no_intra_emphasis() && i + 1 < size && isalnum(b[i + 1]) {
                    continue;
                }

                self.flush(ob, subj, open);
                let mut work = Buffer::with_capacity(SPAN_UNIT);
                self.parse_inline(&mut work, &data[..i]);

                let node = if c == b'_' && self.options.extension.contains(Extensions::UNDERLINE) {
                    Node::Underline { content: &work }
                } else {
                    Node::Emphasis { content: &work }
                };
                return self.dispatch.render(ob, node).then_some(i + 1);
            }
        }

        subj.exhaust(floor, seen);
        None
    }

    fn emph2(
        &mut self,
        ob: &mut Buffer,
        subj: &mut Subject<'_>,
        open: usize,
        start: usize,
        c: u8,
    ) -> Option<usize> {
        let floor = emph_floor(c, 2);
        if subj.exhausted(floor, start) {
            return None;
        }

        let input = subj.input;
        let data = &input[start..];
        let b = data.as_bytes();
        let size = b.len();
        let mut i = 0;
        let mut seen = start;

        while i < size {
            let (len, skipped) = scan_emph_char(&b[i..], c);
            if skipped > 0 {
                seen = seen.max(start + i + skipped);
            }
            if len == 0 {
                break;
            }
            i += len;

            if i + 1 < size && b[i] == c && b[i + 1] == c && i > 0 && !isspace(b[i - 1]) {
                self.flush(ob, subj, open);
                let mut work = Buffer::with_capacity(SPAN_UNIT);
                self.parse_inline(&mut work, &data[..i]);

                let node = match c {
                    b'~' => Node::Strikethrough { content: &work },
                    b'=' => Node::Highlight { content: &work },
                    _ => Node::DoubleEmphasis { content: &work },
                };
                return self.dispatch.render(ob, node).then_some(i + 2);
            }
            i += 1;
        }

        subj.exhaust(floor, seen);
        None
    }

    /// Triple emphasis, or the single or double emphasis that a triple run
    /// opens when it is closed by a shorter one.
    fn emph3(
        &mut self,
        ob: &mut Buffer,
        subj: &mut Subject<'_>,
        open: usize,
        start: usize,
        c: u8,
    ) -> Option<usize> {
        let floor = emph_floor(c, 3);
        if subj.exhausted(floor, start) {
            return None;
        }

        let input = subj.input;
        let data = &input[start..];
        let b = data.as_bytes();
        let size = b.len();
        let mut i = 0;
        let mut seen = start;

        while i < size {
            let (len, skipped) = scan_emph_char(&b[i..], c);
            if skipped > 0 {
                seen = seen.max(start + i + skipped);
            }
            if len == 0 {
                break;
            }
            i += len;

            if b[i] != c || isspace(b[i - 1]) {
                continue;
            }

            if i + 2 < size && b[i + 1] == c && b[i + 2] == c {
                self.flush(ob, subj, open);
                let mut work = Buffer::with_capacity(SPAN_UNIT);
                self.parse_inline(&mut work, &data[..i]);
                return self
                    .dispatch
                    .render(ob, Node::TripleEmphasis { content: &work })
                    .then_some(i + 3);
            } else if i + 1 < size && b[i + 1] == c {
                // a two-marker closer: reparse the run as single emphasis
                // holding a double one that ends here
                return self
                    .emph1(ob, subj, open, start - 2, c)
                    .and_then(|n| n.checked_sub(2));
            } else {
                return self
                    .emph2(ob, subj, open, start - 1, c)
                    .and_then(|n| n.checked_sub(1));
            }
        }

        subj.exhaust(floor, seen);
        None
    }

    fn handle_backticks(
        &mut self,
        ob: &mut Buffer,
        subj: &mut Subject<'_>,
        pos: usize,
    ) -> Option<usize> {
        let input = subj.input;
        let data = &input[pos..];
        let b = data.as_bytes();
        let size = b.len();
        let nb = b.iter().take_while(|&&c| c == b'`').count();

        let mut i = nb;
        let mut close = None;
        while i < size {
            if b[i] == b'`' {
                let run = b[i..].iter().take_while(|&&c| c == b'`').count();
                if run == nb {
                    close = Some(i);
                    break;
                }
                i += run;
            } else {
                i += 1;
            }
        }

        let close = match close {
            Some(close) => close,
            None => {
                self.flush(ob, subj, pos);
                self.normal_text(ob, &data[..nb]);
                return Some(nb);
            }
        };

        let mut f_begin = nb;
        while f_begin < close && b[f_begin] == b' ' {
            f_begin += 1;
        }
        let mut f_end = close;
        while f_end > f_begin && b[f_end - 1] == b' ' {
            f_end -= 1;
        }

        self.flush(ob, subj, pos);
        self.dispatch
            .render(ob, Node::CodeSpan { text: &data[f_begin..f_end] })
            .then_some(close + nb)
    }

    /// Two trailing spaces before a newline.
    fn handle_newline(
        &mut self,
        ob: &mut Buffer,
        subj: &mut Subject<'_>,
        pos: usize,
    ) -> Option<usize> {
        self.flush(ob, subj, pos);
        ob.trim_end_spaces();
        self.dispatch.render(ob, Node::LineBreak).then_some(1)
    }

    fn handle_open_bracket(
        &mut self,
        ob: &mut Buffer,
        subj: &mut Subject<'_>,
        pos: usize,
    ) -> Option<usize> {
        // An image that failed to match stays literal as a whole.
        if pos > subj.mark && subj.input.as_bytes()[pos - 1] == b'!' {
            return None;
        }
        self.link_or_image(ob, subj, pos, pos, false)
    }

    fn handle_bang(&mut self, ob: &mut Buffer, subj: &mut Subject<'_>, pos: usize) -> Option<usize> {
        self.link_or_image(ob, subj, pos, pos + 1, true)
            .map(|n| n + 1)
    }

    fn lookup_reference(&self, label: &str) -> Option<Reference> {
        let found = self.refs.get(label).cloned();
        if found.is_none() {
            trace!(label, "unresolved reference");
        }
        found
    }

    /// Links, images and footnote references, with the `[` at `bracket`.
    /// Returns the length from `bracket` through the end of the construct.
    fn link_or_image(
        &mut self,
        ob: &mut Buffer,
        subj: &mut Subject<'_>,
        open: usize,
        bracket: usize,
        is_img: bool,
    ) -> Option<usize> {
        let input = subj.input;
        let data = &input[bracket..];
        let b = data.as_bytes();
        let size = b.len();

        let txt_e = subj.matching(bracket)? - bracket;
        let mut i = txt_e + 1;

        if self.options.extension.contains(Extensions::FOOTNOTES)
            && !is_img
            && b.get(1) == Some(&b'^')
        {
            if txt_e < 3 {
                return None;
            }
            let number = self.footnotes.number_for(&data[2..txt_e])?;
            self.flush(ob, subj, open);
            return self
                .dispatch
                .render(ob, Node::FootnoteRef { number })
                .then_some(i);
        }

        let enabled = if is_img {
            self.dispatch.images_enabled()
        } else {
            self.dispatch.links_enabled()
        };
        if !enabled {
            return None;
        }

        while i < size && isspace(b[i]) {
            i += 1;
        }

        let (link, title): (Cow<'_, str>, Option<Cow<'_, str>>) = if i < size && b[i] == b'(' {
            let paren = bracket + i;
            i += 1;
            while i < size && isspace(b[i]) {
                i += 1;
            }
            let mut link_b = i;

            // The destination ends at its closing `)`, or at a title quote
            // after whitespace, whichever comes first.
            let close = subj.matching(paren);
            let title_start = subj.next_title_start(bracket + link_b);
            i = match (close, title_start) {
                (Some(c), Some(t)) => c.min(t),
                (Some(end), None) | (None, Some(end)) => end,
                (None, None) => return None,
            } - bracket;
            let mut link_e = i;

            let mut title = None;
            if b[i] == b'\'' || b[i] == b'"' {
                let qtype = b[i];
                i += 1;
                let title_b = i;

                // Past the first closing quote, the next `)` ends the link.
                let quote = subj.next_quote(bracket + title_b, qtype)?;
                i = subj.next_close_paren(quote + 1)? - bracket;

                let mut title_e = i - 1;
                while title_e > title_b && isspace(b[title_e]) {
                    title_e -= 1;
                }
                if b[title_e] != b'\'' && b[title_e] != b'"' {
                    // no closing quote: it was all link
                    link_e = i;
                } else {
                    title = Some(Cow::Borrowed(&data[title_b..title_e]));
                }
            }

            while link_e > link_b && isspace(b[link_e - 1]) {
                link_e -= 1;
            }
            if link_e > link_b && b[link_b] == b'<' && b[link_e - 1] == b'>' {
                link_b += 1;
                link_e -= 1;
            }
            i += 1;

            (Cow::Borrowed(&data[link_b..link_e]), title)
        } else if i < size && b[i] == b'[' {
            i += 1;
            let id_b = i;
            while i < size && b[i] != b']' {
                i += 1;
            }
            if i >= size {
                return None;
            }
            let id = if id_b == i {
                &data[1..txt_e]
            } else {
                &data[id_b..i]
            };
            let reference = self.lookup_reference(id)?;
            i += 1;
            (
                Cow::Owned(reference.url),
                reference.title.map(Cow::Owned),
            )
        } else {
            let reference = self.lookup_reference(&data[1..txt_e])?;
            i = txt_e + 1;
            (
                Cow::Owned(reference.url),
                reference.title.map(Cow::Owned),
            )
        };

        let text = &data[1..txt_e];
        self.flush(ob, subj, open);

        let mut content = Buffer::with_capacity(SPAN_UNIT);
        if !is_img && !text.is_empty() {
            let in_link_body = self.in_link_body;
            self.in_link_body = true;
            self.parse_inline(&mut content, text);
            self.in_link_body = in_link_body;
        }

        let url = unescape(&link);
        let node = if is_img {
            Node::Image {
                link: &url,
                title: title.as_deref(),
                alt: text,
            }
        } else {
            Node::Link {
                link: &url,
                title: title.as_deref(),
                content: &content,
            }
        };
        self.dispatch.render(ob, node).then_some(i)
    }

    fn handle_pointy_brace(
        &mut self,
        ob: &mut Buffer,
        subj: &mut Subject<'_>,
        pos: usize,
    ) -> Option<usize> {
        let input = subj.input;
        let data = &input[pos..];
        let (end, kind) = subj.tag_length(pos)?;
        if end <= 2 {
            return None;
        }

        self.flush(ob, subj, pos);
        let rendered = match kind {
            Some(kind) if self.dispatch.autolinks_enabled() => {
                let link = unescape(&data[1..end - 1]);
                self.dispatch.render(ob, Node::Autolink { link: &link, kind })
            }
            _ => self.dispatch.render(ob, Node::RawHtmlTag { tag: &data[..end] }),
        };
        rendered.then_some(end)
    }

    fn handle_backslash(
        &mut self,
        ob: &mut Buffer,
        subj: &mut Subject<'_>,
        pos: usize,
    ) -> Option<usize> {
        let input = subj.input;
        let c = *input.as_bytes().get(pos + 1)?;
        if !ESCAPE_CHARS[c as usize] {
            return None;
        }
        self.flush(ob, subj, pos);
        self.normal_text(ob, &input[pos + 1..pos + 2]);
        Some(2)
    }

    fn handle_entity(
        &mut self,
        ob: &mut Buffer,
        subj: &mut Subject<'_>,
        pos: usize,
    ) -> Option<usize> {
        let input = subj.input;
        let len = entity::scan(&input[pos..])?;
        self.flush(ob, subj, pos);
        self.dispatch
            .render(ob, Node::Entity { text: &input[pos..pos + len] })
            .then_some(len)
    }

    fn handle_quote(&mut self, ob: &mut Buffer, subj: &mut Subject<'_>, pos: usize) -> Option<usize> {
        let input = subj.input;
        let data = &input[pos..];
        let b = data.as_bytes();
        let size = b.len();
        let nq = b.iter().take_while(|&&c| c == b'"').count();
        if subj.exhausted(QUOTE_FLOOR, pos + nq) {
            return None;
        }

        let mut end = nq;
        let mut seen = pos + nq;
        loop {
            let (len, skipped) = scan_emph_char(&b[end..], b'"');
            if skipped > 0 {
                seen = seen.max(pos + end + skipped);
            }
            if len == 0 {
                // a single quote closes on any later quote
                if nq == 1 {
                    subj.exhaust(QUOTE_FLOOR, seen);
                }
                return None;
            }
            end += len;
            let run = end;
            while end < size && b[end] == b'"' && end - run < nq {
                end += 1;
            }
            if end - run >= nq {
                break;
            }
        }

        let mut f_begin = nq;
        while f_begin < end && b[f_begin] == b' ' {
            f_begin += 1;
        }
        let mut f_end = end - nq;
        while f_end > nq && b[f_end - 1] == b' ' {
            f_end -= 1;
        }

        self.flush(ob, subj, pos);
        let mut work = Buffer::with_capacity(SPAN_UNIT);
        if f_begin < f_end {
            self.parse_inline(&mut work, &data[f_begin..f_end]);
        }
        self.dispatch
            .render(ob, Node::Quote { content: &work })
            .then_some(end)
    }

    /// `^word` or `^(several words)`.
    fn handle_caret(&mut self, ob: &mut Buffer, subj: &mut Subject<'_>, pos: usize) -> Option<usize> {
        let input = subj.input;
        let data = &input[pos..];
        let b = data.as_bytes();
        if b.len() < 2 {
            return None;
        }

        let (content, consumed) = if b[1] == b'(' {
            if subj.exhausted(CARET_FLOOR, pos + 2) {
                return None;
            }
            let (len, skipped) = scan_emph_char(&b[2..], b')');
            if len == 0 {
                subj.exhaust(CARET_FLOOR, pos + 2 + skipped);
                return None;
            }
            (&data[2..2 + len], len + 3)
        } else {
            let len = b[1..].iter().take_while(|&&c| !isspace(c)).count();
            if len == 0 {
                return None;
            }
            (&data[1..1 + len], len + 1)
        };

        self.flush(ob, subj, pos);
        let mut work = Buffer::with_capacity(SPAN_UNIT);
        self.parse_inline(&mut work, content);
        self.dispatch
            .render(ob, Node::Superscript { content: &work })
            .then_some(consumed)
    }

    /// Bare URLs, emails and `www.` hosts. A match may begin before `pos`,
    /// but never before the pending text.
    fn handle_autolink(
        &mut self,
        ob: &mut Buffer,
        subj: &mut Subject<'_>,
        trigger: Trigger,
        pos: usize,
    ) -> Option<usize> {
        let enabled = match trigger {
            Trigger::AutolinkWww => self.dispatch.links_enabled(),
            _ => self.dispatch.autolinks_enabled(),
        };
        if !enabled {
            return None;
        }

        let input = subj.input;
        let pending = &input[subj.mark..];
        let at = pos - subj.mark;
        let m = match trigger {
            Trigger::AutolinkUrl => autolink::url_match(pending, at),
            Trigger::AutolinkEmail => autolink::email_match(pending, at),
            _ => autolink::www_match(pending, at),
        }?;

        let (start, end) = (subj.mark + m.start, subj.mark + m.end);
        let text = &input[start..end];
        self.flush(ob, subj, start);

        let rendered = match m.kind {
            AutolinkKind::Url => self.dispatch.render(
                ob,
                Node::Autolink {
                    link: text,
                    kind: AutolinkType::Uri,
                },
            ),
            AutolinkKind::Email => self.dispatch.render(
                ob,
                Node::Autolink {
                    link: text,
                    kind: AutolinkType::Email,
                },
            ),
            AutolinkKind::Www => {
                let url = format!("http://{}", text);
                let mut content = Buffer::with_capacity(text.len());
                self.normal_text(&mut content, text);
                self.dispatch.render(
                    ob,
                    Node::Link {
                        link: &url,
                        title: None,
                        content: &content,
                    },
                )
            }
        };
        rendered.then_some(end - pos)
    }
}

/// Whether the byte at `i` is preceded by an odd number of backslashes.
pub(crate) fn is_escaped(data: &[u8], i: usize) -> bool {
    data[..i].iter().rev().take_while(|&&c| c == b'\\').count() % 2 == 1
}

/// Finds the next unescaped `c` in `data`, looking from index 1 and jumping
/// over code spans and link brackets. A `c` inside a construct that never
/// closes still counts. Returns 0 when there is none.
pub(crate) fn find_emph_char(data: &[u8], c: u8) -> usize {
    scan_emph_char(data, c).0
}

/// [`find_emph_char`], also returning the end of the last closed construct
/// jumped over (0 if none). Every `c` past that end was looked at.
fn scan_emph_char(data: &[u8], c: u8) -> (usize, usize) {
    let size = data.len();
    let mut i = 1;
    let mut skipped = 0;

    while i < size {
        while i < size && data[i] != c && data[i] != b'[' && data[i] != b'`' {
            i += 1;
        }
        if i == size {
            return (0, skipped);
        }

        if is_escaped(data, i) {
            i += 1;
            continue;
        }

        if data[i] == c {
            return (i, skipped);
        }

        if data[i] == b'`' {
            let mut span_nb = 0;
            let mut tmp_i = 0;

            while i < size && data[i] == b'`' {
                i += 1;
                span_nb += 1;
            }
            if i >= size {
                return (0, skipped);
            }

            let mut bt = 0;
            while i < size && bt < span_nb {
                if tmp_i == 0 && data[i] == c {
                    tmp_i = i;
                }
                if data[i] == b'`' {
                    bt += 1;
                } else {
                    bt = 0;
                }
                i += 1;
            }

            if i >= size && bt < span_nb {
                return (tmp_i, skipped);
            }
            skipped = i;
        } else {
            // `[`
            let mut tmp_i = 0;
            i += 1;
            while i < size && data[i] != b']' {
                if tmp_i == 0 && data[i] == c {
                    tmp_i = i;
                }
                i += 1;
            }

            i += 1;
            while i < size && (data[i] == b' ' || data[i] == b'\n') {
                i += 1;
            }
            if i >= size {
                return (tmp_i, skipped);
            }

            let cc = match data[i] {
                b'[' => b']',
                b'(' => b')',
                _ => {
                    if tmp_i != 0 {
                        return (tmp_i, skipped);
                    }
                    continue;
                }
            };

            i += 1;
            while i < size && data[i] != cc {
                if tmp_i == 0 && data[i] == c {
                    tmp_i = i;
                }
                i += 1;
            }
            if i >= size {
                return (tmp_i, skipped);
            }
            i += 1;
            skipped = i;
        }
    }

    (0, skipped)
}

/// Pairs every unescaped `[` and `(` in `data` with the `]` or `)` that
/// closes it.
fn match_pairs(data: &[u8]) -> FxHashMap<usize, usize> {
    let mut pairs = FxHashMap::default();
    let mut brackets = Vec::new();
    let mut parens = Vec::new();
    let mut i = 0;

    while i < data.len() {
        match data[i] {
            b'\\' => i += 1,
            b'[' => brackets.push(i),
            b'(' => parens.push(i),
            b']' => {
                if let Some(open) = brackets.pop() {
                    pairs.insert(open, i);
                }
            }
            b')' => {
                if let Some(open) = parens.pop() {
                    pairs.insert(open, i);
                }
            }
            _ => (),
        }
        i += 1;
    }

    pairs
}

/// The rest of a `<user@host>` autolink from the `@`, through the `>`.
fn is_mail_autolink(data: &[u8]) -> Option<usize> {
    let mut nb = 0;
    for (i, &c) in data.iter().enumerate() {
        if isalnum(c) {
            continue;
        }
        match c {
            b'@' => nb += 1,
            b'-' | b'.' | b'_' => (),
            b'>' => return if nb == 1 { Some(i + 1) } else { None },
            _ => return None,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emph_char_search() {
        assert_eq!(find_emph_char(b"*abc*", b'*'), 4);
        assert_eq!(find_emph_char(b"*a\\*b*", b'*'), 5);
        assert_eq!(find_emph_char(b"*a `*` b*", b'*'), 8);
        assert_eq!(find_emph_char(b"*a [*](x) b*", b'*'), 11);
        assert_eq!(find_emph_char(b"*a `x*", b'*'), 5);
        assert_eq!(find_emph_char(b"*abc", b'*'), 0);
    }

    #[test]
    fn emph_char_skipped_constructs() {
        assert_eq!(scan_emph_char(b"*abc", b'*'), (0, 0));
        assert_eq!(scan_emph_char(b"*a `x` b", b'*'), (0, 6));
        assert_eq!(scan_emph_char(b"*a [x](y) b*", b'*'), (11, 9));
        assert_eq!(scan_emph_char(b"*a [*] b", b'*'), (4, 0));
    }

    #[test]
    fn bracket_pairs() {
        let pairs = match_pairs(b"[a [b]](c (d)) \\[x] \\(y)");
        assert_eq!(pairs.get(&0), Some(&6));
        assert_eq!(pairs.get(&3), Some(&5));
        assert_eq!(pairs.get(&7), Some(&13));
        assert_eq!(pairs.get(&10), Some(&12));
        assert_eq!(pairs.len(), 4);
    }

    #[test]
    fn lookahead_reuses_forward_searches() {
        let mut la = Lookahead::default();
        let mut searches = 0;
        let hay = b"a)b)c";
        let mut find = |from: usize| {
            searches += 1;
            (from..hay.len()).find(|&j| hay[j] == b')')
        };

        assert_eq!(la.next(0, &mut find), Some(1));
        assert_eq!(la.next(1, &mut find), Some(1));
        assert_eq!(la.next(2, &mut find), Some(3));
        assert_eq!(la.next(4, &mut find), None);
        assert_eq!(la.next(5, &mut find), None);
        assert_eq!(searches, 3);
    }

    #[test]
    fn emphasis_floors() {
        let mut subj = Subject::new("*a *b");
        let floor = emph_floor(b'*', 1);
        assert!(!subj.exhausted(floor, 1));
        subj.exhaust(floor, 3);
        assert!(!subj.exhausted(floor, 1));
        assert!(subj.exhausted(floor, 4));
        assert_ne!(floor, emph_floor(b'_', 1));
        assert_ne!(floor, emph_floor(b'*', 2));
    }

    #[test]
    fn escapes() {
        assert!(is_escaped(b"a\\*", 2));
        assert!(!is_escaped(b"a\\\\*", 3));
        assert!(!is_escaped(b"*", 0));
    }

    fn tag(input: &str) -> Option<(usize, Option<AutolinkType>)> {
        Subject::new(input).tag_length(0)
    }

    #[test]
    fn tags() {
        assert_eq!(tag("<halp/>"), Some((7, None)));
        assert_eq!(tag("</em> x"), Some((5, None)));
        assert_eq!(tag("<!-- c --> x"), Some((10, None)));
        assert_eq!(
            tag("<https://github.com/>"),
            Some((21, Some(AutolinkType::Uri)))
        );
        assert_eq!(
            tag("<me@example.org>"),
            Some((16, Some(AutolinkType::Email)))
        );
        assert_eq!(tag("<a b"), None);
        assert_eq!(tag("< a>"), None);
        assert_eq!(tag("<http://a b>"), Some((12, None)));
    }

    #[test]
    fn mail_autolinks() {
        assert_eq!(is_mail_autolink(b"@example.org>"), Some(13));
        assert_eq!(is_mail_autolink(b"@a@b>"), None);
        assert_eq!(is_mail_autolink(b"@a b>"), None);
    }
}
