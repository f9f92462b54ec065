//! The node kinds handed to the renderer.
//!
//! Nothing here is retained: the parser builds a [`Node`] for each construct
//! as soon as it has rendered the construct's children, hands it to the
//! renderer, and drops it. Payload strings borrow either the source text or
//! the child output accumulated for the node.

/// Every construct the renderer can be asked to produce. Internal to the
/// crate: overrides receive the payload fields as closure arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node<'a> {
    /// **Block**. A fenced or indented code block. `text` is the raw code,
    /// `lang` the first word of a fence's info string.
    ///
    /// ~~~ md
    /// ```rust
    /// fn main() {}
    /// ```
    /// ~~~
    BlockCode {
        text: &'a str,
        lang: Option<&'a str>,
    },

    /// **Block**. A block quote; `content` is the rendered nested blocks.
    ///
    /// ``` md
    /// > A block quote.
    /// ```
    BlockQuote { content: &'a str },

    /// **Block**. A raw HTML block, passed through untouched.
    BlockHtml { text: &'a str },

    /// **Block**. An ATX or setext header.
    ///
    /// ``` md
    /// # Level one
    ///
    /// Level two
    /// ---------
    /// ```
    Header { content: &'a str, level: u8 },

    /// **Block**. A horizontal rule.
    HRule,

    /// **Block**. A list; `content` is the concatenated rendered items.
    List { content: &'a str, ordered: bool },

    /// **Block**. A single list item.
    ListItem { content: &'a str, ordered: bool },

    /// **Block**. A paragraph of inline content.
    Paragraph { content: &'a str },

    /// **Block**. A table with its rendered header row and body rows.
    ///
    /// ``` md
    /// | a | b |
    /// |---|--:|
    /// | c | d |
    /// ```
    Table { header: &'a str, body: &'a str },

    /// **Block**. One table row; `content` is its rendered cells.
    TableRow { content: &'a str },

    /// **Block**. One table cell.
    TableCell { content: &'a str, flags: CellFlags },

    /// **Block**. The trailing block holding every used footnote definition.
    Footnotes { content: &'a str },

    /// **Block**. A single footnote definition, numbered by first reference.
    FootnoteDef { content: &'a str, number: u32 },

    /// **Inline**. An autolink: `<https://example.org>`, `<me@example.org>`,
    /// or a bare URL/email under the autolink extension.
    Autolink { link: &'a str, kind: AutolinkType },

    /// **Inline**. A code span; `text` is raw.
    CodeSpan { text: &'a str },

    /// **Inline**. `**strong**` or `__strong__`.
    DoubleEmphasis { content: &'a str },

    /// **Inline**. `*emphasis*` or `_emphasis_`.
    Emphasis { content: &'a str },

    /// **Inline**. `_underline_`, when the underline extension claims `_`.
    Underline { content: &'a str },

    /// **Inline**. `==highlight==`.
    Highlight { content: &'a str },

    /// **Inline**. `"quote"`.
    Quote { content: &'a str },

    /// **Inline**. An image; `alt` is the raw bracket text.
    Image {
        link: &'a str,
        title: Option<&'a str>,
        alt: &'a str,
    },

    /// **Inline**. A hard line break (two trailing spaces).
    LineBreak,

    /// **Inline**. A link; `content` is the rendered bracket text.
    Link {
        link: &'a str,
        title: Option<&'a str>,
        content: &'a str,
    },

    /// **Inline**. A raw HTML tag or comment.
    RawHtmlTag { tag: &'a str },

    /// **Inline**. `***both***`.
    TripleEmphasis { content: &'a str },

    /// **Inline**. `~~strikethrough~~`.
    Strikethrough { content: &'a str },

    /// **Inline**. `^superscript` or `^(super script)`.
    Superscript { content: &'a str },

    /// **Inline**. A footnote reference `[^label]`.
    FootnoteRef { number: u32 },

    /// **Low level**. A character reference such as `&amp;` or `&#9731;`.
    Entity { text: &'a str },

    /// **Low level**. A run of literal text.
    NormalText { text: &'a str },

    /// **Document**. Emitted once before the body.
    DocHeader,

    /// **Document**. Emitted once after the body and footnotes.
    DocFooter,
}

impl<'a> Node<'a> {
    /// Whether this is a block-level node. Block nodes always render; inline
    /// nodes may be declined by the renderer, leaving their source text in
    /// place.
    pub fn block(&self) -> bool {
        matches!(
            *self,
            Node::BlockCode { .. }
                | Node::BlockQuote { .. }
                | Node::BlockHtml { .. }
                | Node::Header { .. }
                | Node::HRule
                | Node::List { .. }
                | Node::ListItem { .. }
                | Node::Paragraph { .. }
                | Node::Table { .. }
                | Node::TableRow { .. }
                | Node::TableCell { .. }
                | Node::Footnotes { .. }
                | Node::FootnoteDef { .. }
        )
    }
}

/// Alignment of a single table column.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum TableAlignment {
    /// Cell content is unaligned.
    #[default]
    None,

    /// Cell content is aligned left.
    Left,

    /// Cell content is centered.
    Center,

    /// Cell content is aligned right.
    Right,
}

impl TableAlignment {
    pub(crate) fn css_name(&self) -> Option<&'static str> {
        match *self {
            TableAlignment::None => None,
            TableAlignment::Left => Some("left"),
            TableAlignment::Center => Some("center"),
            TableAlignment::Right => Some("right"),
        }
    }

    /// Combines the colons found on either side of a separator cell.
    pub(crate) fn from_colons(left: bool, right: bool) -> Self {
        match (left, right) {
            (false, false) => TableAlignment::None,
            (true, false) => TableAlignment::Left,
            (false, true) => TableAlignment::Right,
            (true, true) => TableAlignment::Center,
        }
    }
}

/// What a table cell knows about its position.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct CellFlags {
    /// The alignment parsed from the separator row for this column.
    pub alignment: TableAlignment,

    /// Whether the cell belongs to the header row.
    pub header: bool,
}

/// The kind of an autolink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutolinkType {
    /// A URI with a scheme, such as `https://example.org`.
    Uri,

    /// An email address without `mailto:`.
    Email,
}
