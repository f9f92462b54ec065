//! The overridable renderer.
//!
//! A [`Renderer`] pairs [`Options`] with a [`Callbacks`] table. Every node
//! kind has one slot in the table; an empty slot falls back to the default
//! [`HtmlRenderer`]. Overrides return the string to emit for their node.

use std::borrow::Cow;
use std::fmt;
use std::io;

use tracing::{debug, instrument};

use crate::buffer::Buffer;
use crate::html::HtmlRenderer;
use crate::nodes::{AutolinkType, CellFlags, Node};
use crate::parser::options::{Options, RenderFlags};
use crate::parser::Parser;

macro_rules! callbacks {
    ($($(#[$attr:meta])* $name:ident($($arg:ident: $ty:ty),*);)*) => {
        /// Per-node rendering overrides.
        ///
        /// Each field holds an optional closure producing the output for one
        /// node kind. Fields can be set directly or through the same-named
        /// builder methods:
        ///
        /// ```rust
        /// # use larkdown::{Callbacks, Options, Renderer};
        /// let callbacks = Callbacks::default()
        ///     .hrule(|| "[HRULE]".to_string())
        ///     .header(|content, level| format!("[HEADER level={}] {}", level, content));
        /// let mut renderer = Renderer::with_callbacks(Options::default(), callbacks);
        /// assert_eq!(renderer.render("# Title\n\n---\n"), "[HEADER level=1] Title[HRULE]");
        /// ```
        ///
        /// Span overrides always count as rendered. A span left to the default
        /// renderer may be declined (an unsafe link under
        /// [`RenderFlags::SAFELINK`], empty emphasis), in which case its source
        /// text is kept literally.
        #[derive(Default)]
        pub struct Callbacks<'c> {
            $(
                $(#[$attr])*
                pub $name: Option<Box<dyn FnMut($($ty),*) -> String + 'c>>,
            )*
        }

        impl<'c> Callbacks<'c> {
            $(
                #[doc = concat!("Overrides `", stringify!($name), "`.")]
                pub fn $name<F>(mut self, f: F) -> Self
                where
                    F: FnMut($($ty),*) -> String + 'c,
                {
                    self.$name = Some(Box::new(f));
                    self
                }
            )*

            /// The names of the slots that hold an override.
            pub fn overridden(&self) -> Vec<&'static str> {
                let mut names = Vec::new();
                $(
                    if self.$name.is_some() {
                        names.push(stringify!($name));
                    }
                )*
                names
            }
        }
    };
}

callbacks! {
    /// `(text, lang)`: a code block and its info-string language.
    block_code(text: &str, lang: Option<&str>);
    /// `(content)`: a block quote's rendered children.
    block_quote(content: &str);
    /// `(text)`: a raw HTML block, trailing newlines included.
    block_html(text: &str);
    /// `(content, level)`
    header(content: &str, level: u8);
    /// A horizontal rule.
    hrule();
    /// `(content, ordered)`
    list(content: &str, ordered: bool);
    /// `(content, ordered)`
    list_item(content: &str, ordered: bool);
    /// `(content)`: the rendered inline content.
    paragraph(content: &str);
    /// `(header, body)`: the rendered header rows and body rows.
    table(header: &str, body: &str);
    /// `(content)`: the row's rendered cells.
    table_row(content: &str);
    /// `(content, flags)`
    table_cell(content: &str, flags: CellFlags);
    /// `(content)`: every rendered footnote definition.
    footnotes(content: &str);
    /// `(content, number)`
    footnote_def(content: &str, number: u32);

    /// `(link, kind)`
    autolink(link: &str, kind: AutolinkType);
    /// `(text)`: the raw code.
    codespan(text: &str);
    /// `**strong**`
    double_emphasis(content: &str);
    /// `*emphasis*`
    emphasis(content: &str);
    /// `_underline_`, under the underline extension.
    underline(content: &str);
    /// `==highlight==`
    highlight(content: &str);
    /// `"quote"`
    quote(content: &str);
    /// `(link, title, alt)`
    image(link: &str, title: Option<&str>, alt: &str);
    /// A hard break from two trailing spaces.
    line_break();
    /// `(link, title, content)`
    link(link: &str, title: Option<&str>, content: &str);
    /// `(tag)`: an inline tag or comment, verbatim.
    raw_html_tag(tag: &str);
    /// `***both***`
    triple_emphasis(content: &str);
    /// `~~strikethrough~~`
    strikethrough(content: &str);
    /// `^superscript`
    superscript(content: &str);
    /// `(number)`
    footnote_ref(number: u32);

    /// `(text)`: a character reference, verbatim.
    entity(text: &str);
    /// `(text)`: unescaped literal text.
    normal_text(text: &str);

    /// Emitted before the body.
    doc_header();
    /// Emitted after the body and footnotes.
    doc_footer();

    /// Rewrites the source before it is parsed.
    preprocess(text: &str);
    /// Rewrites the finished output.
    postprocess(html: &str);
}

impl<'c> fmt::Debug for Callbacks<'c> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("overridden", &self.overridden())
            .finish()
    }
}

/// Routes each node to its override, or to the default renderer.
pub(crate) struct Dispatch<'r, 'c> {
    callbacks: &'r mut Callbacks<'c>,
    html: HtmlRenderer,
}

impl<'r, 'c> Dispatch<'r, 'c> {
    pub(crate) fn new(callbacks: &'r mut Callbacks<'c>, flags: RenderFlags) -> Self {
        Dispatch {
            callbacks,
            html: HtmlRenderer::new(flags),
        }
    }

    /// Renders `node` into `ob`. Returns `false` if the node was declined.
    pub(crate) fn render(&mut self, ob: &mut Buffer, node: Node<'_>) -> bool {
        let cb = &mut *self.callbacks;
        let custom = match node {
            Node::BlockCode { text, lang } => cb.block_code.as_mut().map(|f| f(text, lang)),
            Node::BlockQuote { content } => cb.block_quote.as_mut().map(|f| f(content)),
            Node::BlockHtml { text } => cb.block_html.as_mut().map(|f| f(text)),
            Node::Header { content, level } => cb.header.as_mut().map(|f| f(content, level)),
            Node::HRule => cb.hrule.as_mut().map(|f| f()),
            Node::List { content, ordered } => cb.list.as_mut().map(|f| f(content, ordered)),
            Node::ListItem { content, ordered } => {
                cb.list_item.as_mut().map(|f| f(content, ordered))
            }
            Node::Paragraph { content } => cb.paragraph.as_mut().map(|f| f(content)),
            Node::Table { header, body } => cb.table.as_mut().map(|f| f(header, body)),
            Node::TableRow { content } => cb.table_row.as_mut().map(|f| f(content)),
            Node::TableCell { content, flags } => {
                cb.table_cell.as_mut().map(|f| f(content, flags))
            }
            Node::Footnotes { content } => cb.footnotes.as_mut().map(|f| f(content)),
            Node::FootnoteDef { content, number } => {
                cb.footnote_def.as_mut().map(|f| f(content, number))
            }
            Node::Autolink { link, kind } => cb.autolink.as_mut().map(|f| f(link, kind)),
            Node::CodeSpan { text } => cb.codespan.as_mut().map(|f| f(text)),
            Node::DoubleEmphasis { content } => cb.double_emphasis.as_mut().map(|f| f(content)),
            Node::Emphasis { content } => cb.emphasis.as_mut().map(|f| f(content)),
            Node::Underline { content } => cb.underline.as_mut().map(|f| f(content)),
            Node::Highlight { content } => cb.highlight.as_mut().map(|f| f(content)),
            Node::Quote { content } => cb.quote.as_mut().map(|f| f(content)),
            Node::Image { link, title, alt } => cb.image.as_mut().map(|f| f(link, title, alt)),
            Node::LineBreak => cb.line_break.as_mut().map(|f| f()),
            Node::Link {
                link,
                title,
                content,
            } => cb.link.as_mut().map(|f| f(link, title, content)),
            Node::RawHtmlTag { tag } => cb.raw_html_tag.as_mut().map(|f| f(tag)),
            Node::TripleEmphasis { content } => cb.triple_emphasis.as_mut().map(|f| f(content)),
            Node::Strikethrough { content } => cb.strikethrough.as_mut().map(|f| f(content)),
            Node::Superscript { content } => cb.superscript.as_mut().map(|f| f(content)),
            Node::FootnoteRef { number } => cb.footnote_ref.as_mut().map(|f| f(number)),
            Node::Entity { text } => cb.entity.as_mut().map(|f| f(text)),
            Node::NormalText { text } => cb.normal_text.as_mut().map(|f| f(text)),
            Node::DocHeader => cb.doc_header.as_mut().map(|f| f()),
            Node::DocFooter => cb.doc_footer.as_mut().map(|f| f()),
        };

        match custom {
            Some(output) => {
                ob.put(&output);
                true
            }
            None => {
                let rendered = self.html.render(ob, &node);
                debug_assert!(rendered || !node.block(), "block node declined: {:?}", node);
                rendered
            }
        }
    }

    fn flags(&self) -> RenderFlags {
        self.html.flags()
    }

    /// Images are recognized unless the default renderer skips them.
    pub(crate) fn images_enabled(&self) -> bool {
        self.callbacks.image.is_some() || !self.flags().contains(RenderFlags::SKIP_IMAGES)
    }

    /// Links (inline, reference and `www.` autolinks) are recognized unless
    /// the default renderer skips them.
    pub(crate) fn links_enabled(&self) -> bool {
        self.callbacks.link.is_some() || !self.flags().contains(RenderFlags::SKIP_LINKS)
    }

    pub(crate) fn autolinks_enabled(&self) -> bool {
        self.callbacks.autolink.is_some() || !self.flags().contains(RenderFlags::SKIP_LINKS)
    }

    /// Raw HTML blocks are recognized unless the default renderer skips or
    /// escapes HTML.
    pub(crate) fn block_html_enabled(&self) -> bool {
        self.callbacks.block_html.is_some()
            || !self
                .flags()
                .intersects(RenderFlags::SKIP_HTML | RenderFlags::ESCAPE)
    }

    pub(crate) fn preprocess<'t>(&mut self, text: &'t str) -> Cow<'t, str> {
        match self.callbacks.preprocess.as_mut() {
            Some(f) => Cow::Owned(f(text)),
            None => Cow::Borrowed(text),
        }
    }

    pub(crate) fn postprocess(&mut self, html: String) -> String {
        match self.callbacks.postprocess.as_mut() {
            Some(f) => f(&html),
            None => html,
        }
    }
}

/// A configured Markdown to HTML renderer.
///
/// A renderer can be reused: each call to [`Renderer::render`] starts from
/// fresh per-document state (references, footnotes, header numbering).
///
/// ```rust
/// # use larkdown::{Callbacks, Extensions, Options, RenderFlags, Renderer};
/// let mut renderer = Renderer::new(Options::new(Extensions::empty(), RenderFlags::TOC));
/// assert_eq!(renderer.render("# A\n"), "<h1 id=\"toc_0\">A</h1>\n");
/// assert_eq!(renderer.render("# B\n"), "<h1 id=\"toc_0\">B</h1>\n");
///
/// renderer.callbacks_mut().emphasis = Some(Box::new(|c: &str| c.to_uppercase()));
/// assert_eq!(renderer.render("*loud*\n"), "<p>LOUD</p>\n");
/// ```
pub struct Renderer<'c> {
    options: Options,
    callbacks: Callbacks<'c>,
}

impl<'c> Renderer<'c> {
    /// A renderer using the default HTML output for every node.
    pub fn new(options: Options) -> Self {
        Self::with_callbacks(options, Callbacks::default())
    }

    /// A renderer consulting `callbacks` before the default HTML output.
    pub fn with_callbacks(options: Options, callbacks: Callbacks<'c>) -> Self {
        Renderer { options, callbacks }
    }

    /// The options every render uses.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The installed overrides.
    pub fn callbacks(&self) -> &Callbacks<'c> {
        &self.callbacks
    }

    /// The installed overrides, for replacing slots between renders.
    pub fn callbacks_mut(&mut self) -> &mut Callbacks<'c> {
        &mut self.callbacks
    }

    /// Renders a document.
    #[instrument(level = "debug", skip_all, fields(len = md.len()))]
    pub fn render(&mut self, md: &str) -> String {
        let mut dispatch = Dispatch::new(&mut self.callbacks, self.options.render);
        let md = dispatch.preprocess(md);
        let mut parser = Parser::new(&self.options, dispatch);
        let html = parser.render(&md);
        let html = parser.into_dispatch().postprocess(html);
        debug!(output = html.len(), "rendered");
        html
    }

    /// Renders a document into `output`.
    pub fn render_to<W: io::Write>(&mut self, md: &str, output: &mut W) -> io::Result<()> {
        let html = self.render(md);
        output.write_all(html.as_bytes())
    }
}

impl<'c> fmt::Debug for Renderer<'c> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("options", &self.options)
            .field("callbacks", &self.callbacks)
            .finish()
    }
}
