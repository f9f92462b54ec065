//! Configuration for the parser and renderer.  Extensions affect the
//! grammar; render flags affect the default HTML output.

#[cfg(feature = "bon")]
use bon::Builder;
use bitflags::bitflags;

/// The nesting ceiling used when none is configured.
pub const DEFAULT_MAX_NESTING: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "bon", derive(Builder))]
/// Umbrella options struct.
///
/// ```rust
/// # use larkdown::{markdown_to_html, Extensions, Options, RenderFlags};
/// let mut options = Options::default();
/// options.extension = Extensions::STRIKETHROUGH | Extensions::SUPERSCRIPT;
/// options.render = RenderFlags::USE_XHTML;
/// assert_eq!(markdown_to_html("~~old~~ ^new\n\n***\n", &options),
///            "<p><del>old</del> <sup>new</sup></p>\n\n<hr/>\n");
/// ```
pub struct Options {
    /// Grammar extensions.
    #[cfg_attr(feature = "bon", builder(default))]
    pub extension: Extensions,

    /// Default-renderer behavior.
    #[cfg_attr(feature = "bon", builder(default))]
    pub render: RenderFlags,

    /// How deeply containers and spans may nest before the remaining content
    /// is emitted as plain text.
    ///
    /// ```rust
    /// # use larkdown::{markdown_to_html, Options};
    /// let mut options = Options::default();
    /// options.max_nesting = 2;
    /// assert_eq!(markdown_to_html("> > > deep\n", &options),
    ///            "<blockquote>\n<blockquote>\n&gt; deep\n</blockquote>\n</blockquote>\n");
    /// ```
    #[cfg_attr(feature = "bon", builder(default = DEFAULT_MAX_NESTING))]
    pub max_nesting: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            extension: Extensions::empty(),
            render: RenderFlags::empty(),
            max_nesting: DEFAULT_MAX_NESTING,
        }
    }
}

impl Options {
    /// Options with the given extensions and render flags and the default
    /// nesting ceiling.
    pub fn new(extension: Extensions, render: RenderFlags) -> Self {
        Options {
            extension,
            render,
            ..Options::default()
        }
    }
}

bitflags! {
    /// Grammar extensions. Each one enables a construct that is otherwise
    /// literal text, or changes how an existing construct is recognized.
    ///
    /// ```rust
    /// # use larkdown::{render, Extensions, RenderFlags};
    /// let ext = Extensions::TABLES | Extensions::FENCED_CODE;
    /// assert!(ext.contains(Extensions::TABLES));
    /// assert_eq!(render("```\nx\n```\n", ext, RenderFlags::empty()),
    ///            "<pre><code>x\n</code></pre>\n");
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Extensions: u32 {
        /// Pipe tables with a `---|---` separator row.
        const TABLES = 1 << 0;
        /// Code blocks fenced with ```` ``` ```` or `~~~`.
        const FENCED_CODE = 1 << 1;
        /// `[^label]` references and `[^label]: ...` definitions.
        const FOOTNOTES = 1 << 2;
        /// Bare URLs, `www.` hosts and email addresses become links.
        ///
        /// ```rust
        /// # use larkdown::{render, Extensions, RenderFlags};
        /// assert_eq!(render("see www.example.org.\n", Extensions::AUTOLINK, RenderFlags::empty()),
        ///            "<p>see <a href=\"http://www.example.org\">www.example.org</a>.</p>\n");
        /// ```
        const AUTOLINK = 1 << 3;
        /// `~~text~~`.
        const STRIKETHROUGH = 1 << 4;
        /// `_text_` renders as underline instead of emphasis.
        const UNDERLINE = 1 << 5;
        /// `==text==`.
        const HIGHLIGHT = 1 << 6;
        /// `"text"` renders through the quote callback.
        const QUOTE = 1 << 7;
        /// `^word` and `^(some words)`.
        const SUPERSCRIPT = 1 << 8;
        /// Lists, HTML blocks and fences may interrupt a paragraph without a
        /// blank line.
        const LAX_SPACING = 1 << 9;
        /// Emphasis markers flanked by alphanumerics stay literal.
        const NO_INTRA_EMPHASIS = 1 << 10;
        /// ATX headers need a space after the `#` run.
        const SPACE_HEADERS = 1 << 11;
        /// Indented lines are not code blocks.
        const DISABLE_INDENTED_CODE = 1 << 12;
    }
}

bitflags! {
    /// Behaviors of the default HTML renderer. Flags only affect node kinds
    /// that have no override installed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RenderFlags: u32 {
        /// Drop raw HTML tags and don't recognize HTML blocks.
        const SKIP_HTML = 1 << 0;
        /// Drop inline `<style>` tags.
        const SKIP_STYLE = 1 << 1;
        /// Leave images as literal text.
        const SKIP_IMAGES = 1 << 2;
        /// Leave links and autolinks as literal text.
        const SKIP_LINKS = 1 << 3;
        /// Expand every tab to 4-column stops, not just indentation.
        const EXPAND_TABS = 1 << 4;
        /// Only link to known-safe URLs; others stay literal.
        const SAFELINK = 1 << 5;
        /// Give headers sequential `toc_N` ids.
        const TOC = 1 << 6;
        /// Every newline inside a paragraph is a line break.
        const HARD_WRAP = 1 << 7;
        /// Self-close void elements (`<br/>`, `<hr/>`, `<img/>`).
        const USE_XHTML = 1 << 8;
        /// Escape raw HTML instead of passing it through.
        const ESCAPE = 1 << 9;
        /// Typographic quotes, dashes and ellipses in text.
        const SMARTYPANTS = 1 << 10;
    }
}

impl Default for Extensions {
    fn default() -> Self {
        Extensions::empty()
    }
}

impl Default for RenderFlags {
    fn default() -> Self {
        RenderFlags::empty()
    }
}
