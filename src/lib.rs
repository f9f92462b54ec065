//! A callback-driven Markdown to HTML renderer: a single pass over
//! the source that hands every construct to an overridable renderer as soon
//! as it is recognized, with no syntax tree in between.
//!
//! ```rust
//! use larkdown::{render, Extensions, RenderFlags};
//!
//! assert_eq!(render("Hello, **世界**!", Extensions::empty(), RenderFlags::empty()),
//!            "<p>Hello, <strong>世界</strong>!</p>\n");
//! ```
//!
//! Grammar extensions are enabled with [`Extensions`]; the output of the
//! default HTML renderer is tuned with [`RenderFlags`]. Any node kind can be
//! rendered differently by installing a closure in its [`Callbacks`] slot:
//!
//! ```rust
//! use larkdown::{Callbacks, Options, Renderer};
//!
//! let callbacks = Callbacks::default()
//!     .double_emphasis(|content| format!("<b>{}</b>", content))
//!     .header(|content, level| format!("{} {}", "=".repeat(level as usize), content));
//! let mut renderer = Renderer::with_callbacks(Options::default(), callbacks);
//!
//! assert_eq!(renderer.render("# Hi\n\nSo **bold**.\n"), "= Hi\n<p>So <b>bold</b>.</p>\n");
//! ```
//!
//! Overrides for block nodes receive their children already rendered, so the
//! default renderer and overrides mix freely.

#![warn(missing_docs)]
#![allow(clippy::too_many_arguments)]

mod buffer;
mod character_set;
mod ctype;
mod entity;
mod html;
mod nodes;
mod parser;
mod renderer;
mod scanners;
mod smartypants;
mod strings;
#[cfg(test)]
mod tests;

pub use html::{escape_html, has_safe_prefix, is_safe_link};
pub use nodes::{AutolinkType, CellFlags, TableAlignment};
pub use parser::options::{Extensions, Options, RenderFlags, DEFAULT_MAX_NESTING};
pub use renderer::{Callbacks, Renderer};
pub use smartypants::smartypants;

/// Renders a document with the default HTML renderer.
///
/// ```rust
/// # use larkdown::{render, Extensions, RenderFlags};
/// assert_eq!(render("| a |\n|---|\n| b |\n", Extensions::TABLES, RenderFlags::empty()),
///            "<table><thead>\n<tr>\n<th>a</th>\n</tr>\n</thead><tbody>\n<tr>\n<td>b</td>\n</tr>\n</tbody></table>\n");
/// ```
pub fn render(text: &str, extensions: Extensions, render_flags: RenderFlags) -> String {
    markdown_to_html(text, &Options::new(extensions, render_flags))
}

/// Renders a document with the default HTML renderer and the given
/// [`Options`].
///
/// ```rust
/// # use larkdown::{markdown_to_html, Options};
/// assert_eq!(markdown_to_html("Hello, *world*!", &Options::default()),
///            "<p>Hello, <em>world</em>!</p>\n");
/// ```
pub fn markdown_to_html(md: &str, options: &Options) -> String {
    Renderer::new(*options).render(md)
}
