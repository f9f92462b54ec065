#![no_main]

use libfuzzer_sys::fuzz_target;

use larkdown::{Callbacks, Extensions, Options, RenderFlags, Renderer};

// Overrides for every span kind, so that nothing is ever declined.
fuzz_target!(|s: &str| {
    let callbacks = Callbacks::default()
        .autolink(|link, _| link.to_string())
        .codespan(|text| text.to_string())
        .double_emphasis(|c| c.to_string())
        .emphasis(|c| c.to_string())
        .underline(|c| c.to_string())
        .highlight(|c| c.to_string())
        .quote(|c| c.to_string())
        .image(|link, _, alt| format!("{}{}", alt, link))
        .line_break(|| "\n".to_string())
        .link(|link, _, c| format!("{}{}", c, link))
        .raw_html_tag(|tag| tag.to_string())
        .triple_emphasis(|c| c.to_string())
        .strikethrough(|c| c.to_string())
        .superscript(|c| c.to_string())
        .footnote_ref(|n| n.to_string());
    let mut renderer = Renderer::with_callbacks(
        Options::new(Extensions::all(), RenderFlags::all()),
        callbacks,
    );
    renderer.render(s);
});
