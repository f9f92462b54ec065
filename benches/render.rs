use divan::Bencher;
use larkdown::{Callbacks, Extensions, Options, RenderFlags, Renderer};

fn main() {
    divan::main();
}

/// A document touching most block and span constructs, repeated.
fn corpus() -> String {
    let section = "\
# Header with *emphasis*

A paragraph with **strong**, `code`, a [link](https://example.org/ \"title\"),
an ![image](/i.png), ~~struck~~ and ==marked== text, and a footnote.[^n]

> A quote
> > nested, with www.example.org and me@example.org

- one
- two
    - three

1. first

2. second

| a | b |
|:--|--:|
| 1 | 2 |

```rust
fn main() {}
```

[^n]: The note.

---

";
    section.repeat(200)
}

fn all_extensions() -> Options {
    Options::new(Extensions::all(), RenderFlags::empty())
}

#[divan::bench]
fn default_options(b: Bencher) {
    let s = corpus();
    b.bench(|| Renderer::new(Options::default()).render(&s));
}

#[divan::bench]
fn all_extensions_html(b: Bencher) {
    let s = corpus();
    let mut renderer = Renderer::new(all_extensions());
    b.bench_local(|| renderer.render(&s));
}

#[divan::bench]
fn smartypants(b: Bencher) {
    let s = corpus();
    let mut renderer = Renderer::new(Options::new(
        Extensions::all(),
        RenderFlags::SMARTYPANTS | RenderFlags::SAFELINK,
    ));
    b.bench_local(|| renderer.render(&s));
}

#[divan::bench]
fn callbacks(b: Bencher) {
    let s = corpus();
    let callbacks = Callbacks::default()
        .paragraph(|content| format!("[{}]", content))
        .emphasis(|content| content.to_uppercase())
        .normal_text(|text| text.to_string());
    let mut renderer = Renderer::with_callbacks(all_extensions(), callbacks);
    b.bench_local(|| renderer.render(&s));
}
