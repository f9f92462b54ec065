use entities::ENTITIES;
use std::io::Write;
use std::{env, path::PathBuf};

// Block-level HTML tags recognised as the opening of a raw HTML block.
const BLOCK_TAGS: &[&str] = &[
    "article",
    "aside",
    "blockquote",
    "canvas",
    "del",
    "div",
    "dl",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hgroup",
    "iframe",
    "ins",
    "math",
    "nav",
    "noscript",
    "ol",
    "output",
    "p",
    "pre",
    "script",
    "section",
    "style",
    "table",
    "ul",
    "video",
];

fn main() {
    let out_dir: PathBuf = env::var("OUT_DIR").unwrap().parse().unwrap();

    // entity::scan is handed just the inner entity name, like "amp" for
    // "&amp;"; only names with a trailing ";" are accepted.
    //
    // entities::ENTITIES includes many both with and without a trailing ";",
    // and upper- and lower-case variants are interleaved. Deduplicate the
    // names first; phf_codegen rejects repeated keys.
    let mut names = ENTITIES
        .iter()
        .filter(|e| e.entity.starts_with('&') && e.entity.ends_with(';'))
        .map(|e| &e.entity[1..e.entity.len() - 1])
        .collect::<Vec<_>>();
    names.sort_unstable();
    names.dedup();

    let mut entity_set = phf_codegen::Set::new();
    for name in &names {
        entity_set.entry(*name);
    }

    let mut tag_set = phf_codegen::Set::new();
    for tag in BLOCK_TAGS {
        tag_set.entry(*tag);
    }

    let out = std::fs::File::create(out_dir.join("tables.rs")).unwrap();
    let mut bw = std::io::BufWriter::new(out);
    writeln!(
        bw,
        "pub(crate) static ENTITY_NAMES: phf::Set<&'static str> = {};",
        entity_set.build()
    )
    .unwrap();
    writeln!(
        bw,
        "pub(crate) static BLOCK_TAGS: phf::Set<&'static str> = {};",
        tag_set.build()
    )
    .unwrap();
    writeln!(
        bw,
        "pub(crate) const MAX_ENTITY_NAME: usize = {};",
        names.iter().map(|n| n.len()).max().unwrap_or(0)
    )
    .unwrap();
}
