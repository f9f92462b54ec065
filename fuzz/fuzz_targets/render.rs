#![no_main]

use libfuzzer_sys::fuzz_target;

use larkdown::{Extensions, Options, RenderFlags, Renderer};

// The first four bytes pick the extensions and render flags; the rest is
// the document.
fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    let ext = u16::from_le_bytes([data[0], data[1]]) as u32;
    let render = u16::from_le_bytes([data[2], data[3]]) as u32;

    if let Ok(s) = std::str::from_utf8(&data[4..]) {
        let options = Options {
            extension: Extensions::from_bits_truncate(ext),
            render: RenderFlags::from_bits_truncate(render),
            max_nesting: 32,
        };
        Renderer::new(options).render(s);
    }
});
