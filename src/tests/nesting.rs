use super::*;

fn shallow(max_nesting: usize) -> Options {
    Options {
        max_nesting,
        ..Options::default()
    }
}

#[test]
fn blocks_past_the_ceiling_are_text() {
    html_opts_i(
        "> > > deep\n",
        "<blockquote>\n<blockquote>\n&gt; deep\n</blockquote>\n</blockquote>\n",
        &shallow(2),
    );
}

#[test]
fn spans_past_the_ceiling_are_text() {
    html_opts_i("*a __b__ c*", "<p>*a __b__ c*</p>\n", &shallow(1));
    html_opts_i(
        "*a __b__ c*",
        "<p><em>a <strong>b</strong> c</em></p>\n",
        &shallow(3),
    );
}

#[test]
fn default_ceiling() {
    assert_eq!(Options::default().max_nesting, DEFAULT_MAX_NESTING);

    let quotes = "> ".repeat(DEFAULT_MAX_NESTING + 4) + "x\n";
    let out = markdown_to_html(&quotes, &Options::default());
    assert_eq!(out.matches("<blockquote>").count(), DEFAULT_MAX_NESTING);
    assert!(out.contains("&gt; &gt; x"));
}
