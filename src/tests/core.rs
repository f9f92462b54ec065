use super::*;

#[test]
fn empty_document() {
    html("", "");
    html("\n\n  \n", "");
}

#[test]
fn paragraphs() {
    html("Hello, *world*!", "<p>Hello, <em>world</em>!</p>\n");
    html("one\ntwo\n\nthree\n", "<p>one\ntwo</p>\n\n<p>three</p>\n");
}

#[test]
fn line_endings_and_bom() {
    html("a\r\nb\r\n", "<p>a\nb</p>\n");
    html("a\rb", "<p>a\nb</p>\n");
    html("\u{feff}# x", "<h1>x</h1>\n");
}

#[test]
fn atx_headers() {
    html(
        "# A\n## B ##\n###### C\n",
        "<h1>A</h1>\n\n<h2>B</h2>\n\n<h6>C</h6>\n",
    );
    html("# C#\n", "<h1>C#</h1>\n");
    html("#Tight\n", "<h1>Tight</h1>\n");
}

#[test]
fn setext_headers() {
    html(
        "Title\n=====\n\nSub\n---\n",
        "<h1>Title</h1>\n\n<h2>Sub</h2>\n",
    );
    html("a\nb\n===\n", "<p>a</p>\n\n<h1>b</h1>\n");
}

#[test]
fn horizontal_rules() {
    html("* * *\n", "<hr>\n");
    html("a\n\n___\n\nb\n", "<p>a</p>\n\n<hr>\n\n<p>b</p>\n");
}

#[test]
fn blockquotes() {
    html("> a\n> b\n", "<blockquote>\n<p>a\nb</p>\n</blockquote>\n");
    html("> a\nb\n", "<blockquote>\n<p>a\nb</p>\n</blockquote>\n");
    html(
        "> > nested\n",
        "<blockquote>\n<blockquote>\n<p>nested</p>\n</blockquote>\n</blockquote>\n",
    );
}

#[test]
fn tight_lists() {
    html("- a\n- b\n", "<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n");
    html("1. x\n2. y\n", "<ol>\n<li>x</li>\n<li>y</li>\n</ol>\n");
}

#[test]
fn loose_list() {
    html(
        "- a\n\n- b\n",
        "<ul>\n<li><p>a</p></li>\n<li><p>b</p></li>\n</ul>\n",
    );
}

#[test]
fn nested_list() {
    html(
        "- a\n  - b\n",
        "<ul>\n<li>a\n\n<ul>\n<li>b</li>\n</ul></li>\n</ul>\n",
    );
}

#[test]
fn list_kind_change_ends_list() {
    html(
        "- a\n\n1. b\n",
        "<ul>\n<li>a</li>\n</ul>\n\n<ol>\n<li>b</li>\n</ol>\n",
    );
}

#[test]
fn indented_code() {
    html(
        "    a\n\n    b\n\n\n",
        "<pre><code>a\n\nb\n</code></pre>\n",
    );
    html("    <tag> & co\n", "<pre><code>&lt;tag&gt; &amp; co\n</code></pre>\n");
}

#[test]
fn code_spans() {
    html("`a < b`", "<p><code>a &lt; b</code></p>\n");
    html("`` a`b ``", "<p><code>a`b</code></p>\n");
    html("`abc", "<p>`abc</p>\n");
    html("`*not emph*`", "<p><code>*not emph*</code></p>\n");
}

#[test]
fn emphasis() {
    html(
        "*a* **b** ***c***",
        "<p><em>a</em> <strong>b</strong> <strong><em>c</em></strong></p>\n",
    );
    html("_a_ __b__", "<p><em>a</em> <strong>b</strong></p>\n");
    html("a * b * c", "<p>a * b * c</p>\n");
}

#[test]
fn inline_links() {
    html(
        "[a](http://x.org \"T\")",
        "<p><a href=\"http://x.org\" title=\"T\">a</a></p>\n",
    );
    html("[a](<http://x.org>)", "<p><a href=\"http://x.org\">a</a></p>\n");
    html(
        "[*em* text](/u)",
        "<p><a href=\"/u\"><em>em</em> text</a></p>\n",
    );
}

#[test]
fn reference_links() {
    html(
        "[a][1]\n\n[1]: http://x.org\n",
        "<p><a href=\"http://x.org\">a</a></p>\n",
    );
    html("[A][Foo]\n\n[foo]: /u\n", "<p><a href=\"/u\">A</a></p>\n");
    html("[Foo]\n\n[foo]: /u\n", "<p><a href=\"/u\">Foo</a></p>\n");
    html("[a][nope]", "<p>[a][nope]</p>\n");
}

#[test]
fn first_reference_definition_wins() {
    html(
        "[x]\n\n[x]: /first\n[x]: /second\n",
        "<p><a href=\"/first\">x</a></p>\n",
    );
}

#[test]
fn reference_definitions_stay_in_code() {
    html_opts!(
        [extension.FENCED_CODE],
        "```\n[x]: /u\n```\n",
        "<pre><code>[x]: /u\n</code></pre>\n",
    );
}

#[test]
fn images() {
    html(
        "![alt](/i.png \"t\")",
        "<p><img src=\"/i.png\" alt=\"alt\" title=\"t\"></p>\n",
    );
    html(
        "![x][img]\n\n[img]: /i.png\n",
        "<p><img src=\"/i.png\" alt=\"x\"></p>\n",
    );
}

#[test]
fn angle_autolinks() {
    html(
        "<http://x.org>",
        "<p><a href=\"http://x.org\">http://x.org</a></p>\n",
    );
    html(
        "<me@x.org>",
        "<p><a href=\"mailto:me@x.org\">me@x.org</a></p>\n",
    );
}

#[test]
fn entities() {
    html(
        "AT&amp;T &copy; & co",
        "<p>AT&amp;T &copy; &amp; co</p>\n",
    );
    html("&#9731; &#x2603;", "<p>&#9731; &#x2603;</p>\n");
}

#[test]
fn backslash_escapes() {
    html("\\*not\\*", "<p>*not*</p>\n");
    html("\\a", "<p>\\a</p>\n");
    html("end\\", "<p>end\\</p>\n");
}

#[test]
fn raw_html() {
    html("a <b>c</b>", "<p>a <b>c</b></p>\n");
    html("<div>\n*x*\n</div>\n", "<div>\n*x*\n</div>\n");
    html("<!-- note -->\n", "<!-- note -->\n");
}

#[test]
fn hard_line_break() {
    html("a  \nb", "<p>a<br>\nb</p>\n");
    html("a \nb", "<p>a \nb</p>\n");
}

#[test]
fn unicode_text() {
    html(
        "Ünïcödé *ẽmphasis* 世界",
        "<p>Ünïcödé <em>ẽmphasis</em> 世界</p>\n",
    );
}
