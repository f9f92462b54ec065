use super::*;

#[test]
fn autolink() {
    html_opts!(
        [extension.AUTOLINK],
        "https://github.com/",
        "<p><a href=\"https://github.com/\">https://github.com/</a></p>\n",
    );
}

#[test]
fn autolink_off() {
    html("https://github.com/", "<p>https://github.com/</p>\n");
}

#[test]
fn fenced_code() {
    html_opts!(
        [extension.FENCED_CODE],
        "```\n$ :(){ :|:& };:\n```",
        "<pre><code>$ :(){ :|:&amp; };:\n</code></pre>\n",
    );
}

#[test]
fn fenced_code_lang() {
    html_opts!(
        [extension.FENCED_CODE],
        "```bash\n$ :(){ :|:& };:\n```",
        "<pre><code class=\"language-bash\">$ :(){ :|:&amp; };:\n</code></pre>\n",
    );
}

#[test]
fn fenced_code_tildes() {
    html_opts!(
        [extension.FENCED_CODE],
        "~~~ rust\nfn main() {}\n~~~\n",
        "<pre><code class=\"language-rust\">fn main() {}\n</code></pre>\n",
    );
}

#[test]
fn footnotes() {
    html_opts!(
        [extension.FOOTNOTES],
        "What you looking at? [^1]\n\n[^1]: Yeah, I'm talking to you pal.",
        concat!(
            "<p>What you looking at? <sup id=\"fnref1\"><a href=\"#fn1\" rel=\"footnote\">1</a></sup></p>\n",
            "\n",
            "<div class=\"footnotes\">\n",
            "<hr>\n",
            "<ol>\n",
            "\n",
            "<li id=\"fn1\">\n",
            "<p>Yeah, I&#39;m talking to you pal.&nbsp;<a href=\"#fnref1\" rev=\"footnote\">&#8617;</a></p>\n",
            "</li>\n",
            "\n",
            "</ol>\n",
            "</div>\n",
        ),
    );
}

#[test]
fn highlight() {
    html_opts!(
        [extension.HIGHLIGHT],
        "I'm ==special==.",
        "<p>I&#39;m <mark>special</mark>.</p>\n",
    );
}

#[test]
fn lax_spacing() {
    html_opts!(
        [extension.LAX_SPACING],
        "This extension is madness.\n<p>Truly.</p>\n",
        "<p>This extension is madness.</p>\n\n<p>Truly.</p>\n",
    );
}

#[test]
fn no_indented_code() {
    html_opts!(
        [extension.DISABLE_INDENTED_CODE],
        "    $ :(){ :|:& };:",
        "<p>$ :(){ :|:&amp; };:</p>\n",
    );
}

#[test]
fn indented_code_by_default() {
    html(
        "    $ :(){ :|:& };:",
        "<pre><code>$ :(){ :|:&amp; };:\n</code></pre>\n",
    );
}

#[test]
fn no_intra_emphasis() {
    html_opts!(
        [extension.NO_INTRA_EMPHASIS],
        "Sorry,_my_space_key_is_broken.",
        "<p>Sorry,_my_space_key_is_broken.</p>\n",
    );
}

#[test]
fn intra_emphasis_by_default() {
    html(
        "Sorry,_my_space_key_is_broken.",
        "<p>Sorry,<em>my</em>space<em>key</em>is_broken.</p>\n",
    );
}

#[test]
fn quote() {
    html_opts!(
        [extension.QUOTE],
        "\"Air quotes are obnoxious.\"",
        "<p><q>Air quotes are obnoxious.</q></p>\n",
    );
}

#[test]
fn space_headers() {
    html_opts!(
        [extension.SPACE_HEADERS],
        "#Are you listening to me?!",
        "<p>#Are you listening to me?!</p>\n",
    );
    html_opts!(
        [extension.SPACE_HEADERS],
        "# Are you listening to me?!",
        "<h1>Are you listening to me?!</h1>\n",
    );
}

#[test]
fn strikethrough() {
    html_opts!(
        [extension.STRIKETHROUGH],
        "I'm ~~running~~ out of ideas.",
        "<p>I&#39;m <del>running</del> out of ideas.</p>\n",
    );
}

#[test]
fn strikethrough_needs_double_tilde() {
    html_opts!(
        [extension.STRIKETHROUGH],
        "I'm ~running~ out.",
        "<p>I&#39;m ~running~ out.</p>\n",
    );
}

#[test]
fn superscript() {
    html_opts!([extension.SUPERSCRIPT], "^bro", "<p><sup>bro</sup></p>\n");
}

#[test]
fn superscript_parenthesized() {
    html_opts!(
        [extension.SUPERSCRIPT],
        "2^(nd power) up",
        "<p>2<sup>nd power</sup> up</p>\n",
    );
}

#[test]
fn tables() {
    html_opts!(
        [extension.TABLES],
        concat!(
            "|  1  |  2  |  3  |\n",
            "| --- | --- | --- |\n",
            "|  X  |  X  |  O  |\n",
            "|  O  |  O  |  X  |\n",
            "|  X  |  O  |  X  |\n",
        ),
        concat!(
            "<table><thead>\n",
            "<tr>\n",
            "<th>1</th>\n",
            "<th>2</th>\n",
            "<th>3</th>\n",
            "</tr>\n",
            "</thead><tbody>\n",
            "<tr>\n",
            "<td>X</td>\n",
            "<td>X</td>\n",
            "<td>O</td>\n",
            "</tr>\n",
            "<tr>\n",
            "<td>O</td>\n",
            "<td>O</td>\n",
            "<td>X</td>\n",
            "</tr>\n",
            "<tr>\n",
            "<td>X</td>\n",
            "<td>O</td>\n",
            "<td>X</td>\n",
            "</tr>\n",
            "</tbody></table>\n",
        ),
    );
}

#[test]
fn underline() {
    html_opts!(
        [extension.UNDERLINE],
        "What do you _mean_?",
        "<p>What do you <u>mean</u>?</p>\n",
    );
}

#[test]
fn underline_leaves_asterisks_alone() {
    html_opts!(
        [extension.UNDERLINE],
        "What do you *mean*?",
        "<p>What do you <em>mean</em>?</p>\n",
    );
}

#[test]
fn combined() {
    html_opts!(
        [extension.STRIKETHROUGH, extension.HIGHLIGHT, extension.SUPERSCRIPT],
        "~~gone~~ ==lit== x^2",
        "<p><del>gone</del> <mark>lit</mark> x<sup>2</sup></p>\n",
    );
}
