use super::*;

#[test]
fn bare_url() {
    html_opts!(
        [extension.AUTOLINK],
        "see https://github.com/ now",
        "<p>see <a href=\"https://github.com/\">https://github.com/</a> now</p>\n",
    );
}

#[test]
fn trailing_punctuation_excluded() {
    html_opts!(
        [extension.AUTOLINK],
        "Visit http://example.org/a.",
        "<p>Visit <a href=\"http://example.org/a\">http://example.org/a</a>.</p>\n",
    );
}

#[test]
fn www() {
    html_opts!(
        [extension.AUTOLINK],
        "go to www.example.org.",
        "<p>go to <a href=\"http://www.example.org\">www.example.org</a>.</p>\n",
    );
}

#[test]
fn email() {
    html_opts!(
        [extension.AUTOLINK],
        "mail me@example.org, ok",
        "<p>mail <a href=\"mailto:me@example.org\">me@example.org</a>, ok</p>\n",
    );
}

#[test]
fn unknown_scheme_is_text() {
    html_opts!(
        [extension.AUTOLINK],
        "gopher://example.org",
        "<p>gopher://example.org</p>\n",
    );
}

#[test]
fn not_inside_link_text() {
    html_opts!(
        [extension.AUTOLINK],
        "[http://a.org](http://b.org)",
        "<p><a href=\"http://b.org\">http://a.org</a></p>\n",
    );
}

#[test]
fn not_inside_code() {
    html_opts!(
        [extension.AUTOLINK],
        "`http://a.org`",
        "<p><code>http://a.org</code></p>\n",
    );
}

#[test]
fn skip_links() {
    html_opts!(
        [extension.AUTOLINK, render.SKIP_LINKS],
        "https://example.org www.example.org",
        "<p>https://example.org www.example.org</p>\n",
    );
}

#[test]
fn safelink_keeps_safe_autolinks() {
    html_opts!(
        [extension.AUTOLINK, render.SAFELINK],
        "https://example.org",
        "<p><a href=\"https://example.org\">https://example.org</a></p>\n",
    );
}
