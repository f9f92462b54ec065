use crate::character_set::character_set;
use crate::ctype::{isalnum, isalpha, isspace};
use unicode_categories::UnicodeCategories;

/// What a bare autolink points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutolinkKind {
    /// `https://...`, kept as written.
    Url,
    /// `name@host`, linked through `mailto:`.
    Email,
    /// `www.host`, linked through `http://`.
    Www,
}

/// A bare autolink found around a trigger byte. `start` may lie before the
/// trigger (the scheme before `:`, the local part before `@`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutolinkMatch {
    pub start: usize,
    pub end: usize,
    pub kind: AutolinkKind,
}

const WWW_DELIMS: [bool; 256] = character_set!(b"*_~([");

const LINK_END_ASSORTMENT: [bool; 256] = character_set!(b"?!.,:*_~'\"");

const EMAIL_OK_SET: [bool; 256] = character_set!(b".+-_");

const SCHEMES: [&str; 3] = ["http", "https", "ftp"];

/// `www.` at `i`, preceded by the start of the text, whitespace or an
/// opening delimiter.
pub fn www_match(text: &str, i: usize) -> Option<AutolinkMatch> {
    let data = text.as_bytes();
    if i > 0 && !isspace(data[i - 1]) && !WWW_DELIMS[data[i - 1] as usize] {
        return None;
    }

    if !data[i..].starts_with(b"www.") {
        return None;
    }

    let mut link_end = check_domain(&text[i..])?;

    while i + link_end < data.len() && !isspace(data[i + link_end]) {
        link_end += 1;
    }

    link_end = autolink_delim(&data[i..], link_end);
    if link_end == 0 {
        return None;
    }

    Some(AutolinkMatch {
        start: i,
        end: i + link_end,
        kind: AutolinkKind::Www,
    })
}

/// `scheme://domain...` around the `:` at `i`.
pub fn url_match(text: &str, i: usize) -> Option<AutolinkMatch> {
    let data = text.as_bytes();
    let size = data.len();

    if size - i < 4 || data[i + 1] != b'/' || data[i + 2] != b'/' {
        return None;
    }

    let mut rewind = 0;
    while rewind < i && isalpha(data[i - rewind - 1]) {
        rewind += 1;
    }

    let scheme = &data[i - rewind..i];
    if !SCHEMES.iter().any(|s| scheme.eq_ignore_ascii_case(s.as_bytes())) {
        return None;
    }

    let mut link_end = check_domain(&text[i + 3..])? + 3;

    while link_end < size - i && !isspace(data[i + link_end]) {
        link_end += 1;
    }

    link_end = autolink_delim(&data[i..], link_end);

    Some(AutolinkMatch {
        start: i - rewind,
        end: i + link_end,
        kind: AutolinkKind::Url,
    })
}

/// `local@domain` around the `@` at `i`.
pub fn email_match(text: &str, i: usize) -> Option<AutolinkMatch> {
    let data = text.as_bytes();
    let size = data.len();

    let mut rewind = 0;
    let mut ns = 0;

    while rewind < i {
        let c = data[i - rewind - 1];

        if isalnum(c) || EMAIL_OK_SET[c as usize] {
            rewind += 1;
            continue;
        }

        if c == b'/' {
            ns += 1;
        }

        break;
    }

    if rewind == 0 || ns > 0 {
        return None;
    }

    let mut link_end = 0;
    let mut nb = 0;
    let mut np = 0;

    while link_end < size - i {
        let c = data[i + link_end];

        if isalnum(c) {
            // empty
        } else if c == b'@' {
            nb += 1;
        } else if c == b'.' && link_end < size - i - 1 {
            np += 1;
        } else if c != b'-' && c != b'_' {
            break;
        }

        link_end += 1;
    }

    if link_end < 2
        || nb != 1
        || np == 0
        || (!isalpha(data[i + link_end - 1]) && data[i + link_end - 1] != b'.')
    {
        return None;
    }

    link_end = autolink_delim(&data[i..], link_end);

    Some(AutolinkMatch {
        start: i - rewind,
        end: i + link_end,
        kind: AutolinkKind::Email,
    })
}

/// Length of the host at the start of `data`: it needs at least one dot and
/// no underscores in its last two labels.
fn check_domain(data: &str) -> Option<usize> {
    let mut np = 0;
    let mut uscore1 = 0;
    let mut uscore2 = 0;

    for (i, c) in data.char_indices() {
        if c == '_' {
            uscore2 += 1;
        } else if c == '.' {
            uscore1 = uscore2;
            uscore2 = 0;
            np += 1;
        } else if !is_valid_hostchar(c) && c != '-' {
            if uscore1 == 0 && uscore2 == 0 && np > 0 {
                return Some(i);
            }
            return None;
        }
    }

    if uscore1 == 0 && uscore2 == 0 && np > 0 {
        Some(data.len())
    } else {
        None
    }
}

fn is_valid_hostchar(ch: char) -> bool {
    !ch.is_whitespace() && !ch.is_punctuation()
}

/// Trims trailing punctuation that more likely ends the sentence than the
/// link: `.,:!?` and friends, a dangling entity, or an unbalanced `)`.
fn autolink_delim(data: &[u8], mut link_end: usize) -> usize {
    if let Some(lt) = data[..link_end].iter().position(|&c| c == b'<') {
        link_end = lt;
    }

    while link_end > 0 {
        let cclose = data[link_end - 1];

        if LINK_END_ASSORTMENT[cclose as usize] {
            link_end -= 1;
        } else if cclose == b';' {
            if link_end < 2 {
                link_end -= 1;
                continue;
            }
            let mut new_end = link_end - 2;

            while new_end > 0 && isalpha(data[new_end]) {
                new_end -= 1;
            }

            if new_end < link_end - 2 && data[new_end] == b'&' {
                link_end = new_end;
            } else {
                link_end -= 1;
            }
        } else if cclose == b')' {
            let mut opening = 0;
            let mut closing = 0;
            for &c in &data[..link_end] {
                if c == b'(' {
                    opening += 1;
                } else if c == b')' {
                    closing += 1;
                }
            }

            if closing <= opening {
                break;
            }

            link_end -= 1;
        } else {
            break;
        }
    }

    link_end
}
