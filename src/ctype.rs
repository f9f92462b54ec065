//! Byte classification helpers. Every structural character in Markdown is
//! ASCII, so the scanners work on bytes and only slice the `&str` at ASCII
//! positions.

use crate::character_set::character_set;

const SPACE: [bool; 256] = character_set!(b" \t\n\r\x0b\x0c");

const PUNCT: [bool; 256] = character_set!(b"!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~");

#[inline]
pub fn isspace(ch: u8) -> bool {
    SPACE[ch as usize]
}

#[inline]
pub fn ispunct(ch: u8) -> bool {
    PUNCT[ch as usize]
}

#[inline]
pub fn isdigit(ch: u8) -> bool {
    ch.is_ascii_digit()
}

#[inline]
pub fn isxdigit(ch: u8) -> bool {
    ch.is_ascii_hexdigit()
}

#[inline]
pub fn isalpha(ch: u8) -> bool {
    ch.is_ascii_alphabetic()
}

#[inline]
pub fn isalnum(ch: u8) -> bool {
    ch.is_ascii_alphanumeric()
}
