//! The append-only output accumulator every rendering step writes into.

use std::fmt;
use std::ops::Deref;

/// Initial capacity for block-level work buffers.
pub const BLOCK_UNIT: usize = 256;
/// Initial capacity for span-level work buffers.
pub const SPAN_UNIT: usize = 64;

/// A growable text buffer.
///
/// Appends grow the allocation geometrically, so a sequence of `n` appends
/// costs amortized O(n) in total. The accumulated text is readable at any
/// point through [`Buffer::as_str`] (or deref), and the buffer can be cut
/// back with [`Buffer::truncate`].
#[derive(Default, Clone, PartialEq, Eq)]
pub struct Buffer {
    data: String,
}

impl Buffer {
    /// Creates an empty buffer able to hold `unit` bytes before reallocating.
    pub fn with_capacity(unit: usize) -> Self {
        Buffer {
            data: String::with_capacity(unit),
        }
    }

    /// Appends `s`.
    pub fn put(&mut self, s: &str) {
        self.grow(s.len());
        self.data.push_str(s);
    }

    /// Appends a single character.
    pub fn putc(&mut self, c: char) {
        self.grow(c.len_utf8());
        self.data.push(c);
    }

    fn grow(&mut self, extra: usize) {
        let needed = self.data.len() + extra;
        if needed > self.data.capacity() {
            let target = needed.max(self.data.capacity() * 2);
            self.data.reserve(target - self.data.len());
        }
    }

    pub fn as_str(&self) -> &str {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Cuts the buffer back to `len` bytes. `len` must fall on a character
    /// boundary; lengths past the end are ignored.
    pub fn truncate(&mut self, len: usize) {
        if len < self.data.len() {
            self.data.truncate(len);
        }
    }

    /// Removes trailing ASCII spaces.
    pub fn trim_end_spaces(&mut self) {
        let keep = self.data.trim_end_matches(' ').len();
        self.data.truncate(keep);
    }

    pub fn into_string(self) -> String {
        self.data
    }
}

impl Deref for Buffer {
    type Target = str;

    fn deref(&self) -> &str {
        &self.data
    }
}

impl fmt::Write for Buffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.put(s);
        Ok(())
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.data, f)
    }
}

impl From<Buffer> for String {
    fn from(b: Buffer) -> String {
        b.data
    }
}
