//! Pipe tables: a header row, a separator row of dashes with optional
//! alignment colons, and body rows until the first line without a pipe.

use smallvec::SmallVec;
use tracing::trace;

use crate::buffer::{Buffer, BLOCK_UNIT, SPAN_UNIT};
use crate::ctype::isspace;
use crate::nodes::{CellFlags, Node, TableAlignment};
use crate::parser::inlines::{find_emph_char, is_escaped};
use crate::parser::Parser;

type Alignments = SmallVec<[TableAlignment; 8]>;

/// The header and separator rows of a table.
#[derive(Debug, PartialEq, Eq)]
struct TableHeader {
    /// End of the header row's content, trailing whitespace excluded.
    header_end: usize,
    /// One entry per column.
    aligns: Alignments,
    /// Start of the first body row.
    body_start: usize,
}

impl<'p, 'c> Parser<'p, 'c> {
    /// Parses a table at the start of `data`, returning the bytes consumed.
    pub(crate) fn parse_table(&mut self, ob: &mut Buffer, data: &str) -> Option<usize> {
        let b = data.as_bytes();
        let head = table_header(b)?;
        trace!(columns = head.aligns.len(), "table");

        let mut header = Buffer::with_capacity(SPAN_UNIT);
        self.parse_table_row(&mut header, &data[..head.header_end], &head.aligns, true);

        let mut body = Buffer::with_capacity(BLOCK_UNIT);
        let mut i = head.body_start;
        while i < b.len() {
            let row_start = i;
            let mut pipes = 0;
            while i < b.len() && b[i] != b'\n' {
                if b[i] == b'|' {
                    pipes += 1;
                }
                i += 1;
            }

            if pipes == 0 || i == b.len() {
                i = row_start;
                break;
            }

            self.parse_table_row(&mut body, &data[row_start..i], &head.aligns, false);
            i += 1;
        }

        self.dispatch.render(
            ob,
            Node::Table {
                header: &header,
                body: &body,
            },
        );
        Some(i)
    }

    fn parse_table_row(&mut self, ob: &mut Buffer, data: &str, aligns: &[TableAlignment], header: bool) {
        let b = data.as_bytes();
        let size = b.len();
        let mut row = Buffer::with_capacity(SPAN_UNIT);
        let mut i = 0;
        let mut col = 0;

        if i < size && b[i] == b'|' {
            i += 1;
        }

        while col < aligns.len() && i < size {
            while i < size && isspace(b[i]) {
                i += 1;
            }
            let cell_start = i;

            let len = if i < size && b[i] == b'|' {
                0
            } else {
                match find_emph_char(&b[i..], b'|') {
                    0 => size - i,
                    n => n,
                }
            };
            i += len;

            let mut cell_end = i;
            while cell_end > cell_start && isspace(b[cell_end - 1]) {
                cell_end -= 1;
            }

            let mut cell = Buffer::with_capacity(SPAN_UNIT);
            self.parse_inline(&mut cell, &data[cell_start..cell_end]);
            let flags = CellFlags {
                alignment: aligns[col],
                header,
            };
            self.dispatch.render(
                &mut row,
                Node::TableCell {
                    content: &cell,
                    flags,
                },
            );

            i += 1;
            col += 1;
        }

        for &alignment in &aligns[col..] {
            let flags = CellFlags { alignment, header };
            self.dispatch
                .render(&mut row, Node::TableCell { content: "", flags });
        }

        self.dispatch.render(ob, Node::TableRow { content: &row });
    }
}

/// Recognizes the header and separator rows. The separator needs a cell of
/// at least three dashes, colons included, for every header column.
fn table_header(b: &[u8]) -> Option<TableHeader> {
    let size = b.len();
    let mut i = 0;
    let mut pipes: isize = 0;

    while i < size && b[i] != b'\n' {
        if b[i] == b'|' && !is_escaped(b, i) {
            pipes += 1;
        }
        i += 1;
    }
    if i == size || pipes == 0 {
        return None;
    }

    let mut header_end = i;
    while header_end > 0 && isspace(b[header_end - 1]) {
        header_end -= 1;
    }

    if b[0] == b'|' {
        pipes -= 1;
    }
    if header_end > 0 && b[header_end - 1] == b'|' {
        pipes -= 1;
    }
    if pipes < 0 {
        return None;
    }
    let columns = pipes as usize + 1;

    i += 1;
    if i < size && b[i] == b'|' {
        i += 1;
    }

    let mut under_end = i;
    while under_end < size && b[under_end] != b'\n' {
        under_end += 1;
    }

    let mut aligns = Alignments::with_capacity(columns);
    while aligns.len() < columns && i < under_end {
        let mut dashes = 0;

        while i < under_end && b[i] == b' ' {
            i += 1;
        }

        let left = i < under_end && b[i] == b':';
        if left {
            i += 1;
            dashes += 1;
        }
        while i < under_end && b[i] == b'-' {
            i += 1;
            dashes += 1;
        }
        let right = i < under_end && b[i] == b':';
        if right {
            i += 1;
            dashes += 1;
        }

        while i < under_end && b[i] == b' ' {
            i += 1;
        }

        if i < under_end && b[i] != b'|' && b[i] != b'+' {
            break;
        }
        if dashes < 3 {
            break;
        }

        aligns.push(TableAlignment::from_colons(left, right));
        i += 1;
    }

    if aligns.len() < columns {
        return None;
    }

    Some(TableHeader {
        header_end,
        aligns,
        body_start: (under_end + 1).min(size),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_alignment() {
        let head = table_header(b"| a | b | c |\n|:--|:-:|--:|\n").unwrap();
        assert_eq!(head.header_end, 13);
        assert_eq!(
            head.aligns.as_slice(),
            &[
                TableAlignment::Left,
                TableAlignment::Center,
                TableAlignment::Right
            ]
        );
        assert_eq!(head.body_start, 28);

        let head = table_header(b"a | b\n--- | ---\n").unwrap();
        assert_eq!(head.aligns.len(), 2);
    }

    #[test]
    fn rejects() {
        assert_eq!(table_header(b"no pipes\n---\n"), None);
        assert_eq!(table_header(b"a | b\n--- | x\n"), None);
        assert_eq!(table_header(b"a | b\n-- | --\n"), None);
        assert_eq!(table_header(b"a | b\n---\n"), None);
        assert_eq!(table_header(b"|\n---\n"), None);
        assert_eq!(table_header(b"a \\| b\n---\n"), None);
    }
}
