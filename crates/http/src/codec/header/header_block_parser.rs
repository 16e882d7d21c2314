//! Incremental parser for the request header block.
//!
//! Bytes are accumulated until the `\r\n\r\n` delimiter shows up. At that
//! point the block is split into the headline and field lines, and whatever
//! followed the delimiter in the same chunks is kept as the first part of
//! the body.
//!
//! Parsing is lenient on purpose: a field line without a `": "` separator is
//! skipped, never reported.

use bytes::{Buf, Bytes, BytesMut};
use tracing::trace;

use crate::protocol::{HeadLine, HeaderFields};

const DELIMITER: &[u8] = b"\r\n\r\n";
const LINE_END: &[u8] = b"\r\n";
const FIELD_SEPARATOR: &[u8] = b": ";

/// Accumulates header bytes across chunks and splits them once complete.
#[derive(Debug, Default)]
pub struct HeaderBlockParser {
    /// Header bytes received so far, only grows until the block is complete
    buf: BytesMut,
    /// The header block without the delimiter, set once complete
    raw: Bytes,
    head_line: HeadLine,
    fields: HeaderFields,
    /// Bytes read past the delimiter
    body: BytesMut,
    finished: bool,
}

impl HeaderBlockParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `chunk` to the header buffer and checks for the end of the
    /// block.
    ///
    /// Does nothing once the header block is complete; later bytes belong to
    /// the body and must be routed there by the caller.
    pub fn push_chunk(&mut self, chunk: &[u8]) {
        if self.finished {
            return;
        }

        // the delimiter may straddle the previous chunk and this one
        let scan_from = self.buf.len().saturating_sub(DELIMITER.len() - 1);
        self.buf.extend_from_slice(chunk);

        let Some(offset) = find(&self.buf[scan_from..], DELIMITER) else {
            trace!(buffered = self.buf.len(), "header block incomplete");
            return;
        };

        let header_len = scan_from + offset;
        self.raw = self.buf.split_to(header_len).freeze();
        self.buf.advance(DELIMITER.len());
        self.body = self.buf.split();
        self.finished = true;

        trace!(header_len, carried_body = self.body.len(), "header block complete");
        self.extract_fields();
    }

    fn extract_fields(&mut self) {
        let mut lines = split_lines(self.raw.clone());

        if let Some(line) = lines.next() {
            self.head_line = HeadLine::new(line);
        }

        for line in lines {
            let Some(separator) = find(&line, FIELD_SEPARATOR) else {
                trace!(line = ?line, "skip header line without separator");
                continue;
            };
            let value = line.slice(separator + FIELD_SEPARATOR.len()..);
            self.fields.insert(&line[..separator], value);
        }
    }

    /// True once the `\r\n\r\n` delimiter has been seen.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn head_line(&self) -> &HeadLine {
        &self.head_line
    }

    pub fn headers(&self) -> &HeaderFields {
        &self.fields
    }

    /// The complete header block without its delimiter, empty until finished.
    pub fn headers_raw(&self) -> &Bytes {
        &self.raw
    }

    /// Bytes that arrived after the delimiter.
    pub fn body(&self) -> &BytesMut {
        &self.body
    }

    /// Takes the bytes that arrived after the delimiter, leaving nothing
    /// behind.
    pub fn take_body(&mut self) -> BytesMut {
        self.body.split()
    }

    /// Consumes the parser, returning its headline, fields and raw block.
    pub fn into_parts(self) -> (HeadLine, HeaderFields, Bytes) {
        (self.head_line, self.fields, self.raw)
    }
}

/// Returns the offset of the first occurrence of `needle` in `haystack`.
fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}

/// Splits `block` on CRLF without copying.
fn split_lines(block: Bytes) -> impl Iterator<Item = Bytes> {
    let mut rest = Some(block);
    std::iter::from_fn(move || {
        let current = rest.take()?;
        match find(&current, LINE_END) {
            Some(end) => {
                rest = Some(current.slice(end + LINE_END.len()..));
                Some(current.slice(..end))
            }
            None => Some(current),
        }
    })
}
