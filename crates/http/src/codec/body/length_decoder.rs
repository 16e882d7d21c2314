//! Body accumulation for a request with a known content length.

use std::cmp;

use bytes::{Bytes, BytesMut};

/// Collects body bytes until the declared content length is reached.
///
/// Bytes offered past that length are dropped: a connection carries a single
/// request, so there is nothing left to hand them to.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LengthDecoder {
    /// The number of bytes still missing from the body
    remaining: u64,
    body: BytesMut,
}

impl LengthDecoder {
    /// Creates a decoder expecting `length` body bytes.
    pub fn new(length: u64) -> Self {
        Self { remaining: length, body: BytesMut::new() }
    }

    /// Appends the part of `chunk` that still fits the declared length and
    /// returns how many bytes were discarded.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> usize {
        let wanted = usize::try_from(self.remaining).unwrap_or(usize::MAX);
        let take = cmp::min(wanted, chunk.len());

        self.body.extend_from_slice(&chunk[..take]);
        self.remaining -= take as u64;
        chunk.len() - take
    }

    /// Same as [`push_chunk`](Self::push_chunk), reusing `chunk`'s buffer when
    /// the body is still empty.
    pub fn push_buf(&mut self, mut chunk: BytesMut) -> usize {
        if !self.body.is_empty() {
            return self.push_chunk(&chunk);
        }

        let wanted = usize::try_from(self.remaining).unwrap_or(usize::MAX);
        let discarded = chunk.len().saturating_sub(wanted);
        chunk.truncate(wanted);

        self.remaining -= chunk.len() as u64;
        self.body = chunk;
        discarded
    }

    /// True once the declared number of bytes has been collected.
    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }

    /// Body bytes collected so far.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_body(self) -> Bytes {
        self.body.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic() {
        let mut length_decoder = LengthDecoder::new(10);
        let discarded = length_decoder.push_chunk(b"101234567890abcdef\r\n\r\n");

        assert!(length_decoder.is_finished());
        assert_eq!(discarded, 12);
        assert_eq!(length_decoder.body(), b"1012345678");
    }

    #[test]
    fn accumulates_across_chunks() {
        let mut length_decoder = LengthDecoder::new(5);

        assert_eq!(length_decoder.push_chunk(b"ab"), 0);
        assert!(!length_decoder.is_finished());
        assert_eq!(length_decoder.push_chunk(b"cd"), 0);
        assert!(!length_decoder.is_finished());
        assert_eq!(length_decoder.push_chunk(b"efg"), 2);
        assert!(length_decoder.is_finished());

        assert_eq!(&length_decoder.into_body()[..], b"abcde");
    }

    #[test]
    fn zero_length_is_finished_immediately() {
        let mut length_decoder = LengthDecoder::new(0);
        assert!(length_decoder.is_finished());

        assert_eq!(length_decoder.push_chunk(b"extra"), 5);
        assert!(length_decoder.body().is_empty());
    }

    #[test]
    fn push_buf_truncates_in_place() {
        let mut length_decoder = LengthDecoder::new(5);
        let discarded = length_decoder.push_buf(BytesMut::from(&b"12345678"[..]));

        assert_eq!(discarded, 3);
        assert!(length_decoder.is_finished());
        assert_eq!(length_decoder.body(), b"12345");
    }

    #[test]
    fn push_buf_after_push_chunk_appends() {
        let mut length_decoder = LengthDecoder::new(4);
        length_decoder.push_chunk(b"ab");
        length_decoder.push_buf(BytesMut::from(&b"cdef"[..]));

        assert_eq!(length_decoder.body(), b"abcd");
    }
}
