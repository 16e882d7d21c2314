//! The request headline, `METHOD SP TARGET SP VERSION`.
//!
//! The line is kept verbatim and only split when one of its parts is asked
//! for. Splitting is lenient: a headline missing its spaces still yields a
//! method and a target, both falling back to `GET`.

use bytes::Bytes;

/// Fallback returned for the method or target when the headline is too short.
const DEFAULT_TOKEN: &[u8] = b"GET";

/// The first line of a request, stored verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadLine {
    line: Bytes,
}

impl HeadLine {
    pub fn new(line: Bytes) -> Self {
        Self { line }
    }

    /// The raw line without its trailing CRLF.
    pub fn as_bytes(&self) -> &[u8] {
        &self.line
    }

    /// Bytes before the first space, or `GET` when the line has no space.
    pub fn method(&self) -> &[u8] {
        match self.first_space() {
            Some(space) => &self.line[..space],
            None => DEFAULT_TOKEN,
        }
    }

    /// Bytes strictly between the first and the second space, or `GET` when
    /// either space is missing.
    pub fn target(&self) -> &[u8] {
        match self.spaces() {
            Some((first, second)) => &self.line[first + 1..second],
            None => DEFAULT_TOKEN,
        }
    }

    /// Bytes after the second space, if there is one.
    pub fn version(&self) -> Option<&[u8]> {
        self.spaces().map(|(_, second)| &self.line[second + 1..])
    }

    fn first_space(&self) -> Option<usize> {
        self.line.iter().position(|b| *b == b' ')
    }

    fn spaces(&self) -> Option<(usize, usize)> {
        let first = self.first_space()?;
        let second = self.line[first + 1..].iter().position(|b| *b == b' ')? + first + 1;
        Some((first, second))
    }
}

impl From<&'static str> for HeadLine {
    fn from(line: &'static str) -> Self {
        Self::new(Bytes::from_static(line.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_well_formed_line() {
        let head_line = HeadLine::from("POST /upload?id=3 HTTP/1.1");

        assert_eq!(head_line.method(), b"POST");
        assert_eq!(head_line.target(), b"/upload?id=3");
        assert_eq!(head_line.version(), Some(&b"HTTP/1.1"[..]));
    }

    #[test]
    fn line_without_space_defaults_to_get() {
        let head_line = HeadLine::from("BREW");

        assert_eq!(head_line.method(), b"GET");
        assert_eq!(head_line.target(), b"GET");
        assert_eq!(head_line.version(), None);
    }

    #[test]
    fn line_with_single_space_keeps_method() {
        let head_line = HeadLine::from("DELETE /items");

        assert_eq!(head_line.method(), b"DELETE");
        // the target needs a second space to be terminated
        assert_eq!(head_line.target(), b"GET");
        assert_eq!(head_line.version(), None);
    }

    #[test]
    fn adjacent_spaces_give_empty_target() {
        let head_line = HeadLine::from("GET  HTTP/1.1");

        assert_eq!(head_line.method(), b"GET");
        assert_eq!(head_line.target(), b"");
        assert_eq!(head_line.version(), Some(&b"HTTP/1.1"[..]));
    }

    #[test]
    fn empty_line() {
        let head_line = HeadLine::default();

        assert_eq!(head_line.as_bytes(), b"");
        assert_eq!(head_line.method(), b"GET");
        assert_eq!(head_line.target(), b"GET");
    }
}
