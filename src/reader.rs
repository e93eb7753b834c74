//! Netstring decoder.
//!
//! Reads netstring-rendered lines back into elements. A segment followed by
//! the `1:=,` marker and another segment is a field; every other segment is
//! free text.
//!
//! Decoding is exact as long as no free text and no field key is the single
//! byte `=`. Such a segment renders to the marker itself, so free text `=`
//! after another segment reads back as the middle of a field.

use tracing::debug;

use crate::error::{Error, Result};
use crate::message::{Element, Message};
use crate::render::FIELD_MARKER;

/// Reader decodes netstring segments from a byte buffer.
pub struct Reader<'a> {
    buffer: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader from a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            buffer: data,
            pos: 0,
        }
    }

    /// Returns the current position in the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the number of bytes remaining.
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.pos
    }

    /// Returns true if there is more data to read.
    pub fn has_more(&self) -> bool {
        self.pos < self.buffer.len()
    }

    /// Checks if there are enough bytes available.
    fn check_available(&self, needed: usize) -> Result<()> {
        if needed > self.remaining() {
            return Err(Error::unexpected_eof(needed, self.remaining()));
        }
        Ok(())
    }

    /// Consumes `expected` or fails with the byte found instead.
    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        self.check_available(1)?;
        let found = self.buffer[self.pos];
        if found != expected {
            return Err(Error::unexpected_byte(expected, found, self.pos));
        }
        self.pos += 1;
        Ok(())
    }

    /// Reads a decimal length prefix without leading zeros.
    fn read_length(&mut self) -> Result<usize> {
        let start = self.pos;
        let mut length: usize = 0;

        while let Some(&b) = self.buffer.get(self.pos) {
            if !b.is_ascii_digit() {
                break;
            }
            if self.pos > start && self.buffer[start] == b'0' {
                return Err(Error::InvalidLength { position: start });
            }
            length = length
                .checked_mul(10)
                .and_then(|n| n.checked_add((b - b'0') as usize))
                .ok_or(Error::LengthOverflow { position: start })?;
            self.pos += 1;
        }

        if self.pos == start {
            return Err(Error::InvalidLength { position: start });
        }
        Ok(length)
    }

    /// Reads one netstring and returns its payload.
    pub fn read_netstring(&mut self) -> Result<&'a [u8]> {
        let length = self.read_length()?;
        self.expect_byte(b':')?;
        self.check_available(length)?;
        let payload = &self.buffer[self.pos..self.pos + length];
        self.pos += length;
        self.expect_byte(b',')?;
        Ok(payload)
    }

    /// Checks if the field marker is next without consuming it.
    pub fn peek_field_marker(&self) -> bool {
        self.buffer[self.pos..].starts_with(FIELD_MARKER)
    }

    /// Reads one element.
    pub fn read_element(&mut self) -> Result<Element> {
        let first = self.read_netstring()?;
        if !self.peek_field_marker() {
            return Ok(Element::FreeText(first.to_vec()));
        }

        let marker = self.pos;
        self.pos += FIELD_MARKER.len();
        if !self.has_more() {
            return Err(Error::DanglingField { position: marker });
        }
        let value = self.read_netstring()?;
        Ok(Element::Field {
            key: first.to_vec(),
            value: value.to_vec(),
        })
    }

    /// Iterates over raw segments until the input ends or an error occurs.
    pub fn segments(self) -> Segments<'a> {
        Segments {
            reader: self,
            failed: false,
        }
    }
}

/// Iterator over raw netstring payloads, created by [`Reader::segments`].
pub struct Segments<'a> {
    reader: Reader<'a>,
    failed: bool,
}

impl<'a> Iterator for Segments<'a> {
    type Item = Result<&'a [u8]>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || !self.reader.has_more() {
            return None;
        }
        let segment = self.reader.read_netstring();
        self.failed = segment.is_err();
        Some(segment)
    }
}

/// Parses one netstring-rendered line, including its trailing newline.
pub fn parse_netstring(line: &[u8]) -> Result<Message> {
    let body = match line.split_last() {
        Some((&b'\n', body)) => body,
        _ => {
            debug!(bytes = line.len(), "netstring line without trailing newline");
            return Err(Error::MissingNewline);
        }
    };

    let mut reader = Reader::new(body);
    let mut message = Message::new();
    while reader.has_more() {
        match reader.read_element() {
            Ok(element) => message = message.with_element(element),
            Err(err) => {
                debug!(position = reader.position(), error = %err, "rejected netstring line");
                return Err(err);
            }
        }
    }
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_netstring() {
        let mut reader = Reader::new(b"5:hello,0:,");
        assert_eq!(reader.read_netstring().unwrap(), b"hello");
        assert_eq!(reader.position(), 8);
        assert_eq!(reader.read_netstring().unwrap(), b"");
        assert!(!reader.has_more());
    }

    #[test]
    fn test_read_element() {
        let mut reader = Reader::new(b"3:key,1:=,5:value,4:text,");
        assert_eq!(reader.read_element().unwrap(), Element::field("key", "value"));
        assert_eq!(reader.read_element().unwrap(), Element::text("text"));
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_parse_netstring() {
        let message = parse_netstring(b"9:some text,3:key,1:=,5:value,4:okay,1:=,4:True,\n").unwrap();
        assert_eq!(
            message.elements(),
            &[
                Element::text("some text"),
                Element::field("key", "value"),
                Element::field("okay", true),
            ]
        );
        assert!(parse_netstring(b"\n").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_length() {
        assert_eq!(
            Reader::new(b":abc,").read_netstring(),
            Err(Error::InvalidLength { position: 0 })
        );
        assert_eq!(
            Reader::new(b"03:abc,").read_netstring(),
            Err(Error::InvalidLength { position: 0 })
        );
        assert!(matches!(
            Reader::new(b"99999999999999999999999:").read_netstring(),
            Err(Error::LengthOverflow { position: 0 })
        ));
    }

    #[test]
    fn test_framing_errors() {
        assert_eq!(
            Reader::new(b"3;abc,").read_netstring(),
            Err(Error::unexpected_byte(b':', b';', 1))
        );
        assert_eq!(
            Reader::new(b"3:abc.").read_netstring(),
            Err(Error::unexpected_byte(b',', b'.', 5))
        );
        assert_eq!(
            Reader::new(b"10:abc,").read_netstring(),
            Err(Error::unexpected_eof(10, 4))
        );
        assert_eq!(
            Reader::new(b"3").read_netstring(),
            Err(Error::unexpected_eof(1, 0))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_netstring(b"3:abc,"), Err(Error::MissingNewline));
        assert_eq!(parse_netstring(b""), Err(Error::MissingNewline));
        assert_eq!(
            parse_netstring(b"3:key,1:=,\n"),
            Err(Error::DanglingField { position: 6 })
        );
    }

    #[test]
    fn test_equals_key() {
        let message = parse_netstring(b"1:=,1:=,3:abc,\n").unwrap();
        assert_eq!(message.elements(), &[Element::field("=", "abc")]);

        let message = parse_netstring(b"1:=,3:abc,\n").unwrap();
        assert_eq!(message.elements(), &[Element::text("="), Element::text("abc")]);
    }

    #[test]
    fn test_segments() {
        let segments: Vec<_> = Reader::new(b"1:a,2:bc,x").segments().collect();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], Ok(&b"a"[..]));
        assert_eq!(segments[1], Ok(&b"bc"[..]));
        assert!(segments[2].is_err());
    }
}
