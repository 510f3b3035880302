//! Incremental RESP Reply Parser
//!
//! The parser reads from a buffer and returns either:
//! - `Ok(Some((value, consumed)))` - Successfully parsed a reply, `consumed` bytes were used
//! - `Ok(None)` - Need more data, the reply is incomplete
//! - `Err(ParseError)` - Invalid protocol data
//!
//! The stream transport appends socket data to a `BytesMut`, calls
//! [`RespParser::parse`], and splits off `consumed` bytes once a whole reply
//! has arrived. Replies from a store are always typed, so unlike a server-side
//! parser there is no inline-command fallback: an unknown prefix is an error.
//!
//! ## Two passes
//!
//! A large reply arrives over many reads. The parser first walks the frame
//! structure without allocating, remembering how far it got, so each read
//! only scans the new bytes. Values are built once, after the last byte of
//! the reply is in the buffer.

use crate::protocol::types::{prefix, RespValue, CRLF};
use bytes::Bytes;
use thiserror::Error;

/// Errors that can occur during RESP parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Unknown type prefix byte
    #[error("unknown type prefix: {0:#04x}")]
    UnknownPrefix(u8),

    /// Invalid integer format
    #[error("invalid integer: {0}")]
    InvalidInteger(String),

    /// Bulk string length is negative (but not -1 for null)
    #[error("invalid bulk string length: {0}")]
    InvalidBulkLength(i64),

    /// Array length is negative (but not -1 for null)
    #[error("invalid array length: {0}")]
    InvalidArrayLength(i64),

    /// Protocol violation (missing CRLF, nesting too deep, etc.)
    #[error("protocol error: {0}")]
    ProtocolError(String),

    /// The reply exceeds maximum allowed size
    #[error("message too large: {size} bytes (max: {max})")]
    MessageTooLarge { size: usize, max: usize },
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Maximum size for a single bulk string (512 MB, same as Redis)
pub const MAX_BULK_SIZE: usize = 512 * 1024 * 1024;

/// Maximum array nesting depth (prevent stack overflow)
pub const MAX_NESTING_DEPTH: usize = 32;

/// An incremental RESP reply parser.
///
/// After `Ok(None)` the next call must pass the same buffer with more data
/// appended; the parser resumes where its scan stopped. A finished or failed
/// reply resets it.
///
/// # Example
///
/// ```
/// use kvfacade::protocol::{RespParser, RespValue};
///
/// let mut parser = RespParser::new();
/// let (value, consumed) = parser.parse(b"*2\r\n$1\r\na\r\n$-1\r\n").unwrap().unwrap();
/// assert_eq!(consumed, 16);
/// assert_eq!(
///     value,
///     RespValue::array(vec![RespValue::bulk_string("a"), RespValue::Null])
/// );
/// ```
#[derive(Debug, Default)]
pub struct RespParser {
    depth: usize,
    /// Bytes of the current reply already framed by `scan`.
    scanned: usize,
    /// Elements still expected by each open array, outermost first.
    open: Vec<i64>,
}

impl RespParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts to parse one complete reply from the front of `buf`.
    pub fn parse(&mut self, buf: &[u8]) -> ParseResult<Option<(RespValue, usize)>> {
        if buf.len() < self.scanned {
            // Not the buffer the previous scan stopped in.
            self.reset();
        }

        let framed = match self.scan(buf) {
            Ok(Some(len)) => len,
            Ok(None) => return Ok(None),
            Err(e) => {
                self.reset();
                return Err(e);
            }
        };
        self.reset();

        self.parse_value(&buf[..framed])
    }

    fn reset(&mut self) {
        self.depth = 0;
        self.scanned = 0;
        self.open.clear();
    }

    /// Walks the frame structure from where the last call stopped.
    ///
    /// Returns the length of the reply once its last byte is buffered.
    fn scan(&mut self, buf: &[u8]) -> ParseResult<Option<usize>> {
        loop {
            while self.open.last() == Some(&0) {
                self.open.pop();
                self.element_done();
            }
            if self.scanned > 0 && self.open.is_empty() {
                return Ok(Some(self.scanned));
            }

            let rest = &buf[self.scanned..];
            let Some(&first) = rest.first() else {
                return Ok(None);
            };
            if self.open.len() > MAX_NESTING_DEPTH {
                return Err(nesting_error());
            }
            check_prefix(first)?;
            let Some((line, header_len)) = read_line(rest) else {
                return Ok(None);
            };

            match first {
                prefix::SIMPLE_STRING | prefix::ERROR => {
                    self.scanned += header_len;
                    self.element_done();
                }
                prefix::INTEGER => {
                    parse_int(line)?;
                    self.scanned += header_len;
                    self.element_done();
                }
                prefix::BULK_STRING => {
                    let total = match bulk_len(parse_int(line)?)? {
                        None => header_len,
                        Some(length) => {
                            let total = header_len + length + 2;
                            if rest.len() < total {
                                return Ok(None);
                            }
                            check_bulk_terminator(&rest[header_len + length..total])?;
                            total
                        }
                    };
                    self.scanned += total;
                    self.element_done();
                }
                _ => {
                    let count = parse_int(line)?;
                    self.scanned += header_len;
                    match count {
                        -1 | 0 => self.element_done(),
                        n if n < 0 => return Err(ParseError::InvalidArrayLength(n)),
                        n => self.open.push(n),
                    }
                }
            }
        }
    }

    fn element_done(&mut self) {
        if let Some(remaining) = self.open.last_mut() {
            *remaining -= 1;
        }
    }

    fn parse_value(&mut self, buf: &[u8]) -> ParseResult<Option<(RespValue, usize)>> {
        let Some(&first) = buf.first() else {
            return Ok(None);
        };

        if self.depth > MAX_NESTING_DEPTH {
            return Err(nesting_error());
        }
        check_prefix(first)?;

        // Every type begins with a header line; only bulk strings and arrays
        // carry anything after it.
        let Some((line, header_len)) = read_line(buf) else {
            return Ok(None);
        };

        match first {
            prefix::SIMPLE_STRING => {
                Ok(Some((RespValue::SimpleString(text(line)), header_len)))
            }
            // Stores echo raw argument bytes in some error texts.
            prefix::ERROR => Ok(Some((RespValue::Error(text(line)), header_len))),
            prefix::INTEGER => Ok(Some((RespValue::Integer(parse_int(line)?), header_len))),
            prefix::BULK_STRING => Self::parse_bulk_body(buf, parse_int(line)?, header_len),
            prefix::ARRAY => self.parse_array_body(buf, parse_int(line)?, header_len),
            other => Err(ParseError::UnknownPrefix(other)),
        }
    }

    /// Parses `<data>\r\n` following a `$<length>\r\n` header.
    fn parse_bulk_body(
        buf: &[u8],
        length: i64,
        header_len: usize,
    ) -> ParseResult<Option<(RespValue, usize)>> {
        let Some(length) = bulk_len(length)? else {
            return Ok(Some((RespValue::Null, header_len)));
        };

        let total = header_len + length + 2;
        if buf.len() < total {
            return Ok(None);
        }
        check_bulk_terminator(&buf[header_len + length..total])?;

        let data = Bytes::copy_from_slice(&buf[header_len..header_len + length]);
        Ok(Some((RespValue::BulkString(data), total)))
    }

    /// Parses `count` nested replies following a `*<count>\r\n` header.
    fn parse_array_body(
        &mut self,
        buf: &[u8],
        count: i64,
        header_len: usize,
    ) -> ParseResult<Option<(RespValue, usize)>> {
        if count == -1 {
            return Ok(Some((RespValue::Null, header_len)));
        }
        if count < 0 {
            return Err(ParseError::InvalidArrayLength(count));
        }

        // Cap the preallocation; a hostile count must not reserve gigabytes.
        let mut elements = Vec::with_capacity((count as usize).min(1024));
        let mut consumed = header_len;

        self.depth += 1;
        for _ in 0..count {
            match self.parse_value(&buf[consumed..])? {
                Some((value, used)) => {
                    elements.push(value);
                    consumed += used;
                }
                None => return Ok(None),
            }
        }
        self.depth -= 1;

        Ok(Some((RespValue::Array(elements), consumed)))
    }
}

fn check_prefix(first: u8) -> ParseResult<()> {
    match first {
        prefix::SIMPLE_STRING
        | prefix::ERROR
        | prefix::INTEGER
        | prefix::BULK_STRING
        | prefix::ARRAY => Ok(()),
        other => Err(ParseError::UnknownPrefix(other)),
    }
}

fn nesting_error() -> ParseError {
    ParseError::ProtocolError(format!(
        "maximum nesting depth exceeded: {}",
        MAX_NESTING_DEPTH
    ))
}

/// Validates a bulk length header. `None` is the null bulk string.
fn bulk_len(length: i64) -> ParseResult<Option<usize>> {
    if length == -1 {
        return Ok(None);
    }
    if length < 0 {
        return Err(ParseError::InvalidBulkLength(length));
    }
    let length = length as usize;
    if length > MAX_BULK_SIZE {
        return Err(ParseError::MessageTooLarge {
            size: length,
            max: MAX_BULK_SIZE,
        });
    }
    Ok(Some(length))
}

fn check_bulk_terminator(tail: &[u8]) -> ParseResult<()> {
    if tail != CRLF {
        return Err(ParseError::ProtocolError(
            "bulk string missing trailing CRLF".to_string(),
        ));
    }
    Ok(())
}

/// Reads the header line after the prefix byte.
///
/// Returns the line content and the number of bytes up to and including CRLF.
fn read_line(buf: &[u8]) -> Option<(&[u8], usize)> {
    find_crlf(&buf[1..]).map(|pos| (&buf[1..1 + pos], 1 + pos + 2))
}

/// Status and error text; invalid UTF-8 is replaced rather than rejected.
fn text(line: &[u8]) -> String {
    String::from_utf8_lossy(line).into_owned()
}

fn parse_int(line: &[u8]) -> ParseResult<i64> {
    let invalid = || ParseError::InvalidInteger(String::from_utf8_lossy(line).into_owned());
    std::str::from_utf8(line)
        .map_err(|_| invalid())?
        .parse()
        .map_err(|_| invalid())
}

/// Finds the position of CRLF in the buffer.
#[inline]
fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == CRLF)
}

/// Parses a single RESP reply from bytes.
pub fn parse_message(buf: &[u8]) -> ParseResult<Option<(RespValue, usize)>> {
    RespParser::new().parse(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_string() {
        let (value, consumed) = parse_message(b"+OK\r\n").unwrap().unwrap();
        assert_eq!(value, RespValue::ok());
        assert_eq!(consumed, 5);
    }

    #[test]
    fn test_parse_incomplete_header() {
        assert!(parse_message(b"+OK").unwrap().is_none());
        assert!(parse_message(b"").unwrap().is_none());
        assert!(parse_message(b"$5\r\nhel").unwrap().is_none());
        assert!(parse_message(b"*2\r\n:1\r\n").unwrap().is_none());
    }

    #[test]
    fn test_parse_wrongtype_error() {
        let input = b"-WRONGTYPE Operation against a key holding the wrong kind of value\r\n";
        let (value, consumed) = parse_message(input).unwrap().unwrap();
        assert_eq!(
            value,
            RespValue::error("WRONGTYPE Operation against a key holding the wrong kind of value")
        );
        assert_eq!(consumed, input.len());
    }

    #[test]
    fn test_parse_integers() {
        assert_eq!(
            parse_message(b":1000\r\n").unwrap().unwrap(),
            (RespValue::Integer(1000), 7)
        );
        assert_eq!(
            parse_message(b":-2\r\n").unwrap().unwrap().0,
            RespValue::Integer(-2)
        );
        assert!(matches!(
            parse_message(b":abc\r\n"),
            Err(ParseError::InvalidInteger(_))
        ));
    }

    #[test]
    fn test_parse_bulk_strings() {
        assert_eq!(
            parse_message(b"$5\r\nhello\r\n").unwrap().unwrap(),
            (RespValue::bulk_string("hello"), 11)
        );
        assert_eq!(
            parse_message(b"$0\r\n\r\n").unwrap().unwrap(),
            (RespValue::bulk_string(""), 6)
        );
        assert_eq!(
            parse_message(b"$-1\r\n").unwrap().unwrap(),
            (RespValue::Null, 5)
        );
    }

    #[test]
    fn test_binary_safe_bulk_string() {
        let (value, _) = parse_message(b"$5\r\nhel\x00o\r\n").unwrap().unwrap();
        assert_eq!(value, RespValue::bulk_string(&b"hel\x00o"[..]));
    }

    #[test]
    fn test_bulk_string_bad_terminator() {
        assert!(matches!(
            parse_message(b"$2\r\nabXY"),
            Err(ParseError::ProtocolError(_))
        ));
        assert!(matches!(
            parse_message(b"$-5\r\n"),
            Err(ParseError::InvalidBulkLength(-5))
        ));
    }

    #[test]
    fn test_parse_mget_style_array() {
        let input = b"*3\r\n$1\r\na\r\n$-1\r\n$1\r\nc\r\n";
        let (value, consumed) = parse_message(input).unwrap().unwrap();
        assert_eq!(consumed, input.len());
        assert_eq!(
            value,
            RespValue::array(vec![
                RespValue::bulk_string("a"),
                RespValue::Null,
                RespValue::bulk_string("c"),
            ])
        );
    }

    #[test]
    fn test_parse_null_and_empty_array() {
        assert_eq!(parse_message(b"*-1\r\n").unwrap().unwrap().0, RespValue::Null);
        assert_eq!(
            parse_message(b"*0\r\n").unwrap().unwrap().0,
            RespValue::array(vec![])
        );
    }

    #[test]
    fn test_parse_nested_array() {
        let input = b"*2\r\n:1\r\n*2\r\n:2\r\n-ERR x\r\n";
        let (value, _) = parse_message(input).unwrap().unwrap();
        assert_eq!(
            value,
            RespValue::array(vec![
                RespValue::Integer(1),
                RespValue::array(vec![RespValue::Integer(2), RespValue::error("ERR x")]),
            ])
        );
    }

    #[test]
    fn test_unknown_prefix_is_rejected() {
        assert_eq!(
            parse_message(b"@oops\r\n"),
            Err(ParseError::UnknownPrefix(b'@'))
        );
    }

    #[test]
    fn test_nesting_limit() {
        let mut input = Vec::new();
        for _ in 0..=MAX_NESTING_DEPTH + 1 {
            input.extend_from_slice(b"*1\r\n");
        }
        input.extend_from_slice(b":1\r\n");
        assert!(matches!(
            parse_message(&input),
            Err(ParseError::ProtocolError(_))
        ));
    }

    #[test]
    fn test_two_replies_in_one_buffer() {
        let input = b":1\r\n+OK\r\n";
        let mut parser = RespParser::new();
        let (first, used) = parser.parse(input).unwrap().unwrap();
        assert_eq!(first, RespValue::Integer(1));
        let (second, _) = parser.parse(&input[used..]).unwrap().unwrap();
        assert_eq!(second, RespValue::ok());
    }

    #[test]
    fn test_serialized_reply_parses_back() {
        let original = RespValue::array(vec![
            RespValue::bulk_string("member"),
            RespValue::bulk_string("1.5"),
        ]);
        let (parsed, _) = parse_message(&original.serialize()).unwrap().unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_error_with_raw_argument_bytes() {
        let input = b"-ERR unknown command 'X', with args beginning with: '\xff' \r\n";
        let (value, consumed) = parse_message(input).unwrap().unwrap();
        assert_eq!(consumed, input.len());
        assert_eq!(
            value,
            RespValue::error("ERR unknown command 'X', with args beginning with: '\u{fffd}' ")
        );
    }

    #[test]
    fn test_reply_fed_in_chunks() {
        let mut elements = Vec::new();
        for i in 0..500 {
            elements.push(RespValue::bulk_string(format!("member:{}", i)));
            elements.push(RespValue::array(vec![RespValue::integer(i), RespValue::Null]));
        }
        let reply = RespValue::array(elements);
        let input = reply.serialize();

        let mut parser = RespParser::new();
        let mut parsed = None;
        for end in (7..input.len()).step_by(7).chain([input.len()]) {
            if let Some(found) = parser.parse(&input[..end]).unwrap() {
                assert_eq!(end, input.len());
                parsed = Some(found);
                break;
            }
        }
        assert_eq!(parsed, Some((reply, input.len())));

        // A finished reply leaves the parser ready for the next one.
        assert_eq!(
            parser.parse(b":5\r\n").unwrap(),
            Some((RespValue::Integer(5), 4))
        );
    }

    #[test]
    fn test_error_resets_scan_state() {
        let mut parser = RespParser::new();
        assert!(parser.parse(b"*2\r\n:1\r\n").unwrap().is_none());
        assert!(parser.parse(b"*2\r\n:1\r\n:x\r\n").is_err());
        assert_eq!(parser.parse(b"+OK\r\n").unwrap(), Some((RespValue::ok(), 5)));
    }
}
