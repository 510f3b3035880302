//! Outgoing command representation.
//!
//! A [`Command`] is a command name with its ordered byte-string arguments.
//! On the wire it is a RESP array of bulk strings, which is the only request
//! form a store accepts from a client.

use crate::protocol::types::{prefix, write_bulk, CRLF};
use crate::protocol::RespValue;
use bytes::Bytes;
use std::borrow::Cow;
use std::time::Duration;

/// A single store command ready to be sent.
///
/// # Example
///
/// ```
/// use kvfacade::Command;
///
/// let cmd = Command::new("SET").arg("name").arg("Ariz");
/// assert_eq!(cmd.serialize(), b"*3\r\n$3\r\nSET\r\n$4\r\nname\r\n$4\r\nAriz\r\n");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    name: Cow<'static, str>,
    args: Vec<Bytes>,
    /// Server-side blocking window for `BLPOP`-style commands.
    block: Option<Duration>,
}

impl Command {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            block: None,
        }
    }

    /// Appends one binary-safe argument.
    pub fn arg(mut self, arg: impl AsRef<[u8]>) -> Self {
        self.args.push(Bytes::copy_from_slice(arg.as_ref()));
        self
    }

    /// Appends every item of `args` in order.
    pub fn args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        self.args
            .extend(args.into_iter().map(|a| Bytes::copy_from_slice(a.as_ref())));
        self
    }

    pub fn arg_int(self, n: i64) -> Self {
        self.arg(n.to_string())
    }

    /// Appends a float in the form the store parses back bit-for-bit.
    ///
    /// Rust's shortest round-trip formatting is used; infinities become
    /// `+inf` / `-inf`.
    pub fn arg_float(self, f: f64) -> Self {
        self.arg(format_float(f))
    }

    /// Marks the command as one that may block on the server for `timeout`.
    pub fn blocking(mut self, timeout: Duration) -> Self {
        self.block = Some(timeout);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &[Bytes] {
        &self.args
    }

    pub fn block_for(&self) -> Option<Duration> {
        self.block
    }

    /// Serializes the command as a RESP array of bulk strings.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.serialize_into(&mut buf);
        buf
    }

    pub fn serialize_into(&self, buf: &mut Vec<u8>) {
        buf.push(prefix::ARRAY);
        buf.extend_from_slice((self.args.len() + 1).to_string().as_bytes());
        buf.extend_from_slice(CRLF);
        write_bulk(buf, self.name.as_bytes());
        for arg in &self.args {
            write_bulk(buf, arg);
        }
    }

    /// The command as a `RespValue` array.
    pub fn to_resp(&self) -> RespValue {
        let mut parts = Vec::with_capacity(self.args.len() + 1);
        parts.push(RespValue::bulk_string(Bytes::copy_from_slice(
            self.name.as_bytes(),
        )));
        parts.extend(self.args.iter().cloned().map(RespValue::BulkString));
        RespValue::Array(parts)
    }
}

pub(crate) fn format_float(f: f64) -> String {
    if f == f64::INFINITY {
        "+inf".to_string()
    } else if f == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        f.to_string()
    }
}
