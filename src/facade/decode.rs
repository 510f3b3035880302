//! Reply Decoder
//!
//! A [`ReplyPolicy`] turns one raw reply into a [`CommandOutcome`]. Every
//! policy is total: error replies go through the classifier, and any shape a
//! policy does not expect becomes `StoreError` naming what arrived.
//!
//! | Policy | Success | nil |
//! |---|---|---|
//! | [`Bool01`] | `:0` / `:1` | StoreError |
//! | [`IntOrWrongType`] | integer | WrongType |
//! | [`IntOrMissing`] | integer | KeyMissing |
//! | [`BulkOrMissing`] | bulk | KeyMissing |
//! | [`ArrayOfBulkOrMissing`] | array of bulk/nil, length kept | StoreError |
//! | [`FloatOrMissing`] | bulk float | KeyMissing |
//! | [`Status`] | `+OK` | `false` |
//! | [`BulkArray`] | array of bulk | StoreError |
//! | [`PairArray`] | flat `[k, v, ...]` | StoreError |
//! | [`ScoredArray`] | flat `[member, score, ...]` | StoreError |
//! | [`KeyedBulk`] | `[key, value]` | KeyMissing |
//! | [`TypeName`] | status type name (`none` is KeyMissing) | StoreError |
//! | [`TtlSeconds`] / [`TtlMillis`] | `-1` NoExpiry, `>= 0` ExpiresIn (`-2` is KeyMissing) | StoreError |
//! | [`Raw`] | anything | nil |

use crate::facade::classify::error_outcome;
use crate::facade::types::{KeyType, ScoredMember, Ttl};
use crate::facade::CommandOutcome;
use crate::protocol::RespValue;
use bytes::Bytes;
use std::time::Duration;

/// How a command's raw reply maps to a typed outcome.
pub trait ReplyPolicy {
    type Output;

    /// Policy name, used in diagnostics.
    const NAME: &'static str;

    /// Decodes a reply already known not to be an error.
    fn decode_value(reply: RespValue) -> CommandOutcome<Self::Output>;

    fn decode(reply: RespValue) -> CommandOutcome<Self::Output> {
        match reply {
            RespValue::Error(message) => error_outcome(message),
            other => Self::decode_value(other),
        }
    }
}

fn unexpected<T>(policy: &str, reply: &RespValue) -> CommandOutcome<T> {
    CommandOutcome::StoreError(format!(
        "unexpected {} reply for {} policy",
        reply.kind(),
        policy
    ))
}

fn parse_float(data: &[u8]) -> Option<f64> {
    std::str::from_utf8(data).ok()?.parse().ok()
}

/// Collects an array whose elements must all be bulk strings.
fn bulk_elements(policy: &str, reply: RespValue) -> CommandOutcome<Vec<Bytes>> {
    let elements = match reply {
        RespValue::Array(elements) => elements,
        other => return unexpected(policy, &other),
    };

    let mut out = Vec::with_capacity(elements.len());
    for element in elements {
        match element {
            RespValue::BulkString(data) => out.push(data),
            other => return unexpected(policy, &other),
        }
    }
    CommandOutcome::Success(out)
}

/// Splits a flat array into consecutive pairs.
fn pairs(policy: &str, reply: RespValue) -> CommandOutcome<Vec<(Bytes, Bytes)>> {
    bulk_elements(policy, reply).and_then(|flat| {
        if flat.len() % 2 != 0 {
            return CommandOutcome::StoreError(format!(
                "odd-length array ({}) for {} policy",
                flat.len(),
                policy
            ));
        }
        let mut out = Vec::with_capacity(flat.len() / 2);
        let mut iter = flat.into_iter();
        while let (Some(first), Some(second)) = (iter.next(), iter.next()) {
            out.push((first, second));
        }
        CommandOutcome::Success(out)
    })
}

/// `:0` → false, `:1` → true.
pub struct Bool01;

impl ReplyPolicy for Bool01 {
    type Output = bool;
    const NAME: &'static str = "Bool01";

    fn decode_value(reply: RespValue) -> CommandOutcome<bool> {
        match reply {
            RespValue::Integer(0) => CommandOutcome::Success(false),
            RespValue::Integer(1) => CommandOutcome::Success(true),
            RespValue::Integer(n) => {
                CommandOutcome::StoreError(format!("expected 0 or 1, got integer {}", n))
            }
            other => unexpected(Self::NAME, &other),
        }
    }
}

/// Integer counts and lengths. A nil takes the place of a type mismatch.
pub struct IntOrWrongType;

impl ReplyPolicy for IntOrWrongType {
    type Output = i64;
    const NAME: &'static str = "IntOrWrongType";

    fn decode_value(reply: RespValue) -> CommandOutcome<i64> {
        match reply {
            RespValue::Integer(n) => CommandOutcome::Success(n),
            RespValue::Null => CommandOutcome::WrongType,
            other => unexpected(Self::NAME, &other),
        }
    }
}

/// Integer lookups such as ranks, where nil means the member is absent.
pub struct IntOrMissing;

impl ReplyPolicy for IntOrMissing {
    type Output = i64;
    const NAME: &'static str = "IntOrMissing";

    fn decode_value(reply: RespValue) -> CommandOutcome<i64> {
        match reply {
            RespValue::Integer(n) => CommandOutcome::Success(n),
            RespValue::Null => CommandOutcome::KeyMissing,
            other => unexpected(Self::NAME, &other),
        }
    }
}

pub struct BulkOrMissing;

impl ReplyPolicy for BulkOrMissing {
    type Output = Bytes;
    const NAME: &'static str = "BulkOrMissing";

    fn decode_value(reply: RespValue) -> CommandOutcome<Bytes> {
        match reply {
            RespValue::BulkString(data) => CommandOutcome::Success(data),
            RespValue::Null => CommandOutcome::KeyMissing,
            other => unexpected(Self::NAME, &other),
        }
    }
}

/// Multi-get replies. Absent elements stay in place as `None`.
pub struct ArrayOfBulkOrMissing;

impl ReplyPolicy for ArrayOfBulkOrMissing {
    type Output = Vec<Option<Bytes>>;
    const NAME: &'static str = "ArrayOfBulkOrMissing";

    fn decode_value(reply: RespValue) -> CommandOutcome<Vec<Option<Bytes>>> {
        let elements = match reply {
            RespValue::Array(elements) => elements,
            other => return unexpected(Self::NAME, &other),
        };

        let mut out = Vec::with_capacity(elements.len());
        for element in elements {
            match element {
                RespValue::BulkString(data) => out.push(Some(data)),
                RespValue::Null => out.push(None),
                other => return unexpected(Self::NAME, &other),
            }
        }
        CommandOutcome::Success(out)
    }
}

pub struct FloatOrMissing;

impl ReplyPolicy for FloatOrMissing {
    type Output = f64;
    const NAME: &'static str = "FloatOrMissing";

    fn decode_value(reply: RespValue) -> CommandOutcome<f64> {
        match reply {
            RespValue::BulkString(data) => match parse_float(&data) {
                Some(score) => CommandOutcome::Success(score),
                None => CommandOutcome::StoreError(format!(
                    "not a float: {:?}",
                    String::from_utf8_lossy(&data)
                )),
            },
            RespValue::Null => CommandOutcome::KeyMissing,
            other => unexpected(Self::NAME, &other),
        }
    }
}

/// `+OK` → true. A nil (conditional write not performed) → false.
pub struct Status;

impl ReplyPolicy for Status {
    type Output = bool;
    const NAME: &'static str = "Status";

    fn decode_value(reply: RespValue) -> CommandOutcome<bool> {
        match reply {
            RespValue::SimpleString(s) if s == "OK" => CommandOutcome::Success(true),
            RespValue::Null => CommandOutcome::Success(false),
            other => unexpected(Self::NAME, &other),
        }
    }
}

/// Arrays of members, keys or values. An inverted range is simply `[]`.
pub struct BulkArray;

impl ReplyPolicy for BulkArray {
    type Output = Vec<Bytes>;
    const NAME: &'static str = "BulkArray";

    fn decode_value(reply: RespValue) -> CommandOutcome<Vec<Bytes>> {
        bulk_elements(Self::NAME, reply)
    }
}

/// Flat field/value arrays such as `HGETALL`.
pub struct PairArray;

impl ReplyPolicy for PairArray {
    type Output = Vec<(Bytes, Bytes)>;
    const NAME: &'static str = "PairArray";

    fn decode_value(reply: RespValue) -> CommandOutcome<Vec<(Bytes, Bytes)>> {
        pairs(Self::NAME, reply)
    }
}

/// `WITHSCORES` replies.
pub struct ScoredArray;

impl ReplyPolicy for ScoredArray {
    type Output = Vec<ScoredMember>;
    const NAME: &'static str = "ScoredArray";

    fn decode_value(reply: RespValue) -> CommandOutcome<Vec<ScoredMember>> {
        pairs(Self::NAME, reply).and_then(|flat| {
            let mut out = Vec::with_capacity(flat.len());
            for (member, score) in flat {
                match parse_float(&score) {
                    Some(score) => out.push(ScoredMember { member, score }),
                    None => {
                        return CommandOutcome::StoreError(format!(
                            "not a float: {:?}",
                            String::from_utf8_lossy(&score)
                        ))
                    }
                }
            }
            CommandOutcome::Success(out)
        })
    }
}

/// Blocking pops: `[key, value]`, or nil when the window elapsed.
pub struct KeyedBulk;

impl ReplyPolicy for KeyedBulk {
    type Output = (Bytes, Bytes);
    const NAME: &'static str = "KeyedBulk";

    fn decode_value(reply: RespValue) -> CommandOutcome<(Bytes, Bytes)> {
        if reply.is_null() {
            return CommandOutcome::KeyMissing;
        }
        pairs(Self::NAME, reply).and_then(|mut found| match (found.pop(), found.is_empty()) {
            (Some(pair), true) => CommandOutcome::Success(pair),
            _ => CommandOutcome::StoreError("expected exactly [key, value]".to_string()),
        })
    }
}

pub struct TypeName;

impl ReplyPolicy for TypeName {
    type Output = KeyType;
    const NAME: &'static str = "TypeName";

    fn decode_value(reply: RespValue) -> CommandOutcome<KeyType> {
        match reply {
            RespValue::SimpleString(name) => match KeyType::from_reply(&name) {
                Some(kind) => CommandOutcome::Success(kind),
                None => CommandOutcome::KeyMissing,
            },
            other => unexpected(Self::NAME, &other),
        }
    }
}

fn decode_ttl(policy: &str, reply: RespValue, unit: fn(u64) -> Duration) -> CommandOutcome<Ttl> {
    match reply {
        RespValue::Integer(-2) => CommandOutcome::KeyMissing,
        RespValue::Integer(-1) => CommandOutcome::Success(Ttl::NoExpiry),
        RespValue::Integer(n) if n >= 0 => CommandOutcome::Success(Ttl::ExpiresIn(unit(n as u64))),
        RespValue::Integer(n) => CommandOutcome::StoreError(format!("invalid ttl {}", n)),
        other => unexpected(policy, &other),
    }
}

/// `TTL` replies.
pub struct TtlSeconds;

impl ReplyPolicy for TtlSeconds {
    type Output = Ttl;
    const NAME: &'static str = "TtlSeconds";

    fn decode_value(reply: RespValue) -> CommandOutcome<Ttl> {
        decode_ttl(Self::NAME, reply, Duration::from_secs)
    }
}

/// `PTTL` replies.
pub struct TtlMillis;

impl ReplyPolicy for TtlMillis {
    type Output = Ttl;
    const NAME: &'static str = "TtlMillis";

    fn decode_value(reply: RespValue) -> CommandOutcome<Ttl> {
        decode_ttl(Self::NAME, reply, Duration::from_millis)
    }
}

/// Passes the reply through; only error replies are interpreted.
pub struct Raw;

impl ReplyPolicy for Raw {
    type Output = RespValue;
    const NAME: &'static str = "Raw";

    fn decode_value(reply: RespValue) -> CommandOutcome<RespValue> {
        CommandOutcome::Success(reply)
    }
}
