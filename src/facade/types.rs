//! Typed values carried in and out of façade calls.

use crate::facade::command::format_float;
use bytes::Bytes;
use std::time::Duration;

/// A sorted-set member with its score. Identity is the member alone.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMember {
    pub member: Bytes,
    pub score: f64,
}

impl ScoredMember {
    pub fn new(member: impl Into<Bytes>, score: f64) -> Self {
        Self {
            member: member.into(),
            score,
        }
    }
}

/// The type of value a key holds, as reported by `TYPE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyType {
    String,
    List,
    Set,
    ZSet,
    Hash,
    Stream,
    /// A module type or anything else the store may report.
    Other(String),
}

impl KeyType {
    /// Parses a `TYPE` reply. Returns `None` for `none` (no such key).
    pub fn from_reply(name: &str) -> Option<Self> {
        let kind = match name {
            "none" => return None,
            "string" => KeyType::String,
            "list" => KeyType::List,
            "set" => KeyType::Set,
            "zset" => KeyType::ZSet,
            "hash" => KeyType::Hash,
            "stream" => KeyType::Stream,
            other => KeyType::Other(other.to_string()),
        };
        Some(kind)
    }
}

/// Remaining time to live of an existing key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    NoExpiry,
    ExpiresIn(Duration),
}

/// One end of a score range.
///
/// ```
/// use kvfacade::ScoreBound;
///
/// assert_eq!(ScoreBound::Inclusive(1.5).to_arg(), "1.5");
/// assert_eq!(ScoreBound::Exclusive(3.0).to_arg(), "(3");
/// assert_eq!(ScoreBound::from(f64::NEG_INFINITY).to_arg(), "-inf");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreBound {
    Inclusive(f64),
    Exclusive(f64),
}

impl ScoreBound {
    pub fn to_arg(self) -> String {
        match self {
            ScoreBound::Inclusive(score) => format_float(score),
            ScoreBound::Exclusive(score) => format!("({}", format_float(score)),
        }
    }
}

impl From<f64> for ScoreBound {
    fn from(score: f64) -> Self {
        ScoreBound::Inclusive(score)
    }
}

/// Where `LINSERT` places the new element relative to the pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    Before,
    After,
}

impl InsertPosition {
    pub fn as_arg(self) -> &'static str {
        match self {
            InsertPosition::Before => "BEFORE",
            InsertPosition::After => "AFTER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_arg(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// `LIMIT offset count` for range-by-score queries. A negative count means "all".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit {
    pub offset: i64,
    pub count: i64,
}

impl Limit {
    pub fn new(offset: i64, count: i64) -> Self {
        Self { offset, count }
    }
}
