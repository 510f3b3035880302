//! In-memory store speaking just enough of the command set to exercise the
//! façade end to end. Replies are built the way a real store builds them,
//! including `WRONGTYPE` errors across value kinds.

use bytes::Bytes;
use kvfacade::{Command, Connection, RespValue, TransportError};
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::future::Future;

const WRONG_TYPE: &str = "WRONGTYPE Operation against a key holding the wrong kind of value";

#[derive(Debug, Clone)]
enum Value {
    Str(Bytes),
    List(VecDeque<Bytes>),
    Hash(Vec<(Bytes, Bytes)>),
    Set(BTreeSet<Bytes>),
    ZSet(Vec<(Bytes, f64)>),
}

#[derive(Debug, Default)]
pub struct FakeStore {
    data: HashMap<Bytes, Value>,
    /// Round trips served so far.
    pub calls: usize,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn execute(&mut self, command: &Command) -> RespValue {
        self.calls += 1;
        let args = command.arguments();
        let name = command.name().to_ascii_uppercase();
        let arity_ok = match name.as_str() {
            "GET" | "TYPE" | "SCARD" | "SMEMBERS" | "INCR" => args.len() == 1,
            "SET" | "GETSET" | "HGET" | "SISMEMBER" | "ZSCORE" | "ZRANK" => args.len() == 2,
            "HSET" => args.len() == 3,
            "MGET" | "DEL" | "EXISTS" => !args.is_empty(),
            "RPUSH" | "LPUSH" | "SADD" => args.len() >= 2,
            "ZADD" => args.len() >= 3 && args.len() % 2 == 1,
            "LRANGE" => args.len() == 3,
            "ZRANGE" => args.len() == 3 || args.len() == 4,
            _ => return RespValue::error(format!("ERR unknown command '{}'", command.name())),
        };
        if !arity_ok {
            return RespValue::error(format!(
                "ERR wrong number of arguments for '{}' command",
                name.to_ascii_lowercase()
            ));
        }

        let result = match name.as_str() {
            "SET" => {
                self.data.insert(args[0].clone(), Value::Str(args[1].clone()));
                Ok(RespValue::ok())
            }
            "GET" => self.string(&args[0]).map(nullable),
            "MGET" => Ok(RespValue::array(
                args.iter()
                    .map(|key| match self.data.get(key) {
                        Some(Value::Str(v)) => RespValue::bulk_string(v.clone()),
                        _ => RespValue::Null,
                    })
                    .collect(),
            )),
            "GETSET" => self.string(&args[0]).map(|old| {
                self.data.insert(args[0].clone(), Value::Str(args[1].clone()));
                nullable(old)
            }),
            "INCR" => self.incr(&args[0]),
            "DEL" => Ok(count(args.iter().filter(|k| self.data.remove(*k).is_some()))),
            "EXISTS" => Ok(count(args.iter().filter(|k| self.data.contains_key(*k)))),
            "TYPE" => Ok(RespValue::simple_string(match self.data.get(&args[0]) {
                None => "none",
                Some(Value::Str(_)) => "string",
                Some(Value::List(_)) => "list",
                Some(Value::Hash(_)) => "hash",
                Some(Value::Set(_)) => "set",
                Some(Value::ZSet(_)) => "zset",
            })),
            "HSET" => self.hset(&args[0], &args[1], &args[2]),
            "HGET" => match self.data.get(&args[0]) {
                None => Ok(RespValue::Null),
                Some(Value::Hash(fields)) => Ok(nullable(
                    fields.iter().find(|(f, _)| f == &args[1]).map(|(_, v)| v.clone()),
                )),
                Some(_) => Err(()),
            },
            "RPUSH" | "LPUSH" => self.push(&args[0], &args[1..], name == "LPUSH"),
            "LRANGE" => self.lrange(&args[0], &args[1], &args[2]),
            "SADD" => self.sadd(&args[0], &args[1..]),
            "SCARD" => match self.data.get(&args[0]) {
                None => Ok(RespValue::integer(0)),
                Some(Value::Set(members)) => Ok(RespValue::integer(members.len() as i64)),
                Some(_) => Err(()),
            },
            "SMEMBERS" => match self.data.get(&args[0]) {
                None => Ok(RespValue::array(vec![])),
                Some(Value::Set(members)) => Ok(bulk_array(members.iter().cloned())),
                Some(_) => Err(()),
            },
            "SISMEMBER" => match self.data.get(&args[0]) {
                None => Ok(RespValue::integer(0)),
                Some(Value::Set(members)) => {
                    Ok(RespValue::integer(members.contains(&args[1]) as i64))
                }
                Some(_) => Err(()),
            },
            "ZADD" => self.zadd(&args[0], &args[1..]),
            "ZSCORE" => self.zset(&args[0]).map(|members| {
                nullable(
                    members
                        .iter()
                        .find(|(m, _)| m == &args[1])
                        .map(|(_, score)| Bytes::from(score.to_string())),
                )
            }),
            "ZRANK" => self.zset(&args[0]).map(|members| {
                match members.iter().position(|(m, _)| m == &args[1]) {
                    Some(rank) => RespValue::integer(rank as i64),
                    None => RespValue::Null,
                }
            }),
            "ZRANGE" => self.zrange(args),
            _ => unreachable!("arity table covers every command"),
        };

        match result {
            Ok(reply) => reply,
            Err(()) => RespValue::error(WRONG_TYPE),
        }
    }

    fn string(&self, key: &Bytes) -> Result<Option<Bytes>, ()> {
        match self.data.get(key) {
            None => Ok(None),
            Some(Value::Str(v)) => Ok(Some(v.clone())),
            Some(_) => Err(()),
        }
    }

    fn incr(&mut self, key: &Bytes) -> Result<RespValue, ()> {
        let current = match self.string(key)? {
            None => 0,
            Some(v) => match std::str::from_utf8(&v).ok().and_then(|s| s.parse::<i64>().ok()) {
                Some(n) => n,
                None => {
                    return Ok(RespValue::error(
                        "ERR value is not an integer or out of range",
                    ))
                }
            },
        };
        let next = current + 1;
        self.data
            .insert(key.clone(), Value::Str(Bytes::from(next.to_string())));
        Ok(RespValue::integer(next))
    }

    fn hset(&mut self, key: &Bytes, field: &Bytes, value: &Bytes) -> Result<RespValue, ()> {
        let entry = self
            .data
            .entry(key.clone())
            .or_insert_with(|| Value::Hash(Vec::new()));
        let Value::Hash(fields) = entry else {
            return Err(());
        };
        match fields.iter_mut().find(|(f, _)| f == field) {
            Some((_, v)) => {
                *v = value.clone();
                Ok(RespValue::integer(0))
            }
            None => {
                fields.push((field.clone(), value.clone()));
                Ok(RespValue::integer(1))
            }
        }
    }

    fn push(&mut self, key: &Bytes, values: &[Bytes], front: bool) -> Result<RespValue, ()> {
        let entry = self
            .data
            .entry(key.clone())
            .or_insert_with(|| Value::List(VecDeque::new()));
        let Value::List(list) = entry else {
            return Err(());
        };
        for value in values {
            if front {
                list.push_front(value.clone());
            } else {
                list.push_back(value.clone());
            }
        }
        Ok(RespValue::integer(list.len() as i64))
    }

    fn lrange(&self, key: &Bytes, start: &Bytes, stop: &Bytes) -> Result<RespValue, ()> {
        let list = match self.data.get(key) {
            None => return Ok(RespValue::array(vec![])),
            Some(Value::List(list)) => list,
            Some(_) => return Err(()),
        };
        let Some((start, stop)) = parse_int(start).zip(parse_int(stop)) else {
            return Ok(RespValue::error("ERR value is not an integer or out of range"));
        };
        Ok(bulk_array(
            window(list.len(), start, stop).map(|i| list[i].clone()),
        ))
    }

    fn sadd(&mut self, key: &Bytes, members: &[Bytes]) -> Result<RespValue, ()> {
        let entry = self
            .data
            .entry(key.clone())
            .or_insert_with(|| Value::Set(BTreeSet::new()));
        let Value::Set(set) = entry else {
            return Err(());
        };
        Ok(count(members.iter().filter(|m| set.insert((*m).clone()))))
    }

    fn zset(&self, key: &Bytes) -> Result<&[(Bytes, f64)], ()> {
        match self.data.get(key) {
            None => Ok(&[][..]),
            Some(Value::ZSet(members)) => Ok(members.as_slice()),
            Some(_) => Err(()),
        }
    }

    fn zadd(&mut self, key: &Bytes, pairs: &[Bytes]) -> Result<RespValue, ()> {
        let mut parsed = Vec::with_capacity(pairs.len() / 2);
        for pair in pairs.chunks(2) {
            match std::str::from_utf8(&pair[0]).ok().and_then(|s| s.parse::<f64>().ok()) {
                Some(score) if !score.is_nan() => parsed.push((pair[1].clone(), score)),
                _ => return Ok(RespValue::error("ERR value is not a valid float")),
            }
        }

        let entry = self
            .data
            .entry(key.clone())
            .or_insert_with(|| Value::ZSet(Vec::new()));
        let Value::ZSet(members) = entry else {
            return Err(());
        };
        let mut added = 0;
        for (member, score) in parsed {
            match members.iter_mut().find(|(m, _)| *m == member) {
                Some((_, s)) => *s = score,
                None => {
                    members.push((member, score));
                    added += 1;
                }
            }
        }
        members.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        Ok(RespValue::integer(added))
    }

    fn zrange(&self, args: &[Bytes]) -> Result<RespValue, ()> {
        let members = self.zset(&args[0])?;
        let Some((start, stop)) = parse_int(&args[1]).zip(parse_int(&args[2])) else {
            return Ok(RespValue::error("ERR value is not an integer or out of range"));
        };
        let with_scores = match args.get(3) {
            None => false,
            Some(flag) if flag.eq_ignore_ascii_case(b"WITHSCORES") => true,
            Some(_) => return Ok(RespValue::error("ERR syntax error")),
        };
        let mut out = Vec::new();
        for i in window(members.len(), start, stop) {
            let (member, score) = &members[i];
            out.push(RespValue::bulk_string(member.clone()));
            if with_scores {
                out.push(RespValue::bulk_string(Bytes::from(score.to_string())));
            }
        }
        Ok(RespValue::array(out))
    }
}

impl Connection for FakeStore {
    fn send(
        &mut self,
        command: &Command,
    ) -> impl Future<Output = Result<RespValue, TransportError>> + Send {
        let reply = self.execute(command);
        async move { Ok(reply) }
    }
}

fn nullable(value: Option<Bytes>) -> RespValue {
    value.map_or(RespValue::Null, RespValue::bulk_string)
}

fn count<I: Iterator>(items: I) -> RespValue {
    RespValue::integer(items.count() as i64)
}

fn bulk_array(items: impl Iterator<Item = Bytes>) -> RespValue {
    RespValue::array(items.map(RespValue::bulk_string).collect())
}

fn parse_int(arg: &Bytes) -> Option<i64> {
    std::str::from_utf8(arg).ok()?.parse().ok()
}

/// Inclusive index window with negative indices counted from the tail.
fn window(len: usize, start: i64, stop: i64) -> std::ops::Range<usize> {
    let len = len as i64;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
    if start > stop || start >= len {
        0..0
    } else {
        start as usize..stop as usize + 1
    }
}
