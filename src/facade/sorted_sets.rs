//! Sorted-set commands.
//!
//! Scores travel in Rust's shortest round-trip float form, so a score read
//! back with `zscore` is bit-identical to the one written.

use crate::connection::Connection;
use crate::facade::decode::{BulkArray, FloatOrMissing, IntOrMissing, IntOrWrongType, ScoredArray};
use crate::facade::types::{Limit, ScoreBound, ScoredMember};
use crate::facade::{Command, CommandOutcome, KvFacade};
use bytes::Bytes;

fn score_range(
    name: &'static str,
    key: impl AsRef<[u8]>,
    first: ScoreBound,
    second: ScoreBound,
    with_scores: bool,
    limit: Option<Limit>,
) -> Command {
    let mut command = Command::new(name)
        .arg(key)
        .arg(first.to_arg())
        .arg(second.to_arg());
    if with_scores {
        command = command.arg("WITHSCORES");
    }
    if let Some(limit) = limit {
        command = command
            .arg("LIMIT")
            .arg_int(limit.offset)
            .arg_int(limit.count);
    }
    command
}

fn index_range(name: &'static str, key: impl AsRef<[u8]>, start: i64, stop: i64) -> Command {
    Command::new(name).arg(key).arg_int(start).arg_int(stop)
}

/// `ZINTERSTORE` / `ZUNIONSTORE` carry the source count before the keys.
fn store_op<K: AsRef<[u8]>>(
    name: &'static str,
    destination: impl AsRef<[u8]>,
    keys: &[K],
) -> Command {
    Command::new(name)
        .arg(destination)
        .arg(keys.len().to_string())
        .args(keys)
}

impl<C: Connection> KvFacade<C> {
    /// `ZADD key score member`: 1 if the member is new, 0 if only its score changed.
    pub async fn zadd(
        &mut self,
        key: impl AsRef<[u8]>,
        score: f64,
        member: impl AsRef<[u8]>,
    ) -> CommandOutcome<i64> {
        self.run::<IntOrWrongType>(Command::new("ZADD").arg(key).arg_float(score).arg(member))
            .await
    }

    /// `ZADD key score member [score member ...]`: how many members are new.
    pub async fn zadd_multi(
        &mut self,
        key: impl AsRef<[u8]>,
        members: &[ScoredMember],
    ) -> CommandOutcome<i64> {
        let command = members.iter().fold(Command::new("ZADD").arg(key), |cmd, m| {
            cmd.arg_float(m.score).arg(&m.member)
        });
        self.run_variadic::<IntOrWrongType>(command, members.len())
            .await
    }

    /// `ZREM key member [member ...]`
    pub async fn zrem<M: AsRef<[u8]>>(
        &mut self,
        key: impl AsRef<[u8]>,
        members: &[M],
    ) -> CommandOutcome<i64> {
        let command = Command::new("ZREM").arg(key).args(members);
        self.run_variadic::<IntOrWrongType>(command, members.len())
            .await
    }

    pub async fn zcard(&mut self, key: impl AsRef<[u8]>) -> CommandOutcome<i64> {
        self.run::<IntOrWrongType>(Command::new("ZCARD").arg(key)).await
    }

    /// `ZCOUNT key min max`
    pub async fn zcount(
        &mut self,
        key: impl AsRef<[u8]>,
        min: impl Into<ScoreBound>,
        max: impl Into<ScoreBound>,
    ) -> CommandOutcome<i64> {
        let command = Command::new("ZCOUNT")
            .arg(key)
            .arg(min.into().to_arg())
            .arg(max.into().to_arg());
        self.run::<IntOrWrongType>(command).await
    }

    /// `ZSCORE key member`; `KeyMissing` when the member or key is absent.
    pub async fn zscore(
        &mut self,
        key: impl AsRef<[u8]>,
        member: impl AsRef<[u8]>,
    ) -> CommandOutcome<f64> {
        self.run::<FloatOrMissing>(Command::new("ZSCORE").arg(key).arg(member))
            .await
    }

    /// `ZINCRBY key increment member`: the new score.
    pub async fn zincr_by(
        &mut self,
        key: impl AsRef<[u8]>,
        member: impl AsRef<[u8]>,
        increment: f64,
    ) -> CommandOutcome<f64> {
        self.run::<FloatOrMissing>(
            Command::new("ZINCRBY")
                .arg(key)
                .arg_float(increment)
                .arg(member),
        )
        .await
    }

    /// `ZRANGE key start stop` by rank, ascending.
    pub async fn zrange(
        &mut self,
        key: impl AsRef<[u8]>,
        start: i64,
        stop: i64,
    ) -> CommandOutcome<Vec<Bytes>> {
        self.run::<BulkArray>(index_range("ZRANGE", key, start, stop))
            .await
    }

    pub async fn zrange_with_scores(
        &mut self,
        key: impl AsRef<[u8]>,
        start: i64,
        stop: i64,
    ) -> CommandOutcome<Vec<ScoredMember>> {
        let command = index_range("ZRANGE", key, start, stop).arg("WITHSCORES");
        self.run::<ScoredArray>(command).await
    }

    /// `ZREVRANGE key start stop` by rank, descending.
    pub async fn zrevrange(
        &mut self,
        key: impl AsRef<[u8]>,
        start: i64,
        stop: i64,
    ) -> CommandOutcome<Vec<Bytes>> {
        self.run::<BulkArray>(index_range("ZREVRANGE", key, start, stop))
            .await
    }

    pub async fn zrevrange_with_scores(
        &mut self,
        key: impl AsRef<[u8]>,
        start: i64,
        stop: i64,
    ) -> CommandOutcome<Vec<ScoredMember>> {
        let command = index_range("ZREVRANGE", key, start, stop).arg("WITHSCORES");
        self.run::<ScoredArray>(command).await
    }

    /// `ZRANGEBYSCORE key min max [LIMIT offset count]`
    pub async fn zrange_by_score(
        &mut self,
        key: impl AsRef<[u8]>,
        min: impl Into<ScoreBound>,
        max: impl Into<ScoreBound>,
        limit: Option<Limit>,
    ) -> CommandOutcome<Vec<Bytes>> {
        let command = score_range("ZRANGEBYSCORE", key, min.into(), max.into(), false, limit);
        self.run::<BulkArray>(command).await
    }

    pub async fn zrange_by_score_with_scores(
        &mut self,
        key: impl AsRef<[u8]>,
        min: impl Into<ScoreBound>,
        max: impl Into<ScoreBound>,
        limit: Option<Limit>,
    ) -> CommandOutcome<Vec<ScoredMember>> {
        let command = score_range("ZRANGEBYSCORE", key, min.into(), max.into(), true, limit);
        self.run::<ScoredArray>(command).await
    }

    /// `ZREVRANGEBYSCORE key max min [LIMIT offset count]`. Note `max` comes first.
    pub async fn zrevrange_by_score(
        &mut self,
        key: impl AsRef<[u8]>,
        max: impl Into<ScoreBound>,
        min: impl Into<ScoreBound>,
        limit: Option<Limit>,
    ) -> CommandOutcome<Vec<Bytes>> {
        let command = score_range("ZREVRANGEBYSCORE", key, max.into(), min.into(), false, limit);
        self.run::<BulkArray>(command).await
    }

    pub async fn zrevrange_by_score_with_scores(
        &mut self,
        key: impl AsRef<[u8]>,
        max: impl Into<ScoreBound>,
        min: impl Into<ScoreBound>,
        limit: Option<Limit>,
    ) -> CommandOutcome<Vec<ScoredMember>> {
        let command = score_range("ZREVRANGEBYSCORE", key, max.into(), min.into(), true, limit);
        self.run::<ScoredArray>(command).await
    }

    /// `ZRANK key member`, 0-based ascending; `KeyMissing` for a non-member.
    pub async fn zrank(
        &mut self,
        key: impl AsRef<[u8]>,
        member: impl AsRef<[u8]>,
    ) -> CommandOutcome<i64> {
        self.run::<IntOrMissing>(Command::new("ZRANK").arg(key).arg(member))
            .await
    }

    pub async fn zrevrank(
        &mut self,
        key: impl AsRef<[u8]>,
        member: impl AsRef<[u8]>,
    ) -> CommandOutcome<i64> {
        self.run::<IntOrMissing>(Command::new("ZREVRANK").arg(key).arg(member))
            .await
    }

    /// `ZREMRANGEBYRANK key start stop`: members removed.
    pub async fn zremrange_by_rank(
        &mut self,
        key: impl AsRef<[u8]>,
        start: i64,
        stop: i64,
    ) -> CommandOutcome<i64> {
        self.run::<IntOrWrongType>(index_range("ZREMRANGEBYRANK", key, start, stop))
            .await
    }

    /// `ZREMRANGEBYSCORE key min max`: members removed.
    pub async fn zremrange_by_score(
        &mut self,
        key: impl AsRef<[u8]>,
        min: impl Into<ScoreBound>,
        max: impl Into<ScoreBound>,
    ) -> CommandOutcome<i64> {
        let command = score_range("ZREMRANGEBYSCORE", key, min.into(), max.into(), false, None);
        self.run::<IntOrWrongType>(command).await
    }

    /// `ZINTERSTORE destination numkeys key [key ...]`: size of the result.
    pub async fn zinterstore<K: AsRef<[u8]>>(
        &mut self,
        destination: impl AsRef<[u8]>,
        keys: &[K],
    ) -> CommandOutcome<i64> {
        let command = store_op("ZINTERSTORE", destination, keys);
        self.run_variadic::<IntOrWrongType>(command, keys.len())
            .await
    }

    /// `ZUNIONSTORE destination numkeys key [key ...]`
    pub async fn zunionstore<K: AsRef<[u8]>>(
        &mut self,
        destination: impl AsRef<[u8]>,
        keys: &[K],
    ) -> CommandOutcome<i64> {
        let command = store_op("ZUNIONSTORE", destination, keys);
        self.run_variadic::<IntOrWrongType>(command, keys.len())
            .await
    }
}
