//! List commands.

use crate::connection::Connection;
use crate::facade::decode::{BulkArray, BulkOrMissing, IntOrWrongType, KeyedBulk, Status};
use crate::facade::types::InsertPosition;
use crate::facade::{Command, CommandOutcome, KvFacade};
use bytes::Bytes;
use std::time::Duration;

/// Blocking timeouts go out as whole seconds when possible, for older stores.
fn timeout_arg(command: Command, timeout: Duration) -> Command {
    if timeout.subsec_nanos() == 0 {
        command.arg(timeout.as_secs().to_string())
    } else {
        command.arg_float(timeout.as_secs_f64())
    }
}

impl<C: Connection> KvFacade<C> {
    /// `LPUSH key value [value ...]`: list length afterwards.
    pub async fn lpush<V: AsRef<[u8]>>(
        &mut self,
        key: impl AsRef<[u8]>,
        values: &[V],
    ) -> CommandOutcome<i64> {
        let command = Command::new("LPUSH").arg(key).args(values);
        self.run_variadic::<IntOrWrongType>(command, values.len())
            .await
    }

    /// `LPUSHX key value`: 0 when the list does not exist (nothing is created).
    pub async fn lpush_x(
        &mut self,
        key: impl AsRef<[u8]>,
        value: impl AsRef<[u8]>,
    ) -> CommandOutcome<i64> {
        self.run::<IntOrWrongType>(Command::new("LPUSHX").arg(key).arg(value))
            .await
    }

    /// `RPUSH key value [value ...]`: list length afterwards.
    pub async fn rpush<V: AsRef<[u8]>>(
        &mut self,
        key: impl AsRef<[u8]>,
        values: &[V],
    ) -> CommandOutcome<i64> {
        let command = Command::new("RPUSH").arg(key).args(values);
        self.run_variadic::<IntOrWrongType>(command, values.len())
            .await
    }

    /// `RPUSHX key value`
    pub async fn rpush_x(
        &mut self,
        key: impl AsRef<[u8]>,
        value: impl AsRef<[u8]>,
    ) -> CommandOutcome<i64> {
        self.run::<IntOrWrongType>(Command::new("RPUSHX").arg(key).arg(value))
            .await
    }

    pub async fn lpop(&mut self, key: impl AsRef<[u8]>) -> CommandOutcome<Bytes> {
        self.run::<BulkOrMissing>(Command::new("LPOP").arg(key)).await
    }

    pub async fn rpop(&mut self, key: impl AsRef<[u8]>) -> CommandOutcome<Bytes> {
        self.run::<BulkOrMissing>(Command::new("RPOP").arg(key)).await
    }

    /// `BLPOP key [key ...] timeout`: `(key, value)` from the first non-empty
    /// list, or `KeyMissing` once the timeout passes.
    ///
    /// A zero timeout blocks on the store indefinitely, so the transport's
    /// response timeout becomes the effective bound.
    pub async fn blpop<K: AsRef<[u8]>>(
        &mut self,
        keys: &[K],
        timeout: Duration,
    ) -> CommandOutcome<(Bytes, Bytes)> {
        let command = timeout_arg(Command::new("BLPOP").args(keys), timeout).blocking(timeout);
        self.run_variadic::<KeyedBulk>(command, keys.len()).await
    }

    /// `BRPOP key [key ...] timeout`
    pub async fn brpop<K: AsRef<[u8]>>(
        &mut self,
        keys: &[K],
        timeout: Duration,
    ) -> CommandOutcome<(Bytes, Bytes)> {
        let command = timeout_arg(Command::new("BRPOP").args(keys), timeout).blocking(timeout);
        self.run_variadic::<KeyedBulk>(command, keys.len()).await
    }

    /// `LLEN key`: 0 for a missing key.
    pub async fn llen(&mut self, key: impl AsRef<[u8]>) -> CommandOutcome<i64> {
        self.run::<IntOrWrongType>(Command::new("LLEN").arg(key)).await
    }

    /// `LRANGE key start stop`, inclusive. Negative indices count from the tail;
    /// an inverted range is `Success([])`.
    pub async fn lrange(
        &mut self,
        key: impl AsRef<[u8]>,
        start: i64,
        stop: i64,
    ) -> CommandOutcome<Vec<Bytes>> {
        self.run::<BulkArray>(Command::new("LRANGE").arg(key).arg_int(start).arg_int(stop))
            .await
    }

    /// `LREM key count value`: number of elements removed.
    ///
    /// `count > 0` removes from the head, `< 0` from the tail, `0` removes all.
    pub async fn lrem(
        &mut self,
        key: impl AsRef<[u8]>,
        count: i64,
        value: impl AsRef<[u8]>,
    ) -> CommandOutcome<i64> {
        self.run::<IntOrWrongType>(Command::new("LREM").arg(key).arg_int(count).arg(value))
            .await
    }

    /// `LSET key index value`. An out-of-range index is a store error.
    pub async fn lset(
        &mut self,
        key: impl AsRef<[u8]>,
        index: i64,
        value: impl AsRef<[u8]>,
    ) -> CommandOutcome<bool> {
        self.run::<Status>(Command::new("LSET").arg(key).arg_int(index).arg(value))
            .await
    }

    /// `LTRIM key start stop`
    pub async fn ltrim(
        &mut self,
        key: impl AsRef<[u8]>,
        start: i64,
        stop: i64,
    ) -> CommandOutcome<bool> {
        self.run::<Status>(Command::new("LTRIM").arg(key).arg_int(start).arg_int(stop))
            .await
    }

    /// `LINDEX key index`; `KeyMissing` when out of range or the key is absent.
    pub async fn lindex(&mut self, key: impl AsRef<[u8]>, index: i64) -> CommandOutcome<Bytes> {
        self.run::<BulkOrMissing>(Command::new("LINDEX").arg(key).arg_int(index))
            .await
    }

    /// `LINSERT key BEFORE|AFTER pivot value`: the new length, `-1` when the
    /// pivot was not found, `0` when the key does not exist.
    pub async fn linsert(
        &mut self,
        key: impl AsRef<[u8]>,
        position: InsertPosition,
        pivot: impl AsRef<[u8]>,
        value: impl AsRef<[u8]>,
    ) -> CommandOutcome<i64> {
        self.run::<IntOrWrongType>(
            Command::new("LINSERT")
                .arg(key)
                .arg(position.as_arg())
                .arg(pivot)
                .arg(value),
        )
        .await
    }

    /// `RPOPLPUSH source destination`: the moved element.
    pub async fn rpoplpush(
        &mut self,
        source: impl AsRef<[u8]>,
        destination: impl AsRef<[u8]>,
    ) -> CommandOutcome<Bytes> {
        self.run::<BulkOrMissing>(Command::new("RPOPLPUSH").arg(source).arg(destination))
            .await
    }

    /// `BRPOPLPUSH source destination timeout`
    pub async fn brpoplpush(
        &mut self,
        source: impl AsRef<[u8]>,
        destination: impl AsRef<[u8]>,
        timeout: Duration,
    ) -> CommandOutcome<Bytes> {
        let command = timeout_arg(
            Command::new("BRPOPLPUSH").arg(source).arg(destination),
            timeout,
        )
        .blocking(timeout);
        self.run::<BulkOrMissing>(command).await
    }
}
