//! String commands.

use crate::connection::Connection;
use crate::facade::decode::{ArrayOfBulkOrMissing, BulkOrMissing, Bool01, IntOrWrongType, Status};
use crate::facade::{Command, CommandOutcome, KvFacade};
use bytes::Bytes;

/// Appends `k1 v1 k2 v2 ...` to `command`.
pub(crate) fn with_pairs<K, V>(command: Command, pairs: &[(K, V)]) -> Command
where
    K: AsRef<[u8]>,
    V: AsRef<[u8]>,
{
    pairs
        .iter()
        .fold(command, |cmd, (k, v)| cmd.arg(k).arg(v))
}

impl<C: Connection> KvFacade<C> {
    /// `SET key value`. Unconditional, so it is always `Success(true)` unless the store fails.
    pub async fn set(
        &mut self,
        key: impl AsRef<[u8]>,
        value: impl AsRef<[u8]>,
    ) -> CommandOutcome<bool> {
        self.run::<Status>(Command::new("SET").arg(key).arg(value))
            .await
    }

    /// `SETEX key seconds value`
    pub async fn set_ex(
        &mut self,
        key: impl AsRef<[u8]>,
        value: impl AsRef<[u8]>,
        seconds: u64,
    ) -> CommandOutcome<bool> {
        self.run::<Status>(
            Command::new("SETEX")
                .arg(key)
                .arg(seconds.to_string())
                .arg(value),
        )
            .await
    }

    /// `SETNX key value`: false when the key already existed.
    pub async fn set_nx(
        &mut self,
        key: impl AsRef<[u8]>,
        value: impl AsRef<[u8]>,
    ) -> CommandOutcome<bool> {
        self.run::<Bool01>(Command::new("SETNX").arg(key).arg(value))
            .await
    }

    /// `SETRANGE key offset value`: the string length afterwards.
    pub async fn set_range(
        &mut self,
        key: impl AsRef<[u8]>,
        offset: u64,
        value: impl AsRef<[u8]>,
    ) -> CommandOutcome<i64> {
        self.run::<IntOrWrongType>(
            Command::new("SETRANGE")
                .arg(key)
                .arg(offset.to_string())
                .arg(value),
        )
        .await
    }

    /// `MSET key value [key value ...]`
    pub async fn mset<K, V>(&mut self, pairs: &[(K, V)]) -> CommandOutcome<bool>
    where
        K: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        self.run_variadic::<Status>(with_pairs(Command::new("MSET"), pairs), pairs.len())
            .await
    }

    /// `MSETNX key value [key value ...]`: all or nothing; false if any key existed.
    pub async fn mset_nx<K, V>(&mut self, pairs: &[(K, V)]) -> CommandOutcome<bool>
    where
        K: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        self.run_variadic::<Bool01>(with_pairs(Command::new("MSETNX"), pairs), pairs.len())
            .await
    }

    /// `APPEND key value`: the string length afterwards.
    pub async fn append(
        &mut self,
        key: impl AsRef<[u8]>,
        value: impl AsRef<[u8]>,
    ) -> CommandOutcome<i64> {
        self.run::<IntOrWrongType>(Command::new("APPEND").arg(key).arg(value))
            .await
    }

    /// `GET key`
    pub async fn get(&mut self, key: impl AsRef<[u8]>) -> CommandOutcome<Bytes> {
        self.run::<BulkOrMissing>(Command::new("GET").arg(key)).await
    }

    /// `MGET key [key ...]`: one slot per requested key, `None` where absent.
    pub async fn mget<K: AsRef<[u8]>>(&mut self, keys: &[K]) -> CommandOutcome<Vec<Option<Bytes>>> {
        self.run_variadic::<ArrayOfBulkOrMissing>(Command::new("MGET").args(keys), keys.len())
            .await
    }

    /// `GETRANGE key start end`, inclusive, negative offsets counting from the end.
    pub async fn get_range(
        &mut self,
        key: impl AsRef<[u8]>,
        start: i64,
        end: i64,
    ) -> CommandOutcome<Bytes> {
        self.run::<BulkOrMissing>(Command::new("GETRANGE").arg(key).arg_int(start).arg_int(end))
            .await
    }

    /// `GETSET key value` as one atomic command.
    ///
    /// `KeyMissing` means there was no previous value; an empty previous
    /// value is `Success` of an empty buffer.
    pub async fn get_set(
        &mut self,
        key: impl AsRef<[u8]>,
        value: impl AsRef<[u8]>,
    ) -> CommandOutcome<Bytes> {
        self.run::<BulkOrMissing>(Command::new("GETSET").arg(key).arg(value))
            .await
    }

    /// `STRLEN key`: 0 for a missing key.
    pub async fn strlen(&mut self, key: impl AsRef<[u8]>) -> CommandOutcome<i64> {
        self.run::<IntOrWrongType>(Command::new("STRLEN").arg(key)).await
    }

    pub async fn incr(&mut self, key: impl AsRef<[u8]>) -> CommandOutcome<i64> {
        self.run::<IntOrWrongType>(Command::new("INCR").arg(key)).await
    }

    pub async fn incr_by(&mut self, key: impl AsRef<[u8]>, increment: i64) -> CommandOutcome<i64> {
        self.run::<IntOrWrongType>(Command::new("INCRBY").arg(key).arg_int(increment))
            .await
    }

    pub async fn decr(&mut self, key: impl AsRef<[u8]>) -> CommandOutcome<i64> {
        self.run::<IntOrWrongType>(Command::new("DECR").arg(key)).await
    }

    pub async fn decr_by(&mut self, key: impl AsRef<[u8]>, decrement: i64) -> CommandOutcome<i64> {
        self.run::<IntOrWrongType>(Command::new("DECRBY").arg(key).arg_int(decrement))
            .await
    }

    /// `SETBIT key offset 0|1`: the bit's previous value.
    pub async fn set_bit(
        &mut self,
        key: impl AsRef<[u8]>,
        offset: u64,
        bit: bool,
    ) -> CommandOutcome<bool> {
        self.run::<Bool01>(
            Command::new("SETBIT")
                .arg(key)
                .arg(offset.to_string())
                .arg(if bit { "1" } else { "0" }),
        )
        .await
    }

    /// `GETBIT key offset`
    pub async fn get_bit(&mut self, key: impl AsRef<[u8]>, offset: u64) -> CommandOutcome<bool> {
        self.run::<Bool01>(Command::new("GETBIT").arg(key).arg(offset.to_string()))
            .await
    }
}
