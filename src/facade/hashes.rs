//! Hash commands.

use crate::connection::Connection;
use crate::facade::decode::{
    ArrayOfBulkOrMissing, BulkArray, BulkOrMissing, Bool01, IntOrWrongType, PairArray, Status,
};
use crate::facade::strings::with_pairs;
use crate::facade::{Command, CommandOutcome, KvFacade};
use bytes::Bytes;

impl<C: Connection> KvFacade<C> {
    /// `HSET key field value`. `Success(true)` whether the field was created or overwritten.
    pub async fn hset(
        &mut self,
        key: impl AsRef<[u8]>,
        field: impl AsRef<[u8]>,
        value: impl AsRef<[u8]>,
    ) -> CommandOutcome<bool> {
        self.run::<Bool01>(Command::new("HSET").arg(key).arg(field).arg(value))
            .await
            .map(|_| true)
    }

    /// `HSETNX key field value`: false when the field already existed.
    pub async fn hset_nx(
        &mut self,
        key: impl AsRef<[u8]>,
        field: impl AsRef<[u8]>,
        value: impl AsRef<[u8]>,
    ) -> CommandOutcome<bool> {
        self.run::<Bool01>(Command::new("HSETNX").arg(key).arg(field).arg(value))
            .await
    }

    /// `HMSET key field value [field value ...]`
    pub async fn hmset<F, V>(
        &mut self,
        key: impl AsRef<[u8]>,
        pairs: &[(F, V)],
    ) -> CommandOutcome<bool>
    where
        F: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        let command = with_pairs(Command::new("HMSET").arg(key), pairs);
        self.run_variadic::<Status>(command, pairs.len()).await
    }

    /// `HGET key field`. `KeyMissing` covers both a missing key and a missing field.
    pub async fn hget(
        &mut self,
        key: impl AsRef<[u8]>,
        field: impl AsRef<[u8]>,
    ) -> CommandOutcome<Bytes> {
        self.run::<BulkOrMissing>(Command::new("HGET").arg(key).arg(field))
            .await
    }

    /// `HMGET key field [field ...]`: one slot per field.
    pub async fn hmget<F: AsRef<[u8]>>(
        &mut self,
        key: impl AsRef<[u8]>,
        fields: &[F],
    ) -> CommandOutcome<Vec<Option<Bytes>>> {
        let command = Command::new("HMGET").arg(key).args(fields);
        self.run_variadic::<ArrayOfBulkOrMissing>(command, fields.len())
            .await
    }

    /// `HGETALL key` as field/value pairs in store order.
    pub async fn hgetall(&mut self, key: impl AsRef<[u8]>) -> CommandOutcome<Vec<(Bytes, Bytes)>> {
        self.run::<PairArray>(Command::new("HGETALL").arg(key)).await
    }

    /// `HDEL key field [field ...]`: number of fields removed.
    pub async fn hdel<F: AsRef<[u8]>>(
        &mut self,
        key: impl AsRef<[u8]>,
        fields: &[F],
    ) -> CommandOutcome<i64> {
        let command = Command::new("HDEL").arg(key).args(fields);
        self.run_variadic::<IntOrWrongType>(command, fields.len())
            .await
    }

    pub async fn hlen(&mut self, key: impl AsRef<[u8]>) -> CommandOutcome<i64> {
        self.run::<IntOrWrongType>(Command::new("HLEN").arg(key)).await
    }

    pub async fn hexists(
        &mut self,
        key: impl AsRef<[u8]>,
        field: impl AsRef<[u8]>,
    ) -> CommandOutcome<bool> {
        self.run::<Bool01>(Command::new("HEXISTS").arg(key).arg(field))
            .await
    }

    /// `HINCRBY key field increment`: the field's new value.
    pub async fn hincr_by(
        &mut self,
        key: impl AsRef<[u8]>,
        field: impl AsRef<[u8]>,
        increment: i64,
    ) -> CommandOutcome<i64> {
        self.run::<IntOrWrongType>(
            Command::new("HINCRBY")
                .arg(key)
                .arg(field)
                .arg_int(increment),
        )
        .await
    }

    pub async fn hkeys(&mut self, key: impl AsRef<[u8]>) -> CommandOutcome<Vec<Bytes>> {
        self.run::<BulkArray>(Command::new("HKEYS").arg(key)).await
    }

    pub async fn hvals(&mut self, key: impl AsRef<[u8]>) -> CommandOutcome<Vec<Bytes>> {
        self.run::<BulkArray>(Command::new("HVALS").arg(key)).await
    }
}
