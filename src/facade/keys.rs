//! Key-space commands.

use crate::connection::Connection;
use crate::facade::decode::{
    BulkArray, BulkOrMissing, Bool01, IntOrWrongType, Raw, Status, TtlMillis, TtlSeconds,
    TypeName,
};
use crate::facade::types::{KeyType, SortOrder, Ttl};
use crate::facade::{Command, CommandOutcome, KvFacade};
use crate::protocol::RespValue;
use bytes::Bytes;

impl<C: Connection> KvFacade<C> {
    /// `KEYS pattern`
    pub async fn keys(&mut self, pattern: impl AsRef<[u8]>) -> CommandOutcome<Vec<Bytes>> {
        self.run::<BulkArray>(Command::new("KEYS").arg(pattern)).await
    }

    /// `RANDOMKEY`; `KeyMissing` when the database is empty.
    pub async fn random_key(&mut self) -> CommandOutcome<Bytes> {
        self.run::<BulkOrMissing>(Command::new("RANDOMKEY")).await
    }

    /// `TTL key`
    pub async fn ttl(&mut self, key: impl AsRef<[u8]>) -> CommandOutcome<Ttl> {
        self.run::<TtlSeconds>(Command::new("TTL").arg(key)).await
    }

    /// `PTTL key`
    pub async fn pttl(&mut self, key: impl AsRef<[u8]>) -> CommandOutcome<Ttl> {
        self.run::<TtlMillis>(Command::new("PTTL").arg(key)).await
    }

    /// `MOVE key db`: false when the key is absent here or already present there.
    pub async fn move_key(&mut self, key: impl AsRef<[u8]>, db: u32) -> CommandOutcome<bool> {
        self.run::<Bool01>(Command::new("MOVE").arg(key).arg_int(i64::from(db)))
            .await
    }

    /// `SELECT db`. Affects every later command on this connection.
    pub async fn select(&mut self, db: u32) -> CommandOutcome<bool> {
        self.run::<Status>(Command::new("SELECT").arg_int(i64::from(db)))
            .await
    }

    /// `RENAME key newkey`. Overwrites `newkey`; a missing `key` is a store error.
    pub async fn rename(
        &mut self,
        key: impl AsRef<[u8]>,
        new_key: impl AsRef<[u8]>,
    ) -> CommandOutcome<bool> {
        self.run::<Status>(Command::new("RENAME").arg(key).arg(new_key))
            .await
    }

    /// `RENAMENX key newkey`: false when `newkey` already exists.
    pub async fn rename_nx(
        &mut self,
        key: impl AsRef<[u8]>,
        new_key: impl AsRef<[u8]>,
    ) -> CommandOutcome<bool> {
        self.run::<Bool01>(Command::new("RENAMENX").arg(key).arg(new_key))
            .await
    }

    /// `EXPIRE key seconds`: false when the key does not exist.
    pub async fn expire(&mut self, key: impl AsRef<[u8]>, seconds: i64) -> CommandOutcome<bool> {
        self.run::<Bool01>(Command::new("EXPIRE").arg(key).arg_int(seconds))
            .await
    }

    /// `PEXPIRE key milliseconds`
    pub async fn pexpire(&mut self, key: impl AsRef<[u8]>, millis: i64) -> CommandOutcome<bool> {
        self.run::<Bool01>(Command::new("PEXPIRE").arg(key).arg_int(millis))
            .await
    }

    /// `EXPIREAT key unix-seconds`
    pub async fn expire_at(
        &mut self,
        key: impl AsRef<[u8]>,
        timestamp: i64,
    ) -> CommandOutcome<bool> {
        self.run::<Bool01>(Command::new("EXPIREAT").arg(key).arg_int(timestamp))
            .await
    }

    /// `OBJECT subcommand key`, e.g. `REFCOUNT`, `ENCODING`, `IDLETIME`.
    ///
    /// The reply shape differs per subcommand and is returned as is.
    pub async fn object(
        &mut self,
        subcommand: &str,
        key: impl AsRef<[u8]>,
    ) -> CommandOutcome<RespValue> {
        self.run::<Raw>(Command::new("OBJECT").arg(subcommand).arg(key))
            .await
            .and_then(|reply| match reply {
                RespValue::Null => CommandOutcome::KeyMissing,
                other => CommandOutcome::Success(other),
            })
    }

    /// `PERSIST key`: false when there was no TTL to remove.
    pub async fn persist(&mut self, key: impl AsRef<[u8]>) -> CommandOutcome<bool> {
        self.run::<Bool01>(Command::new("PERSIST").arg(key)).await
    }

    /// `EXISTS key`
    pub async fn exists(&mut self, key: impl AsRef<[u8]>) -> CommandOutcome<bool> {
        self.run::<Bool01>(Command::new("EXISTS").arg(key)).await
    }

    /// `EXISTS key [key ...]`: how many of the keys exist (repeats count twice).
    pub async fn exists_count<K: AsRef<[u8]>>(&mut self, keys: &[K]) -> CommandOutcome<i64> {
        self.run_variadic::<IntOrWrongType>(Command::new("EXISTS").args(keys), keys.len())
            .await
    }

    /// `TYPE key`; `KeyMissing` for a key that does not exist.
    pub async fn key_type(&mut self, key: impl AsRef<[u8]>) -> CommandOutcome<KeyType> {
        self.run::<TypeName>(Command::new("TYPE").arg(key)).await
    }

    /// `DEL key [key ...]`: number of keys removed.
    pub async fn del<K: AsRef<[u8]>>(&mut self, keys: &[K]) -> CommandOutcome<i64> {
        self.run_variadic::<IntOrWrongType>(Command::new("DEL").args(keys), keys.len())
            .await
    }

    /// `SORT key ASC|DESC`
    pub async fn sort(
        &mut self,
        key: impl AsRef<[u8]>,
        order: SortOrder,
    ) -> CommandOutcome<Vec<Bytes>> {
        self.run::<BulkArray>(Command::new("SORT").arg(key).arg(order.as_arg()))
            .await
    }

    /// `DBSIZE`
    pub async fn dbsize(&mut self) -> CommandOutcome<i64> {
        self.run::<IntOrWrongType>(Command::new("DBSIZE")).await
    }

    /// `PING`; the status text the store answered with.
    pub async fn ping(&mut self) -> CommandOutcome<String> {
        self.run::<Raw>(Command::new("PING"))
            .await
            .and_then(|reply| match reply {
                RespValue::SimpleString(s) => CommandOutcome::Success(s),
                other => CommandOutcome::StoreError(format!(
                    "unexpected {} reply to PING",
                    other.kind()
                )),
            })
    }
}
