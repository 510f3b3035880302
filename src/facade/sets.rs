//! Set commands.

use crate::connection::Connection;
use crate::facade::decode::{BulkArray, BulkOrMissing, Bool01, IntOrWrongType};
use crate::facade::{Command, CommandOutcome, KvFacade};
use bytes::Bytes;

impl<C: Connection> KvFacade<C> {
    /// `SADD key member [member ...]`: how many members were newly added.
    pub async fn sadd<M: AsRef<[u8]>>(
        &mut self,
        key: impl AsRef<[u8]>,
        members: &[M],
    ) -> CommandOutcome<i64> {
        let command = Command::new("SADD").arg(key).args(members);
        self.run_variadic::<IntOrWrongType>(command, members.len())
            .await
    }

    /// `SREM key member [member ...]`: how many members were removed.
    pub async fn srem<M: AsRef<[u8]>>(
        &mut self,
        key: impl AsRef<[u8]>,
        members: &[M],
    ) -> CommandOutcome<i64> {
        let command = Command::new("SREM").arg(key).args(members);
        self.run_variadic::<IntOrWrongType>(command, members.len())
            .await
    }

    pub async fn smembers(&mut self, key: impl AsRef<[u8]>) -> CommandOutcome<Vec<Bytes>> {
        self.run::<BulkArray>(Command::new("SMEMBERS").arg(key)).await
    }

    pub async fn sismember(
        &mut self,
        key: impl AsRef<[u8]>,
        member: impl AsRef<[u8]>,
    ) -> CommandOutcome<bool> {
        self.run::<Bool01>(Command::new("SISMEMBER").arg(key).arg(member))
            .await
    }

    /// `SCARD key`: 0 for a missing key.
    pub async fn scard(&mut self, key: impl AsRef<[u8]>) -> CommandOutcome<i64> {
        self.run::<IntOrWrongType>(Command::new("SCARD").arg(key)).await
    }

    /// `SMOVE source destination member`, atomic on the store.
    pub async fn smove(
        &mut self,
        source: impl AsRef<[u8]>,
        destination: impl AsRef<[u8]>,
        member: impl AsRef<[u8]>,
    ) -> CommandOutcome<bool> {
        self.run::<Bool01>(
            Command::new("SMOVE")
                .arg(source)
                .arg(destination)
                .arg(member),
        )
        .await
    }

    /// `SPOP key`: a removed random member.
    pub async fn spop(&mut self, key: impl AsRef<[u8]>) -> CommandOutcome<Bytes> {
        self.run::<BulkOrMissing>(Command::new("SPOP").arg(key)).await
    }

    /// `SRANDMEMBER key`: a random member, not removed.
    pub async fn srandmember(&mut self, key: impl AsRef<[u8]>) -> CommandOutcome<Bytes> {
        self.run::<BulkOrMissing>(Command::new("SRANDMEMBER").arg(key))
            .await
    }

    /// `SRANDMEMBER key count`. A negative count allows repeats.
    pub async fn srandmember_count(
        &mut self,
        key: impl AsRef<[u8]>,
        count: i64,
    ) -> CommandOutcome<Vec<Bytes>> {
        self.run::<BulkArray>(Command::new("SRANDMEMBER").arg(key).arg_int(count))
            .await
    }

    pub async fn sinter<K: AsRef<[u8]>>(&mut self, keys: &[K]) -> CommandOutcome<Vec<Bytes>> {
        self.run_variadic::<BulkArray>(Command::new("SINTER").args(keys), keys.len())
            .await
    }

    /// `SINTERSTORE destination key [key ...]`: size of the stored result.
    pub async fn sinterstore<K: AsRef<[u8]>>(
        &mut self,
        destination: impl AsRef<[u8]>,
        keys: &[K],
    ) -> CommandOutcome<i64> {
        let command = Command::new("SINTERSTORE").arg(destination).args(keys);
        self.run_variadic::<IntOrWrongType>(command, keys.len())
            .await
    }

    pub async fn sunion<K: AsRef<[u8]>>(&mut self, keys: &[K]) -> CommandOutcome<Vec<Bytes>> {
        self.run_variadic::<BulkArray>(Command::new("SUNION").args(keys), keys.len())
            .await
    }

    pub async fn sunionstore<K: AsRef<[u8]>>(
        &mut self,
        destination: impl AsRef<[u8]>,
        keys: &[K],
    ) -> CommandOutcome<i64> {
        let command = Command::new("SUNIONSTORE").arg(destination).args(keys);
        self.run_variadic::<IntOrWrongType>(command, keys.len())
            .await
    }

    /// `SDIFF key [key ...]`: members of the first set missing from all others.
    pub async fn sdiff<K: AsRef<[u8]>>(&mut self, keys: &[K]) -> CommandOutcome<Vec<Bytes>> {
        self.run_variadic::<BulkArray>(Command::new("SDIFF").args(keys), keys.len())
            .await
    }

    pub async fn sdiffstore<K: AsRef<[u8]>>(
        &mut self,
        destination: impl AsRef<[u8]>,
        keys: &[K],
    ) -> CommandOutcome<i64> {
        let command = Command::new("SDIFFSTORE").arg(destination).args(keys);
        self.run_variadic::<IntOrWrongType>(command, keys.len())
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::facade::test_support::*;
    use crate::facade::CommandOutcome;
    use crate::protocol::RespValue;
    use bytes::Bytes;

    #[tokio::test]
    async fn test_sadd_counts_new_members() {
        let mut kv = facade(vec![
            RespValue::integer(2),
            RespValue::integer(0),
            RespValue::integer(2),
        ]);
        assert_eq!(kv.sadd("s1", &["x", "y"]).await, CommandOutcome::Success(2));
        assert_eq!(last_words(&kv), vec!["SADD", "s1", "x", "y"]);
        assert_eq!(kv.sadd("s1", &["x"]).await, CommandOutcome::Success(0));
        assert_eq!(kv.scard("s1").await, CommandOutcome::Success(2));
    }

    #[tokio::test]
    async fn test_membership() {
        let mut kv = facade(vec![
            RespValue::integer(1),
            RespValue::integer(0),
            RespValue::array(vec![bulk("x"), bulk("y")]),
            RespValue::integer(1),
            wrongtype(),
        ]);
        assert_eq!(kv.sismember("s1", "x").await, CommandOutcome::Success(true));
        assert_eq!(kv.smove("s1", "s2", "zz").await, CommandOutcome::Success(false));
        assert_eq!(last_words(&kv), vec!["SMOVE", "s1", "s2", "zz"]);
        assert_eq!(
            kv.smembers("s1").await,
            CommandOutcome::Success(vec![Bytes::from("x"), Bytes::from("y")])
        );
        assert_eq!(kv.srem("s1", &["x", "nope"]).await, CommandOutcome::Success(1));
        assert_eq!(kv.scard("name").await, CommandOutcome::WrongType);
    }

    #[tokio::test]
    async fn test_random_members() {
        let mut kv = facade(vec![
            bulk("x"),
            RespValue::Null,
            RespValue::array(vec![bulk("x"), bulk("x")]),
        ]);
        assert_eq!(kv.spop("s1").await, CommandOutcome::Success(Bytes::from("x")));
        assert_eq!(kv.srandmember("empty").await, CommandOutcome::KeyMissing);
        assert_eq!(
            kv.srandmember_count("s1", -2).await,
            CommandOutcome::Success(vec![Bytes::from("x"), Bytes::from("x")])
        );
        assert_eq!(last_words(&kv), vec!["SRANDMEMBER", "s1", "-2"]);
    }

    #[tokio::test]
    async fn test_algebra() {
        let mut kv = facade(vec![
            RespValue::array(vec![bulk("b")]),
            RespValue::integer(1),
            RespValue::array(vec![bulk("a"), bulk("b"), bulk("c")]),
            RespValue::integer(3),
            RespValue::array(vec![bulk("a")]),
            RespValue::integer(1),
        ]);
        assert_eq!(
            kv.sinter(&["s1", "s2"]).await,
            CommandOutcome::Success(vec![Bytes::from("b")])
        );
        assert_eq!(kv.sinterstore("out", &["s1", "s2"]).await, CommandOutcome::Success(1));
        assert_eq!(last_words(&kv), vec!["SINTERSTORE", "out", "s1", "s2"]);
        assert_eq!(kv.sunion(&["s1", "s2"]).await.success().map(|v| v.len()), Some(3));
        assert_eq!(kv.sunionstore("out", &["s1", "s2"]).await, CommandOutcome::Success(3));
        assert_eq!(
            kv.sdiff(&["s1", "s2"]).await,
            CommandOutcome::Success(vec![Bytes::from("a")])
        );
        assert_eq!(kv.sdiffstore("out", &["s1", "s2"]).await, CommandOutcome::Success(1));
        assert_eq!(last_words(&kv), vec!["SDIFFSTORE", "out", "s1", "s2"]);
    }
}
