use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql};
use diesel::serialize::{self, Output, ToSql};
use diesel::sql_types::Binary;
use diesel::sqlite::Sqlite;
use diesel::{AsExpression, FromSqlRow};
use uuid::Uuid;

use crate::store;

// SqlId implementation inspired by https://github.com/forte-music/core/blob/fc9cd6217708b0dd6ae684df3a53276804479c59/src/models/id.rs#L67
#[derive(AsExpression, FromSqlRow)]
#[diesel(sql_type = Binary)]
pub struct SqlId<Item>(Uuid, PhantomData<Item>);

impl<Item> From<Uuid> for SqlId<Item> {
    fn from(uuid: Uuid) -> Self {
        SqlId(uuid, PhantomData)
    }
}

impl<Item> From<SqlId<Item>> for store::Id<Item> {
    fn from(id: SqlId<Item>) -> store::Id<Item> {
        id.0.into()
    }
}

impl<Item> From<store::Id<Item>> for SqlId<Item> {
    fn from(id: store::Id<Item>) -> SqlId<Item> {
        id.id.into()
    }
}

impl<Item> Clone for SqlId<Item> {
    fn clone(&self) -> Self {
        self.0.into()
    }
}

impl<Item> PartialEq for SqlId<Item> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<Item> Eq for SqlId<Item> {}

impl<Item> Hash for SqlId<Item> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

impl<Item> fmt::Debug for SqlId<Item> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SqlId({})", self.0)
    }
}

impl<Item> ToSql<Binary, Sqlite> for SqlId<Item> {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        <[u8] as ToSql<Binary, Sqlite>>::to_sql(&self.0.as_bytes()[..], out)
    }
}

impl<Item> FromSql<Binary, Sqlite> for SqlId<Item> {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let bytes_vec = <Vec<u8> as FromSql<Binary, Sqlite>>::from_sql(bytes)?;
        Ok(Uuid::from_slice(&bytes_vec)?.into())
    }
}
