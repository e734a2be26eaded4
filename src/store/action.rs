use diesel::SqliteConnection;

use super::Id;
use crate::error::Result;

/// Persistence for one kind of record. Every write runs in its own immediate
/// transaction, so it either fully applies or leaves the store untouched.
pub trait Actions<T> {
    fn all(&mut self) -> Result<Vec<(Id<T>, T)>>;
    fn create(&mut self, item: T) -> Result<Id<T>>;
    fn read(&mut self, id: Id<T>) -> Result<T>;
    /// Removes the record along with everything that references it, returning the
    /// removed record.
    fn delete(&mut self, id: Id<T>) -> Result<T>;
}

/// Full replacement of an existing record. Returns the previous version.
pub trait Update<T> {
    fn update(&mut self, id: Id<T>, new_item: T) -> Result<T>;
}

/// Checks that the records an item points to exist, before it is written.
pub trait References {
    fn check_references(&self, _conn: &mut SqliteConnection) -> Result<()> {
        Ok(())
    }
}

macro_rules! derive_actions {
    ($t: ident, $s: ident, $table: ident, $name: literal, [$($dependent: ident . $column: ident),*]) => {
        impl Actions<$t> for SqliteConnection {
            fn all(&mut self) -> Result<Vec<(Id<$t>, $t)>> {
                Ok($table::table
                    .load::<$s>(self)?
                    .into_iter()
                    .map(|x| x.into())
                    .collect())
            }

            fn create(&mut self, item: $t) -> Result<Id<$t>> {
                db::enforce_foreign_keys(self)?;
                let id = Id::new();
                self.immediate_transaction(|conn| {
                    item.check_references(conn)?;
                    let sql_item: $s = (id, item).into();
                    diesel::insert_into($table::table)
                        .values(&sql_item)
                        .execute(conn)?;
                    Ok::<_, Error>(())
                })?;

                tracing::info!(id = %id, kind = $name, "record created");
                Ok(id)
            }

            fn read(&mut self, item_id: Id<$t>) -> Result<$t> {
                $table::table
                    .find(SqlId::from(item_id))
                    .first::<$s>(self)
                    .optional()?
                    .map(|x| <(Id<$t>, $t)>::from(x).1)
                    .ok_or(Error::NotFound($name))
            }

            fn delete(&mut self, item_id: Id<$t>) -> Result<$t> {
                db::enforce_foreign_keys(self)?;
                let raw_id: SqlId<$t> = item_id.into();
                let previous = self.immediate_transaction(|conn| {
                    let (_, previous): (Id<$t>, $t) = $table::table
                        .find(&raw_id)
                        .first::<$s>(conn)
                        .optional()?
                        .ok_or(Error::NotFound($name))?
                        .into();

                    $(
                        let removed = diesel::delete(
                            $dependent::table.filter($dependent::$column.eq(&raw_id)),
                        )
                        .execute(conn)?;
                        tracing::debug!(id = %item_id, removed, table = stringify!($dependent), "removed dependent rows");
                    )*

                    diesel::delete($table::table.find(&raw_id)).execute(conn)?;
                    Ok::<_, Error>(previous)
                })?;

                tracing::info!(id = %item_id, kind = $name, "record deleted");
                Ok(previous)
            }
        }
    };
}

macro_rules! derive_update {
    ($t: ident, $s: ident, $table: ident, $name: literal) => {
        impl Update<$t> for SqliteConnection {
            fn update(&mut self, item_id: Id<$t>, new_item: $t) -> Result<$t> {
                db::enforce_foreign_keys(self)?;
                let raw_id: SqlId<$t> = item_id.into();
                let previous = self.immediate_transaction(|conn| {
                    let (_, previous): (Id<$t>, $t) = $table::table
                        .find(&raw_id)
                        .first::<$s>(conn)
                        .optional()?
                        .ok_or(Error::NotFound($name))?
                        .into();

                    new_item.check_references(conn)?;
                    let replacement: $s = (item_id, new_item).into();
                    diesel::update($table::table.find(&raw_id))
                        .set(&replacement)
                        .execute(conn)?;
                    Ok::<_, Error>(previous)
                })?;

                tracing::info!(id = %item_id, kind = $name, "record replaced");
                Ok(previous)
            }
        }
    };
}
