use std::collections::BTreeMap;
use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use time::OffsetDateTime;

use crate::error::DbError;

/// A field set that can be stored in a [`Table`].
pub trait Record: Clone + Send + Sync + 'static {
    /// Table name used in logs and errors.
    const TABLE: &'static str;

    /// Fields whose values must be unique across the table. A `None` value
    /// never collides.
    const UNIQUE: &'static [&'static str] = &[];

    /// Returns the value of a string-typed field, `None` when unset or unknown.
    fn field(&self, name: &str) -> Option<&str>;
}

/// A stored record: storage-assigned identity and timestamps around the
/// caller's fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row<T> {
    pub id: u64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Unset until the first update.
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
    #[serde(flatten)]
    pub fields: T,
}

struct Inner<T> {
    next_id: u64,
    rows: BTreeMap<u64, Row<T>>,
}

/// In-memory table keyed by a monotonically increasing id.
pub struct Table<T: Record> {
    inner: RwLock<Inner<T>>,
}

impl<T: Record> Table<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
        }
    }

    // A panic while holding the lock cannot leave a row half-written: every
    // mutation is a single map operation.
    fn read(&self) -> RwLockReadGuard<'_, Inner<T>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner<T>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store `fields` as a new row with a fresh id and creation timestamp.
    pub fn insert(&self, fields: T) -> Result<Row<T>, DbError> {
        let mut inner = self.write();
        check_unique(&inner.rows, &fields, None)?;

        let id = inner.next_id;
        inner.next_id += 1;

        let row = Row {
            id,
            created_at: OffsetDateTime::now_utc(),
            updated_at: None,
            fields,
        };
        inner.rows.insert(id, row.clone());

        tracing::debug!(table = T::TABLE, id, "row inserted");
        Ok(row)
    }

    pub fn get(&self, id: u64) -> Result<Row<T>, DbError> {
        self.read()
            .rows
            .get(&id)
            .cloned()
            .ok_or(DbError::NotFound { table: T::TABLE, id })
    }

    /// All rows in id order.
    pub fn list(&self) -> Vec<Row<T>> {
        self.read().rows.values().cloned().collect()
    }

    /// Whether any row's `field` equals `value` exactly.
    pub fn exists(&self, field: &str, value: &str) -> bool {
        self.read()
            .rows
            .values()
            .any(|row| row.fields.field(field) == Some(value))
    }

    /// Replace the fields of row `id`, stamping `updated_at`. `created_at`
    /// is never touched.
    pub fn update(&self, id: u64, fields: T) -> Result<Row<T>, DbError> {
        self.modify(id, |_| Ok::<_, DbError>(fields))
    }

    /// Read-modify-write of row `id` under a single write lock. `change`
    /// sees the current fields and returns the replacement; an `Err` from it
    /// leaves the row untouched.
    pub fn modify<E, F>(&self, id: u64, change: F) -> Result<Row<T>, E>
    where
        E: From<DbError>,
        F: FnOnce(&T) -> Result<T, E>,
    {
        let mut inner = self.write();
        let current = inner
            .rows
            .get(&id)
            .ok_or(DbError::NotFound { table: T::TABLE, id })?;

        let fields = change(&current.fields)?;
        check_unique(&inner.rows, &fields, Some(id))?;

        let row = inner
            .rows
            .get_mut(&id)
            .ok_or(DbError::NotFound { table: T::TABLE, id })?;
        row.fields = fields;
        row.updated_at = Some(OffsetDateTime::now_utc());

        tracing::debug!(table = T::TABLE, id, "row updated");
        Ok(row.clone())
    }

    pub fn delete(&self, id: u64) -> Result<Row<T>, DbError> {
        let row = self
            .write()
            .rows
            .remove(&id)
            .ok_or(DbError::NotFound { table: T::TABLE, id })?;

        tracing::debug!(table = T::TABLE, id, "row deleted");
        Ok(row)
    }

    pub fn count(&self) -> usize {
        self.read().rows.len()
    }
}

impl<T: Record> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> fmt::Debug for Table<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("name", &T::TABLE)
            .field("rows", &self.count())
            .finish()
    }
}

fn check_unique<T: Record>(
    rows: &BTreeMap<u64, Row<T>>,
    fields: &T,
    skip: Option<u64>,
) -> Result<(), DbError> {
    for &field in T::UNIQUE {
        let Some(value) = fields.field(field) else {
            continue;
        };
        let taken = rows
            .values()
            .any(|row| Some(row.id) != skip && row.fields.field(field) == Some(value));
        if taken {
            tracing::warn!(table = T::TABLE, field, "unique index violation");
            return Err(DbError::UniqueViolation {
                table: T::TABLE,
                field,
                value: value.to_string(),
            });
        }
    }
    Ok(())
}
