use redb::{
    Database as RedbDatabase, ReadOnlyTable, ReadTransaction, ReadableTable,
    ReadableTableMetadata, Table, TableDefinition, TableHandle, WriteTransaction,
};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use super::tables::*;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Commit error: {0}")]
    Commit(Box<redb::CommitError>),
    #[error("Database error: {0}")]
    Redb(Box<redb::Error>),
    /// Opening the database file failed (locked by another process, corrupt, ...).
    #[error("Database error: {0}")]
    RedbDatabase(Box<redb::DatabaseError>),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Storage error: {0}")]
    Storage(Box<redb::StorageError>),
    #[error("Table error: {0}")]
    Table(Box<redb::TableError>),
    #[error("Transaction error: {0}")]
    Transaction(Box<redb::TransactionError>),
}

impl From<redb::CommitError> for StoreError {
    fn from(e: redb::CommitError) -> Self {
        StoreError::Commit(Box::new(e))
    }
}

impl From<redb::DatabaseError> for StoreError {
    fn from(e: redb::DatabaseError) -> Self {
        StoreError::RedbDatabase(Box::new(e))
    }
}

impl From<redb::Error> for StoreError {
    fn from(e: redb::Error) -> Self {
        StoreError::Redb(Box::new(e))
    }
}

impl From<redb::StorageError> for StoreError {
    fn from(e: redb::StorageError) -> Self {
        StoreError::Storage(Box::new(e))
    }
}

impl From<redb::TableError> for StoreError {
    fn from(e: redb::TableError) -> Self {
        StoreError::Table(Box::new(e))
    }
}

impl From<redb::TransactionError> for StoreError {
    fn from(e: redb::TransactionError) -> Self {
        StoreError::Transaction(Box::new(e))
    }
}

/// Every partition maps a raw url key to an encoded record.
type Entries<'a> = TableDefinition<'a, &'static str, &'static [u8]>;

fn entries(name: &str) -> Entries<'_> {
    TableDefinition::new(name)
}

/// Handle to the link database. Clones share the same underlying redb instance.
pub struct Store {
    db: Arc<RedbDatabase>,
}

impl Clone for Store {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
        }
    }
}

/// Counts reported by the health endpoint
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    pub links: u64,
    pub authors: u64,
}

impl Store {
    /// Open or create the database inside `data_dir`.
    ///
    /// redb holds an exclusive lock on the file, so a second process pointed at
    /// the same directory fails here instead of sharing the file.
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self, StoreError> {
        std::fs::create_dir_all(data_dir.as_ref())?;
        let db_path = data_dir.as_ref().join(DATABASE_FILE);
        let db = Arc::new(RedbDatabase::create(db_path)?);

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(entries(URLS))?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Run `f` against a point-in-time snapshot of every partition.
    pub fn read<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&ReadScope) -> Result<T, E>,
        E: From<StoreError>,
    {
        let scope = ReadScope {
            txn: self.db.begin_read().map_err(StoreError::from)?,
        };
        f(&scope)
    }

    /// Run `f` inside a write transaction.
    ///
    /// Write scopes are serialized by redb. Everything `f` wrote is committed
    /// when it returns `Ok`; on `Err` or panic the transaction is rolled back.
    pub fn write<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&WriteScope) -> Result<T, E>,
        E: From<StoreError>,
    {
        let scope = WriteScope {
            txn: self.db.begin_write().map_err(StoreError::from)?,
        };

        match f(&scope) {
            Ok(value) => {
                scope.txn.commit().map_err(StoreError::from)?;
                Ok(value)
            }
            Err(e) => {
                if let Err(abort_err) = scope.txn.abort() {
                    tracing::warn!(error = %abort_err, "Failed to abort write transaction");
                }
                Err(e)
            }
        }
    }

    pub fn stats(&self) -> Result<StoreStats, StoreError> {
        self.read(|scope| -> Result<StoreStats, StoreError> {
            let links = match scope.partition(URLS)? {
                Some(partition) => partition.len()?,
                None => 0,
            };
            let authors = scope
                .partition_names()?
                .iter()
                .filter(|name| author_of_partition(name).is_some())
                .count() as u64;
            Ok(StoreStats { links, authors })
        })
    }
}

// ============================================================================
// Scopes
// ============================================================================

pub struct ReadScope {
    txn: ReadTransaction,
}

impl ReadScope {
    /// Open an existing partition. Returns `None` when no partition has that name.
    pub fn partition(&self, name: &str) -> Result<Option<ReadPartition>, StoreError> {
        match self.txn.open_table(entries(name)) {
            Ok(table) => Ok(Some(ReadPartition { table })),
            Err(redb::TableError::TableDoesNotExist(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn partition_names(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .txn
            .list_tables()?
            .map(|handle| handle.name().to_string())
            .collect())
    }
}

pub struct WriteScope {
    txn: WriteTransaction,
}

impl WriteScope {
    /// Open an existing partition without creating it.
    pub fn partition(&self, name: &str) -> Result<Option<WritePartition<'_>>, StoreError> {
        let exists = self.txn.list_tables()?.any(|handle| handle.name() == name);
        if !exists {
            return Ok(None);
        }
        self.partition_or_create(name).map(Some)
    }

    pub fn partition_or_create(&self, name: &str) -> Result<WritePartition<'_>, StoreError> {
        let table = self.txn.open_table(entries(name))?;
        Ok(WritePartition { table })
    }
}

// ============================================================================
// Partitions
// ============================================================================

pub struct ReadPartition {
    table: ReadOnlyTable<&'static str, &'static [u8]>,
}

impl ReadPartition {
    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.table.get(key)?.map(|v| v.value().to_vec()))
    }

    /// Visit every entry in ascending raw-key order.
    pub fn for_each<F>(&self, mut f: F) -> Result<(), StoreError>
    where
        F: FnMut(&str, &[u8]),
    {
        for result in self.table.iter()? {
            let (key, value) = result?;
            f(key.value(), value.value());
        }
        Ok(())
    }

    pub fn len(&self) -> Result<u64, StoreError> {
        Ok(self.table.len()?)
    }
}

pub struct WritePartition<'txn> {
    table: Table<'txn, &'static str, &'static [u8]>,
}

impl WritePartition<'_> {
    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.table.get(key)?.map(|v| v.value().to_vec()))
    }

    pub fn put(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.table.insert(key, value)?;
        Ok(())
    }
}
