//! SQLite-backed record store.
//!
//! All collections share one `records` table keyed by `(collection, id)`.

use super::{decode_record, encode_record, Record, RecordStore, StoreError, StoreResult};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

/// Record store borrowing an already bootstrapped connection.
pub struct SqliteRecordStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Number of entries stored in `collection`.
    pub fn count(&self, collection: &str) -> StoreResult<u64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM records WHERE collection = ?1;",
            [collection],
            |row| row.get::<_, u64>(0),
        )?;
        Ok(count)
    }
}

impl RecordStore for SqliteRecordStore<'_> {
    fn create<T: Record>(&self, collection: &str, record: &T) -> StoreResult<String> {
        let id = record.record_id();
        let encoded = encode_record(record).map_err(|source| StoreError::Encode {
            collection: collection.to_string(),
            source,
        })?;

        self.conn.execute(
            "INSERT OR REPLACE INTO records (collection, id, value) VALUES (?1, ?2, ?3);",
            params![collection, id.as_str(), encoded.as_str()],
        )?;
        debug!(
            "event=store_write module=store status=ok collection={} id={} bytes={}",
            collection,
            id,
            encoded.len()
        );

        Ok(id)
    }

    fn find_one<T: Record>(&self, collection: &str, id: &str) -> StoreResult<Option<T>> {
        let encoded = self
            .conn
            .query_row(
                "SELECT value FROM records WHERE collection = ?1 AND id = ?2;",
                params![collection, id],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        encoded
            .map(|encoded| decode_stored(collection, id, &encoded))
            .transpose()
    }

    fn find_all<T: Record>(&self, collection: &str) -> StoreResult<Vec<T>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, value FROM records WHERE collection = ?1;")?;
        let mut rows = stmt.query([collection])?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            let id: String = row.get("id")?;
            let encoded: String = row.get("value")?;
            records.push(decode_stored(collection, &id, &encoded)?);
        }

        Ok(records)
    }
}

fn decode_stored<T: Record>(collection: &str, id: &str, encoded: &str) -> StoreResult<T> {
    decode_record(encoded).map_err(|source| StoreError::Decode {
        collection: collection.to_string(),
        id: id.to_string(),
        source,
    })
}
