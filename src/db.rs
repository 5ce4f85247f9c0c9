use rusqlite::{params, Connection, Row};
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::entities::BankSwift;

// ============================================================================
// STORAGE CONTRACT
// ============================================================================

#[derive(Error, Debug)]
pub enum StoreError {
    /// Key constraint rejected the write
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Everything the directory needs from persistence, keyed by SWIFT code
pub trait SwiftStore {
    fn exists_by_code(&self, code: &str) -> StoreResult<bool>;

    fn find_by_code(&self, code: &str) -> StoreResult<Option<BankSwift>>;

    /// Insert one record. Fails with `DuplicateKey` if the code is taken.
    fn save(&self, record: &BankSwift) -> StoreResult<()>;

    fn delete_by_code(&self, code: &str) -> StoreResult<()>;

    fn find_by_country_code(&self, country_iso2: &str) -> StoreResult<Vec<BankSwift>>;

    /// Records whose code starts with `prefix`, except `excluded_code`
    fn find_by_prefix_excluding(
        &self,
        prefix: &str,
        excluded_code: &str,
    ) -> StoreResult<Vec<BankSwift>>;

    /// Upsert all records atomically: either every row lands or none does
    fn save_all(&self, records: &[BankSwift]) -> StoreResult<usize>;

    fn count(&self) -> StoreResult<i64>;
}

// ============================================================================
// SQLITE STORE
// ============================================================================

const SELECT_COLUMNS: &str =
    "SELECT swift_code, country_iso2, country_name, bank_name, address, is_headquarter
     FROM bank_swift";

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database file and ensure the schema exists
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        // WAL for crash recovery
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    pub fn from_connection(conn: Connection) -> StoreResult<Self> {
        setup_database(&conn)?;
        Ok(SqliteStore { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn query_records(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> StoreResult<Vec<BankSwift>> {
        let mut stmt = self.conn.prepare(sql)?;
        let records = stmt
            .query_map(params, record_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}

pub fn setup_database(conn: &Connection) -> StoreResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS bank_swift (
            swift_code TEXT PRIMARY KEY NOT NULL,
            country_iso2 TEXT NOT NULL,
            country_name TEXT NOT NULL,
            bank_name TEXT NOT NULL,
            address TEXT NOT NULL,
            is_headquarter INTEGER NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_bank_swift_country ON bank_swift(country_iso2)",
        [],
    )?;

    Ok(())
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<BankSwift> {
    Ok(BankSwift {
        swift_code: row.get(0)?,
        country_iso2: row.get(1)?,
        country_name: row.get(2)?,
        bank_name: row.get(3)?,
        address: row.get(4)?,
        is_headquarter: row.get(5)?,
    })
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

impl SwiftStore for SqliteStore {
    fn exists_by_code(&self, code: &str) -> StoreResult<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM bank_swift WHERE swift_code = ?1)",
            [code],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn find_by_code(&self, code: &str) -> StoreResult<Option<BankSwift>> {
        let sql = format!("{} WHERE swift_code = ?1", SELECT_COLUMNS);
        Ok(self.query_records(&sql, [code])?.into_iter().next())
    }

    fn save(&self, record: &BankSwift) -> StoreResult<()> {
        let result = self.conn.execute(
            "INSERT INTO bank_swift (
                swift_code, country_iso2, country_name, bank_name, address, is_headquarter
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.swift_code,
                record.country_iso2,
                record.country_name,
                record.bank_name,
                record.address,
                record.is_headquarter,
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_constraint_violation(&e) => {
                Err(StoreError::DuplicateKey(record.swift_code.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn delete_by_code(&self, code: &str) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM bank_swift WHERE swift_code = ?1", [code])?;
        Ok(())
    }

    fn find_by_country_code(&self, country_iso2: &str) -> StoreResult<Vec<BankSwift>> {
        let sql = format!(
            "{} WHERE country_iso2 = ?1 ORDER BY swift_code",
            SELECT_COLUMNS
        );
        self.query_records(&sql, [country_iso2])
    }

    fn find_by_prefix_excluding(
        &self,
        prefix: &str,
        excluded_code: &str,
    ) -> StoreResult<Vec<BankSwift>> {
        // substr keeps the match case-sensitive, LIKE would not be
        let sql = format!(
            "{} WHERE substr(swift_code, 1, ?2) = ?1 AND swift_code <> ?3 ORDER BY swift_code",
            SELECT_COLUMNS
        );
        let prefix_len = prefix.chars().count() as i64;
        self.query_records(&sql, params![prefix, prefix_len, excluded_code])
    }

    fn save_all(&self, records: &[BankSwift]) -> StoreResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO bank_swift (
                    swift_code, country_iso2, country_name, bank_name, address, is_headquarter
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;

            for record in records {
                stmt.execute(params![
                    record.swift_code,
                    record.country_iso2,
                    record.country_name,
                    record.bank_name,
                    record.address,
                    record.is_headquarter,
                ])?;
            }
        }
        tx.commit()?;

        info!(rows = records.len(), "bulk write committed");
        Ok(records.len())
    }

    fn count(&self) -> StoreResult<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM bank_swift", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_record(code: &str, country: &str) -> BankSwift {
        BankSwift::new(code, country, "TEST COUNTRY", "Test Bank", "Test Street 1")
    }

    #[test]
    fn test_save_and_find() {
        let store = SqliteStore::open_in_memory().unwrap();
        let record = create_test_record("AAAABBCCXXX", "TT");

        store.save(&record).unwrap();

        assert!(store.exists_by_code("AAAABBCCXXX").unwrap());
        assert_eq!(store.find_by_code("AAAABBCCXXX").unwrap(), Some(record));
        assert_eq!(store.find_by_code("ZZZZZZZZXXX").unwrap(), None);
    }

    #[test]
    fn test_save_duplicate_is_rejected_by_key() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.save(&create_test_record("AAAABBCCXXX", "TT")).unwrap();

        let mut second = create_test_record("AAAABBCCXXX", "UU");
        second.bank_name = "Other Bank".to_string();

        match store.save(&second) {
            Err(StoreError::DuplicateKey(code)) => assert_eq!(code, "AAAABBCCXXX"),
            other => panic!("expected DuplicateKey, got {:?}", other),
        }

        let stored = store.find_by_code("AAAABBCCXXX").unwrap().unwrap();
        assert_eq!(stored.bank_name, "Test Bank");
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_prefix_query_excludes_self_and_other_institutions() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .save_all(&[
                create_test_record("AAAABBCCXXX", "TT"),
                create_test_record("AAAABBCC001", "TT"),
                create_test_record("AAAABBCC002", "TT"),
                create_test_record("AAAABBCDXXX", "TT"),
                create_test_record("aaaabbcc003", "TT"),
            ])
            .unwrap();

        let found = store
            .find_by_prefix_excluding("AAAABBCC", "AAAABBCCXXX")
            .unwrap();
        let codes: Vec<&str> = found.iter().map(|r| r.swift_code.as_str()).collect();

        assert_eq!(codes, vec!["AAAABBCC001", "AAAABBCC002"]);
    }

    #[test]
    fn test_find_by_country_code() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .save_all(&[
                create_test_record("AAAABBCCXXX", "TT"),
                create_test_record("DDDDEEFFXXX", "UU"),
                create_test_record("AAAABBCC001", "TT"),
            ])
            .unwrap();

        assert_eq!(store.find_by_country_code("TT").unwrap().len(), 2);
        assert_eq!(store.find_by_country_code("UU").unwrap().len(), 1);
        assert!(store.find_by_country_code("VV").unwrap().is_empty());
    }

    #[test]
    fn test_save_all_upserts() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.save_all(&[create_test_record("AAAABBCCXXX", "TT")]).unwrap();

        let mut updated = create_test_record("AAAABBCCXXX", "TT");
        updated.address = "New Street 2".to_string();
        store.save_all(&[updated]).unwrap();

        assert_eq!(store.count().unwrap(), 1);
        let stored = store.find_by_code("AAAABBCCXXX").unwrap().unwrap();
        assert_eq!(stored.address, "New Street 2");
    }

    #[test]
    fn test_delete_by_code() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.save(&create_test_record("AAAABBCCXXX", "TT")).unwrap();

        store.delete_by_code("AAAABBCCXXX").unwrap();

        assert!(!store.exists_by_code("AAAABBCCXXX").unwrap());
        assert_eq!(store.count().unwrap(), 0);
    }
}
