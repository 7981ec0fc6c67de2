use rusqlite::{Connection, OptionalExtension, Result, params};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use super::models::Contact;
use crate::error::ServiceError;

pub struct Database {
    conn: Mutex<Connection>,
    path: String,
}

/// Resolve a DATABASE_URL into a SQLite location.
///
/// Accepts a bare path, `sqlite://PATH`, `sqlite:PATH`, or `:memory:`.
/// Any other scheme is rejected.
pub fn parse_database_url(url: &str) -> Result<String, ServiceError> {
    let url = url.trim();
    let location = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url);

    if location.is_empty() {
        return Err(ServiceError::config("DATABASE_URL is empty"));
    }
    if let Some((scheme, _)) = location.split_once("://") {
        return Err(ServiceError::config(format!(
            "Unsupported database scheme '{}': expected a SQLite path or sqlite:// URL",
            scheme
        )));
    }
    Ok(location.to_string())
}

impl Database {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let conn = Connection::open(&path)?;
        let db = Database { conn: Mutex::new(conn), path: path_str };
        db.init()?;
        Ok(db)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn: Mutex::new(conn), path: ":memory:".to_string() };
        db.init()?;
        Ok(db)
    }

    /// Open the store named by a DATABASE_URL
    pub fn open(url: &str) -> Result<Self, ServiceError> {
        let location = parse_database_url(url)?;
        let db = if location == ":memory:" {
            Self::in_memory()?
        } else {
            Self::new(&location)?
        };
        Ok(db)
    }

    pub fn get_path(&self) -> String {
        self.path.clone()
    }

    // A panic while holding the lock cannot leave a half-applied statement,
    // so a poisoned connection is still usable.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn init(&self) -> Result<()> {
        let conn = self.conn();

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS contacts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                phone_number TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_contacts_name ON contacts(name);
            "
        )?;

        Ok(())
    }

    fn row_to_contact(row: &rusqlite::Row) -> Result<Contact> {
        Ok(Contact {
            id: row.get(0)?,
            name: row.get(1)?,
            phone_number: row.get(2)?,
        })
    }

    /// Insert a contact and return it with its assigned id
    pub fn create_contact(&self, name: &str, phone_number: &str) -> Result<Contact> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO contacts (name, phone_number) VALUES (?1, ?2)",
            params![name, phone_number],
        )?;
        Ok(Contact {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            phone_number: phone_number.to_string(),
        })
    }

    /// First contact with this exact name (lowest id among duplicates)
    pub fn find_contact_by_name(&self, name: &str) -> Result<Option<Contact>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, name, phone_number FROM contacts WHERE name = ?1 ORDER BY id ASC LIMIT 1",
            params![name],
            Self::row_to_contact,
        ).optional()
    }

    /// Most recently created contact (highest id), None when the table is empty
    pub fn find_latest_contact(&self) -> Result<Option<Contact>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, name, phone_number FROM contacts ORDER BY id DESC LIMIT 1",
            [],
            Self::row_to_contact,
        ).optional()
    }

    pub fn count_contacts(&self) -> Result<usize> {
        let conn = self.conn();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM contacts", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
