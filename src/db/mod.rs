use chrono::Local;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{StoreError, StoreResult};

mod contacts;
mod schema;

pub use schema::SCHEMA_VERSION;

pub struct Database {
    conn: Connection,
    reset: bool,
}

impl Database {
    /// Open the store at the configured path, creating it if needed and
    /// running migrations. A file SQLite cannot read is backed up and
    /// replaced with an empty store; `was_reset` reports that.
    pub fn open(config: &Config) -> StoreResult<Self> {
        let path = &config.db_path;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| StoreError::Unavailable {
                    path: path.clone(),
                    source: Box::new(e),
                })?;
            }
        }

        match Self::open_file(config) {
            Ok(db) => Ok(db),
            Err(e) if e.kind().needs_recreate() => {
                warn!(path = %path.display(), error = %e, "contact store unreadable, recreating");
                backup_corrupt_file(path, &config.backup_dir)?;
                remove_database_files(path)?;

                let mut db = Self::open_file(config)?;
                db.reset = true;
                Ok(db)
            }
            Err(e) => Err(e),
        }
    }

    /// Open in-memory database for testing
    pub fn open_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn, reset: false };
        db.migrate()?;
        db.ensure_table()?;
        Ok(db)
    }

    /// True when opening this store discarded previously stored contacts,
    /// either by replacing an unreadable file or by the lossy schema fallback.
    pub fn was_reset(&self) -> bool {
        self.reset
    }

    fn open_file(config: &Config) -> StoreResult<Self> {
        let path = &config.db_path;
        let unavailable = |source: rusqlite::Error| StoreError::Unavailable {
            path: path.clone(),
            source: Box::new(source),
        };

        let conn = Connection::open(path).map_err(unavailable)?;
        conn.busy_timeout(config.busy_timeout).map_err(unavailable)?;

        let mut db = Self { conn, reset: false };
        db.migrate()?;
        db.ensure_table()?;
        debug!(path = %path.display(), "contact store open");
        Ok(db)
    }

    fn migrate(&mut self) -> StoreResult<()> {
        let version = self.get_schema_version()?;

        if version > SCHEMA_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: version,
                supported: SCHEMA_VERSION,
            });
        }

        for migration in schema::MIGRATIONS.iter().filter(|m| m.version > version) {
            debug!(version = migration.version, "applying migration: {}", migration.description);

            // Run each step in its own transaction so a failure leaves the previous version intact
            let result = (|| -> rusqlite::Result<()> {
                let tx = self.conn.unchecked_transaction()?;
                (migration.apply)(&tx)?;
                tx.pragma_update(None, "user_version", migration.version)?;
                tx.commit()
            })();

            match result {
                Ok(()) => {}
                Err(e) if migration.reset_on_failure => {
                    warn!(
                        version = migration.version,
                        error = %e,
                        "migration failed, dropping and recreating contacts table"
                    );
                    self.recreate_table()?;
                    self.reset = true;
                    break;
                }
                Err(source) => {
                    return Err(StoreError::Migration {
                        version: migration.version,
                        source,
                    })
                }
            }
        }

        if version < SCHEMA_VERSION {
            info!(from = version, to = SCHEMA_VERSION, "contact store schema upgraded");
        }

        Ok(())
    }

    fn get_schema_version(&self) -> StoreResult<i32> {
        let version = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;
        Ok(version)
    }

    /// Create the contacts table at its current shape if it is missing.
    fn ensure_table(&self) -> StoreResult<()> {
        self.conn.execute_batch(schema::CREATE_CONTACTS)?;
        Ok(())
    }

    /// Lossy fallback: replace the contacts table with an empty one at the current version.
    fn recreate_table(&self) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        schema::drop_contacts(&tx)?;
        tx.execute_batch(schema::CREATE_CONTACTS)?;
        tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        tx.commit()?;
        Ok(())
    }
}

/// Copy an unreadable database aside as `corrupt_<name>_<timestamp>` for later inspection.
fn backup_corrupt_file(path: &Path, backup_dir: &Path) -> StoreResult<Option<PathBuf>> {
    if !path.exists() {
        return Ok(None);
    }

    std::fs::create_dir_all(backup_dir)?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| crate::config::DATABASE_NAME.to_string());
    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    let backup = backup_dir.join(format!("corrupt_{}_{}", name, timestamp));

    std::fs::copy(path, &backup)?;
    info!(backup = %backup.display(), "backed up unreadable contact store");
    Ok(Some(backup))
}

fn remove_database_files(path: &Path) -> StoreResult<()> {
    let mut sidecars = Vec::new();
    for suffix in ["-journal", "-wal", "-shm"] {
        let mut name = path.as_os_str().to_owned();
        name.push(suffix);
        sidecars.push(PathBuf::from(name));
    }

    for file in std::iter::once(path.to_path_buf()).chain(sidecars) {
        match std::fs::remove_file(&file) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Contact, Location};
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> Config {
        Config::at(dir.path().join("contacts_db"))
    }

    fn columns(db: &Database) -> Vec<String> {
        db.conn
            .prepare("PRAGMA table_info(contacts)")
            .unwrap()
            .query_map([], |row| row.get("name"))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect()
    }

    #[test]
    fn test_open_memory() {
        let db = Database::open_memory().unwrap();
        assert_eq!(db.get_schema_version().unwrap(), SCHEMA_VERSION);
        assert!(!db.was_reset());
    }

    #[test]
    fn test_table_has_current_columns() {
        let db = Database::open_memory().unwrap();
        assert_eq!(
            columns(&db),
            vec!["id", "name", "phone", "notes", "latitude", "longitude"]
        );
    }

    #[test]
    fn test_open_creates_file_and_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let config = Config::at(dir.path().join("nested").join("contacts_db"));

        let db = Database::open(&config).unwrap();
        assert!(config.db_path.exists());
        assert_eq!(db.get_schema_version().unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_uncreatable_parent_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let config = Config::at(blocker.join("contacts_db"));
        match Database::open(&config) {
            Err(StoreError::Unavailable { path, .. }) => assert_eq!(path, config.db_path),
            Err(e) => panic!("expected Unavailable, got {e}"),
            Ok(_) => panic!("expected open to fail"),
        }
    }

    #[test]
    fn test_reopen_keeps_contacts() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        let id = {
            let db = Database::open(&config).unwrap();
            db.create_contact(&Contact::new("Alice", "555", "")).unwrap()
        };

        let db = Database::open(&config).unwrap();
        assert!(!db.was_reset());
        assert_eq!(db.get_contact(id).unwrap().unwrap().name, "Alice");
    }

    #[test]
    fn test_upgrade_from_v1_keeps_rows() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        {
            let conn = Connection::open(&config.db_path).unwrap();
            conn.execute_batch(
                "CREATE TABLE contacts (id INTEGER PRIMARY KEY, name TEXT, phone TEXT, notes TEXT);
                 INSERT INTO contacts (id, name, phone, notes) VALUES (7, 'Old Timer', '555-0199', 'from v1');
                 PRAGMA user_version = 1;",
            )
            .unwrap();
        }

        let db = Database::open(&config).unwrap();
        assert!(!db.was_reset());
        assert_eq!(db.get_schema_version().unwrap(), 2);
        assert!(columns(&db).contains(&"latitude".to_string()));
        assert!(columns(&db).contains(&"longitude".to_string()));

        let old = db.get_contact(7).unwrap().unwrap();
        assert_eq!(old.name, "Old Timer");
        assert_eq!(old.phone_number, "555-0199");
        assert_eq!(old.notes, "from v1");
        assert!(!old.has_location());

        // Upgraded rows accept a location
        let mut moved = old.clone();
        moved.set_location(Location::new(48.0, 11.0).unwrap());
        assert_eq!(db.update_contact(&moved).unwrap(), 1);
        assert!(db.get_contact(7).unwrap().unwrap().has_location());
    }

    #[test]
    fn test_unversioned_file_with_current_table() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        {
            let conn = Connection::open(&config.db_path).unwrap();
            conn.execute_batch(schema::CREATE_CONTACTS).unwrap();
            conn.execute(
                "INSERT INTO contacts (name, phone, notes, latitude, longitude) VALUES ('Kept', '', '', 1.0, 2.0)",
                [],
            )
            .unwrap();
        }

        let db = Database::open(&config).unwrap();
        assert!(!db.was_reset());
        let all = db.list_contacts().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].location, Some(Location { latitude: 1.0, longitude: 2.0 }));
    }

    #[test]
    fn test_failed_column_add_recreates_table() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        {
            // A view cannot take new columns, so the V2 step fails
            let conn = Connection::open(&config.db_path).unwrap();
            conn.execute_batch(
                "CREATE TABLE people (id INTEGER PRIMARY KEY, name TEXT, phone TEXT, notes TEXT);
                 CREATE VIEW contacts AS SELECT id, name, phone, notes FROM people;
                 PRAGMA user_version = 1;",
            )
            .unwrap();
        }

        let db = Database::open(&config).unwrap();
        assert!(db.was_reset());
        assert_eq!(db.get_schema_version().unwrap(), SCHEMA_VERSION);
        assert_eq!(db.count_contacts().unwrap(), 0);

        let id = db.create_contact(&Contact::new("Fresh", "", "")).unwrap();
        assert!(db.get_contact(id).unwrap().is_some());
    }

    #[test]
    fn test_newer_schema_is_refused() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        {
            let conn = Connection::open(&config.db_path).unwrap();
            conn.execute_batch("PRAGMA user_version = 99;").unwrap();
        }

        match Database::open(&config) {
            Err(StoreError::UnsupportedVersion { found, supported }) => {
                assert_eq!(found, 99);
                assert_eq!(supported, SCHEMA_VERSION);
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("newer schema should be refused"),
        }
    }

    #[test]
    fn test_corrupt_file_is_backed_up_and_recreated() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        std::fs::write(&config.db_path, vec![b'x'; 4096]).unwrap();

        let db = Database::open(&config).unwrap();
        assert!(db.was_reset());
        assert_eq!(db.count_contacts().unwrap(), 0);

        let backups: Vec<_> = std::fs::read_dir(&config.backup_dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(backups.len(), 1);
        assert!(backups[0].starts_with("corrupt_contacts_db_"));
    }

    #[test]
    fn test_remove_database_files_ignores_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("contacts_db");
        std::fs::write(&path, b"data").unwrap();
        std::fs::write(dir.path().join("contacts_db-journal"), b"j").unwrap();

        remove_database_files(&path).unwrap();
        assert!(!path.exists());
        assert!(!dir.path().join("contacts_db-journal").exists());
    }
}
