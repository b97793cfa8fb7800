use rusqlite::{Connection, OptionalExtension};

/// Highest `PRAGMA user_version` this build knows how to produce.
pub const SCHEMA_VERSION: i32 = 2;

pub const TABLE_CONTACTS: &str = "contacts";

/// Columns added in V2. Nullable so older rows carry no location.
pub const LOCATION_COLUMNS: [&str; 2] = ["latitude", "longitude"];

/// Current shape of the contacts table
pub const CREATE_CONTACTS: &str = r#"
CREATE TABLE IF NOT EXISTS contacts (
    id INTEGER PRIMARY KEY,
    name TEXT,
    phone TEXT,
    notes TEXT,
    latitude REAL,
    longitude REAL
);
"#;

/// V1: the contacts table as first released, without location
pub const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS contacts (
    id INTEGER PRIMARY KEY,
    name TEXT,
    phone TEXT,
    notes TEXT
);
"#;

/// One step of the schema history. `apply` must be safe to run against a
/// database that already has some or all of its effect.
pub struct Migration {
    pub version: i32,
    pub description: &'static str,
    pub apply: fn(&Connection) -> rusqlite::Result<()>,
    /// Drop and recreate the table when this step cannot be applied.
    /// Loses every stored contact.
    pub reset_on_failure: bool,
}

pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "create contacts table",
        apply: migrate_v1,
        reset_on_failure: false,
    },
    Migration {
        version: 2,
        description: "add latitude/longitude columns",
        apply: migrate_v2,
        reset_on_failure: true,
    },
];

fn migrate_v1(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_V1)
}

fn migrate_v2(conn: &Connection) -> rusqlite::Result<()> {
    for column in LOCATION_COLUMNS {
        if !column_exists(conn, TABLE_CONTACTS, column)? {
            conn.execute_batch(&format!(
                "ALTER TABLE {} ADD COLUMN {} REAL;",
                TABLE_CONTACTS, column
            ))?;
        }
    }
    Ok(())
}

pub fn column_exists(conn: &Connection, table: &str, column: &str) -> rusqlite::Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(names.iter().any(|n| n == column))
}

/// Remove whatever object currently owns the contacts name, table or view.
pub fn drop_contacts(conn: &Connection) -> rusqlite::Result<()> {
    let kind: Option<String> = conn
        .query_row(
            "SELECT type FROM sqlite_master WHERE name = ?1",
            [TABLE_CONTACTS],
            |row| row.get(0),
        )
        .optional()?;

    match kind.as_deref() {
        Some("view") => conn.execute_batch(&format!("DROP VIEW {};", TABLE_CONTACTS)),
        Some(_) => conn.execute_batch(&format!("DROP TABLE {};", TABLE_CONTACTS)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_ordered_and_end_at_current_version() {
        let versions: Vec<i32> = MIGRATIONS.iter().map(|m| m.version).collect();
        let expected: Vec<i32> = (1..=SCHEMA_VERSION).collect();
        assert_eq!(versions, expected);
    }

    #[test]
    fn test_migrate_v2_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate_v1(&conn).unwrap();
        migrate_v2(&conn).unwrap();
        migrate_v2(&conn).unwrap();

        assert!(column_exists(&conn, TABLE_CONTACTS, "latitude").unwrap());
        assert!(column_exists(&conn, TABLE_CONTACTS, "longitude").unwrap());
    }

    #[test]
    fn test_migrate_v2_adds_only_missing_column() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE contacts (id INTEGER PRIMARY KEY, name TEXT, phone TEXT, notes TEXT, latitude REAL);",
        )
        .unwrap();

        migrate_v2(&conn).unwrap();
        assert!(column_exists(&conn, TABLE_CONTACTS, "longitude").unwrap());
    }

    #[test]
    fn test_drop_contacts_handles_table_view_and_absence() {
        let conn = Connection::open_in_memory().unwrap();
        drop_contacts(&conn).unwrap();

        conn.execute_batch(CREATE_CONTACTS).unwrap();
        drop_contacts(&conn).unwrap();
        assert!(!column_exists(&conn, TABLE_CONTACTS, "id").unwrap());

        conn.execute_batch("CREATE VIEW contacts AS SELECT 1 AS id;").unwrap();
        drop_contacts(&conn).unwrap();
        assert!(!column_exists(&conn, TABLE_CONTACTS, "id").unwrap());
    }
}
