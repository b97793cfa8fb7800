use rusqlite::{params, OptionalExtension, Row};
use tracing::{debug, warn};

use super::Database;
use crate::error::{FailureKind, StoreResult};
use crate::models::{Contact, Location};

impl Database {
    // ==================== CONTACT CREATE ====================

    /// Insert a new contact and return its assigned id. Any id already set on
    /// `contact` is ignored. If the table has gone missing it is recreated and
    /// the insert is attempted once more.
    pub fn create_contact(&self, contact: &Contact) -> StoreResult<i64> {
        match self.insert_contact(contact) {
            Ok(id) => Ok(id),
            Err(e) if FailureKind::of(&e) == FailureKind::MissingTable => {
                warn!(error = %e, "contacts table missing on insert, recreating");
                self.ensure_table()?;
                Ok(self.insert_contact(contact)?)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn insert_contact(&self, contact: &Contact) -> rusqlite::Result<i64> {
        let tx = self.conn.unchecked_transaction()?;
        // Location columns are always written, NULL when there is no location
        tx.execute(
            "INSERT INTO contacts (name, phone, notes, latitude, longitude) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                contact.name,
                contact.phone_number,
                contact.notes,
                contact.latitude(),
                contact.longitude(),
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        debug!(id, "contact created");
        Ok(id)
    }

    // ==================== CONTACT READ ====================

    pub fn get_contact(&self, id: i64) -> StoreResult<Option<Contact>> {
        let result = self
            .conn
            .query_row(
                "SELECT id, name, phone, notes, latitude, longitude FROM contacts WHERE id = ?",
                [id],
                Self::row_to_contact,
            )
            .optional();
        self.or_recreate_table(result, None)
    }

    /// All contacts ordered by name, case-insensitively.
    pub fn list_contacts(&self) -> StoreResult<Vec<Contact>> {
        let result = self.query_contacts(
            "SELECT id, name, phone, notes, latitude, longitude FROM contacts
             ORDER BY name COLLATE NOCASE ASC, id ASC",
        );

        self.or_recreate_table(result, Vec::new())
    }

    fn query_contacts(&self, sql: &str) -> rusqlite::Result<Vec<Contact>> {
        let mut stmt = self.conn.prepare(sql)?;
        let contacts = stmt
            .query_map([], Self::row_to_contact)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(contacts)
    }

    pub fn count_contacts(&self) -> StoreResult<usize> {
        let result = self
            .conn
            .query_row("SELECT COUNT(*) FROM contacts", [], |row| row.get::<_, i64>(0));
        let count = self.or_recreate_table(result, 0)?;
        Ok(count as usize)
    }

    // ==================== CONTACT UPDATE ====================

    /// Replace name, phone, notes and location of the row with `contact.id`.
    /// Returns the number of rows changed; 0 means no such contact.
    pub fn update_contact(&self, contact: &Contact) -> StoreResult<usize> {
        let rows = self.or_recreate_table(self.write_contact(contact), 0)?;
        if rows == 0 {
            debug!(id = contact.id, "update matched no contact");
        }
        Ok(rows)
    }

    fn write_contact(&self, contact: &Contact) -> rusqlite::Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let rows = tx.execute(
            r#"UPDATE contacts SET
                name = ?1, phone = ?2, notes = ?3, latitude = ?4, longitude = ?5
               WHERE id = ?6"#,
            params![
                contact.name,
                contact.phone_number,
                contact.notes,
                contact.latitude(),
                contact.longitude(),
                contact.id,
            ],
        )?;
        tx.commit()?;
        Ok(rows)
    }

    // ==================== CONTACT DELETE ====================

    pub fn delete_contact(&self, id: i64) -> StoreResult<usize> {
        let result = (|| -> rusqlite::Result<usize> {
            let tx = self.conn.unchecked_transaction()?;
            let rows = tx.execute("DELETE FROM contacts WHERE id = ?", [id])?;
            tx.commit()?;
            Ok(rows)
        })();
        let rows = self.or_recreate_table(result, 0)?;

        debug!(id, rows, "contact delete");
        Ok(rows)
    }

    // ==================== RECOVERY ====================

    /// A missing table means nothing is stored: recreate it empty and answer
    /// with `empty`. Any other failure propagates.
    fn or_recreate_table<T>(&self, result: rusqlite::Result<T>, empty: T) -> StoreResult<T> {
        match result {
            Ok(value) => Ok(value),
            Err(e) if FailureKind::of(&e) == FailureKind::MissingTable => {
                warn!(error = %e, "contacts table missing, recreating empty");
                self.ensure_table()?;
                Ok(empty)
            }
            Err(e) => Err(e.into()),
        }
    }

    // ==================== ROW MAPPERS ====================

    fn row_to_contact(row: &Row) -> rusqlite::Result<Contact> {
        let latitude: Option<f64> = row.get("latitude")?;
        let longitude: Option<f64> = row.get("longitude")?;

        Ok(Contact {
            id: row.get("id")?,
            name: row.get::<_, Option<String>>("name")?.unwrap_or_default(),
            phone_number: row.get::<_, Option<String>>("phone")?.unwrap_or_default(),
            notes: row.get::<_, Option<String>>("notes")?.unwrap_or_default(),
            location: Location::from_parts(latitude, longitude),
        })
    }
}
