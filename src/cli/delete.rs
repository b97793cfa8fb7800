use anyhow::{bail, Result};

use crate::cli::ui::{confirm, status};
use crate::db::Database;

/// Execute the delete command
pub fn run_delete(db: &Database, id: i64, force: bool) -> Result<()> {
    let Some(contact) = db.get_contact(id)? else {
        bail!("No contact found with ID: {}", id);
    };

    if !force && !confirm(&format!("Delete {}?", contact))? {
        return Ok(());
    }

    if db.delete_contact(contact.id)? == 0 {
        bail!("No contact found with ID: {}", contact.id);
    }
    status("Deleted.");
    Ok(())
}
