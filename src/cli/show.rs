use anyhow::{bail, Result};

use crate::cli::display::print_full_contact;
use crate::db::Database;

/// Execute the show command
pub fn run_show(db: &Database, id: i64, json: bool) -> Result<()> {
    let Some(contact) = db.get_contact(id)? else {
        bail!("No contact found with ID: {}", id);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&contact)?);
    } else {
        print_full_contact(&contact);
    }
    Ok(())
}
