use anyhow::Result;

use crate::cli::display::{print_contact_row, print_table_header};
use crate::db::Database;
use crate::filter::ContactFilter;

/// Execute the list command
pub fn run_list(db: &Database, search: Option<&str>, json: bool) -> Result<()> {
    let view = load_view(db, search)?;

    if json {
        println!("{}", serde_json::to_string_pretty(view.visible())?);
        return Ok(());
    }

    if let Some(empty) = view.empty_state() {
        println!("{}", empty);
        return Ok(());
    }

    if let Some(q) = view.query() {
        println!("Contacts matching {:?} ({} of {})\n", q, view.count(), view.total());
    } else {
        println!("Contacts ({} total)\n", view.total());
    }

    print_table_header();
    for contact in view.visible() {
        print_contact_row(contact);
    }

    Ok(())
}

/// Load a fresh snapshot from the store and apply the search, if any.
pub fn load_view(db: &Database, search: Option<&str>) -> Result<ContactFilter> {
    let mut view = ContactFilter::new(db.list_contacts()?);
    if let Some(q) = search {
        view.filter(q);
    }
    Ok(view)
}
