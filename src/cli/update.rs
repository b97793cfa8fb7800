use anyhow::{bail, Result};

use crate::cli::add::{parse_location, skips_location};
use crate::cli::ui::{prompt_field, FormResult};
use crate::cli::{EditArgs, LocationArgs};
use crate::db::Database;
use crate::error::ValidationError;
use crate::models::Contact;

/// Execute the edit command
pub fn run_update(db: &Database, args: EditArgs) -> Result<()> {
    let Some(contact) = db.get_contact(args.id)? else {
        bail!("No contact found with ID: {}", args.id);
    };

    let no_changes = args.name.is_none()
        && args.phone.is_none()
        && args.notes.is_none()
        && !args.location.is_set()
        && !args.clear_location;

    let args = if no_changes {
        match interactive_mode(&contact, args)? {
            Some(a) => a,
            None => {
                println!("Cancelled.");
                return Ok(());
            }
        }
    } else {
        args
    };

    let updated = apply_edits(&contact, &args)?;
    if updated == contact {
        println!("No changes.");
        return Ok(());
    }

    if db.update_contact(&updated)? == 0 {
        bail!("No contact found with ID: {}", updated.id);
    }
    println!("Contact updated successfully.");
    Ok(())
}

/// Apply the requested edits to a copy of `contact`. The id is never changed.
pub fn apply_edits(contact: &Contact, args: &EditArgs) -> Result<Contact, ValidationError> {
    let mut updated = contact.clone();

    if let Some(ref name) = args.name {
        updated.name = name.trim().to_string();
    }
    if let Some(ref phone) = args.phone {
        updated.phone_number = phone.trim().to_string();
    }
    if let Some(ref notes) = args.notes {
        updated.notes = notes.trim().to_string();
    }

    if args.clear_location {
        updated.clear_location();
    } else if let Some(location) = parse_location(&args.location)? {
        updated.set_location(location);
    }

    updated.validate()?;
    Ok(updated)
}

fn interactive_mode(contact: &Contact, mut args: EditArgs) -> Result<Option<EditArgs>> {
    let ask = |field: &str, current: &str| -> Result<Option<String>> {
        match prompt_field(field, Some(current))? {
            FormResult::Value(v) => Ok(Some(v)),
            FormResult::Cancelled => Ok(None),
        }
    };

    let Some(name) = ask("name", &contact.name)? else { return Ok(None) };
    let Some(phone) = ask("phone", &contact.phone_number)? else { return Ok(None) };
    let Some(notes) = ask("notes", &contact.notes)? else { return Ok(None) };

    let lat_now = contact.latitude().map(|v| v.to_string()).unwrap_or_default();
    let lon_now = contact.longitude().map(|v| v.to_string()).unwrap_or_default();
    let Some(lat) = ask("latitude", &lat_now)? else { return Ok(None) };

    if skips_location(&lat) {
        args.clear_location = true;
    } else {
        let Some(lon) = ask("longitude", &lon_now)? else { return Ok(None) };
        args.location = LocationArgs {
            lat: Some(lat),
            lon: Some(lon),
        };
    }

    args.name = Some(name);
    args.phone = Some(phone);
    args.notes = Some(notes);
    Ok(Some(args))
}
