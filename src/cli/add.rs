use anyhow::Result;

use crate::cli::ui::{prompt_field_optional, FormResult};
use crate::cli::{AddArgs, LocationArgs};
use crate::db::Database;
use crate::error::ValidationError;
use crate::models::{format_phone, Contact, Location};

/// Execute the add command
pub fn run_add(db: &Database, args: AddArgs) -> Result<()> {
    // Without a name, collect everything interactively
    let args = if args.name.is_none() {
        match interactive_mode(args)? {
            Some(a) => a,
            None => {
                println!("Cancelled.");
                return Ok(());
            }
        }
    } else {
        args
    };

    let contact = build_contact(&args)?;
    let id = db.create_contact(&contact)?;

    println!("Contact added successfully: {} (id {})", contact.name, id);
    Ok(())
}

/// Turn command-line input into a validated, not yet stored contact.
pub fn build_contact(args: &AddArgs) -> Result<Contact, ValidationError> {
    let name = args.name.as_deref().unwrap_or("").trim();
    let phone = format_phone(args.country_code.as_deref(), args.phone.as_deref().unwrap_or(""));
    let notes = args.notes.as_deref().unwrap_or("").trim();

    let mut contact = Contact::new(name, phone, notes);
    if let Some(location) = parse_location(&args.location)? {
        contact.set_location(location);
    }

    contact.validate()?;
    Ok(contact)
}

/// `None` when neither coordinate was given.
pub fn parse_location(args: &LocationArgs) -> Result<Option<Location>, ValidationError> {
    if !args.is_set() {
        return Ok(None);
    }
    let lat = args.lat.as_deref().unwrap_or("");
    let lon = args.lon.as_deref().unwrap_or("");
    Location::parse(lat, lon).map(Some)
}

/// Blank or `-` at a latitude prompt means the contact has no location.
pub fn skips_location(input: &str) -> bool {
    let input = input.trim();
    input.is_empty() || input == "-"
}

fn interactive_mode(mut args: AddArgs) -> Result<Option<AddArgs>> {
    let ask = |field: &str| -> Result<Option<String>> {
        match prompt_field_optional(field)? {
            FormResult::Value(v) => Ok(Some(v)),
            FormResult::Cancelled => Ok(None),
        }
    };

    let Some(name) = ask("name")? else { return Ok(None) };
    args.name = Some(name);

    if args.phone.is_none() {
        let Some(phone) = ask("phone")? else { return Ok(None) };
        args.phone = Some(phone);
    }
    if args.notes.is_none() {
        let Some(notes) = ask("notes")? else { return Ok(None) };
        args.notes = Some(notes);
    }
    if !args.location.is_set() {
        let Some(lat) = ask("latitude (blank for none)")? else { return Ok(None) };
        if !skips_location(&lat) {
            let Some(lon) = ask("longitude")? else { return Ok(None) };
            args.location = LocationArgs {
                lat: Some(lat),
                lon: Some(lon),
            };
        }
    }

    Ok(Some(args))
}
