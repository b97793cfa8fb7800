use crate::cli::ui::{term_width, truncate};
use crate::models::Contact;

struct ColumnLayout {
    id_width: usize,
    name_width: usize,
    phone_width: usize,
    show_location: bool,
}

impl ColumnLayout {
    fn for_width(width: usize) -> Self {
        if width >= 80 {
            // Full display: Id | Name | Phone | Location
            ColumnLayout {
                id_width: 6,
                name_width: 28,
                phone_width: 20,
                show_location: true,
            }
        } else {
            // Compact display: Id | Name | Phone
            ColumnLayout {
                id_width: 6,
                name_width: 22,
                phone_width: width.saturating_sub(32),
                show_location: false,
            }
        }
    }
}

pub fn print_table_header() {
    println!("{}", format_header(term_width()));
}

pub fn print_contact_row(contact: &Contact) {
    println!("{}", format_row(contact, term_width()));
}

fn format_header(width: usize) -> String {
    let layout = ColumnLayout::for_width(width);
    if layout.show_location {
        format!(
            "{:<id_w$}  {:<name_w$}  {:<phone_w$}  LOCATION",
            "ID",
            "NAME",
            "PHONE",
            id_w = layout.id_width,
            name_w = layout.name_width,
            phone_w = layout.phone_width
        )
    } else {
        format!(
            "{:<id_w$}  {:<name_w$}  PHONE",
            "ID",
            "NAME",
            id_w = layout.id_width,
            name_w = layout.name_width
        )
    }
}

fn format_row(contact: &Contact, width: usize) -> String {
    let layout = ColumnLayout::for_width(width);
    let name = truncate(&contact.name, layout.name_width);
    let phone = truncate(&contact.phone_number, layout.phone_width);

    let line = if layout.show_location {
        let location = contact.location.map(|l| l.to_string()).unwrap_or_default();
        format!(
            "{:<id_w$}  {:<name_w$}  {:<phone_w$}  {}",
            contact.id,
            name,
            phone,
            location,
            id_w = layout.id_width,
            name_w = layout.name_width,
            phone_w = layout.phone_width
        )
    } else {
        format!(
            "{:<id_w$}  {:<name_w$}  {}",
            contact.id,
            name,
            phone,
            id_w = layout.id_width,
            name_w = layout.name_width
        )
    };
    line.trim_end().to_string()
}

/// Print a full contact with clean formatting (only non-empty fields)
pub fn print_full_contact(contact: &Contact) {
    println!("{}\n", contact.name);

    if !contact.phone_number.is_empty() {
        println!("  phone     {}", contact.phone_number);
    }
    if let Some(loc) = contact.location {
        println!("  location  {}", loc);
    }
    if !contact.notes.is_empty() {
        for (i, line) in contact.notes.lines().enumerate() {
            let label = if i == 0 { "notes" } else { "" };
            println!("  {:<8}  {}", label, line);
        }
    }
    println!("\n  id {}", contact.id);
}
