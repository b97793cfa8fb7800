use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod add;
pub mod delete;
pub mod display;
pub mod list;
pub mod show;
pub mod ui;
pub mod update;

pub use add::run_add;
pub use delete::run_delete;
pub use list::run_list;
pub use show::run_show;
pub use update::run_update;

#[derive(Parser)]
#[command(name = "takcontacts")]
#[command(about = "Field contact book with optional geolocation")]
#[command(version)]
pub struct Cli {
    /// Path to the contacts database (default: platform data dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,
    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List contacts, optionally filtered by name
    List(ListArgs),
    /// Show full details for a contact
    Show(ShowArgs),
    /// Add a new contact
    Add(AddArgs),
    /// Edit an existing contact
    Edit(EditArgs),
    /// Delete a contact
    Delete(DeleteArgs),
}

#[derive(Args, Default)]
pub struct ListArgs {
    /// Only show contacts whose name contains this text (case-insensitive)
    #[arg(short, long)]
    pub search: Option<String>,
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    pub id: i64,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Default)]
pub struct AddArgs {
    #[arg(short, long)]
    pub name: Option<String>,
    #[arg(short, long)]
    pub phone: Option<String>,
    /// Dialling prefix joined onto the phone number, e.g. +49
    #[arg(short, long, value_name = "CODE")]
    pub country_code: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
    #[command(flatten)]
    pub location: LocationArgs,
}

#[derive(Args, Default)]
pub struct EditArgs {
    pub id: i64,
    #[arg(short, long)]
    pub name: Option<String>,
    #[arg(short, long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
    #[command(flatten)]
    pub location: LocationArgs,
    /// Remove the stored location
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    pub clear_location: bool,
}

#[derive(Args, Default)]
pub struct LocationArgs {
    /// Latitude in decimal degrees (-90..90)
    #[arg(long, allow_hyphen_values = true, requires = "lon")]
    pub lat: Option<String>,
    /// Longitude in decimal degrees (-180..180)
    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    pub lon: Option<String>,
}

impl LocationArgs {
    pub fn is_set(&self) -> bool {
        self.lat.is_some() || self.lon.is_some()
    }
}

#[derive(Args)]
pub struct DeleteArgs {
    pub id: i64,
    /// Skip confirmation
    #[arg(short, long)]
    pub force: bool,
}
