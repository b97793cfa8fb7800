mod contact;
mod location;

pub use contact::{format_phone, Contact};
pub use location::{Location, LATITUDE_RANGE, LONGITUDE_RANGE};
