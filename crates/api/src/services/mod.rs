pub mod admin;
pub mod campaign;
pub mod donation;
pub mod error;
pub mod ngo;
pub mod organization;
pub mod volunteer;

pub use error::*;
