pub mod admin;
pub mod auth;
pub mod campaigns;
pub mod donations;
pub mod health;
pub mod models;
pub mod ngos;
pub mod organization;
pub mod volunteer;
