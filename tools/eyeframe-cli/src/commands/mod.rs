pub mod config;
pub mod rail;
pub mod simulate;
pub mod validate;
