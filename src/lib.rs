pub mod config;
pub mod errors;
pub mod portfolio;
pub mod ui;
