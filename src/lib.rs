pub mod api_store;
pub mod cli;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod file;
pub mod gallery;
pub mod memory_store;
pub mod model;
pub mod recorder;
pub mod store;
pub mod sync_error;
pub mod utils;
pub mod vignettes;
