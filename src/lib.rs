//! REST backend that turns uploaded todo CSV files into draft events.

pub mod config;
pub mod handlers;
pub mod importer;
pub mod models;
pub mod repository;
pub mod routes;
pub mod utils;
