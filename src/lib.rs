//! sheetdash - terminal dashboard over published Google Sheets
//!
//! Resolves a category/country/region/month selection to a sheet's CSV
//! export URL, fetches and parses it, and keeps parsed tables in an
//! in-memory cache for a fixed TTL.

pub mod cache;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod fetch;
pub mod table;
pub mod ui;

pub use error::{DashError, DashResult};
