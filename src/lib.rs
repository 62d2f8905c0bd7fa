//! Tradeport - multi-market trade spreadsheet importer
//!
//! This library ingests heterogeneous trade records from CSV/Excel files,
//! validates each row, infers missing classification fields (asset type,
//! venue, settlement currency), normalizes physical units, and submits the
//! selected valid rows as one bulk request to a portfolio backend.

pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod import;
pub mod models;
pub mod submit;
pub mod units;
pub mod utils;
