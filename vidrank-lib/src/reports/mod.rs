//! Multi-format report generation for search results
//!
//! This module provides report generators that turn the outcome of a pipeline run
//! into output formats for people and for other programs.
//!
//! # Implementation Model
//!
//! Four report generators are provided, each accessed through a `generate` function:
//! - **Console**: Terminal output with an aligned table and optional ANSI colors
//! - **CSV**: The tabular export, with a matching reader ([`parse_csv`])
//! - **Excel**: Native .xlsx format with video, summary and column legend sheets
//! - **JSON**: Machine-readable structured data, including exclusions, title words and sentiment
//!
//! All generators lay out videos by walking the static column table in
//! [`crate::columns`], so every format agrees on the column set and order.
//! Common formatting (thousands separators, truncation, file naming) lives in `common`.

mod common;
mod console;
mod csv;
mod excel;
mod json;
mod reportable_run;

pub use common::default_csv_file_name;
pub use console::{generate as generate_console, generate_suggestions as generate_console_suggestions};
pub use csv::{ExportRow, generate as generate_csv, parse_csv};
pub use excel::generate as generate_xlsx;
pub use json::generate as generate_json;
pub use reportable_run::ReportableRun;
