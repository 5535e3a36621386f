#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for vidrank
//!
//! This library consolidates all functionality for the vidrank tool, which searches
//! YouTube for a keyword or a channel, derives age and velocity metrics for every video
//! found, and reports them.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface and orchestration
//! - [`facts`]: Raw video data and the YouTube collaborator that produces it
//! - [`pipeline`]: Normalization, derived metrics, and aggregation
//! - [`columns`]: The export column table shared by every report
//! - [`analysis`]: Title word counts and LLM suggestions
//! - [`reports`]: Report generation in multiple formats

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

#[cfg(any(debug_assertions, test))]
pub mod analysis;
#[cfg(not(any(debug_assertions, test)))]
mod analysis;

#[cfg(any(debug_assertions, test))]
pub mod columns;
#[cfg(not(any(debug_assertions, test)))]
mod columns;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

#[cfg(any(debug_assertions, test))]
pub mod facts;
#[cfg(not(any(debug_assertions, test)))]
mod facts;

#[cfg(any(debug_assertions, test))]
pub mod pipeline;
#[cfg(not(any(debug_assertions, test)))]
mod pipeline;

#[cfg(any(debug_assertions, test))]
pub mod reports;
#[cfg(not(any(debug_assertions, test)))]
mod reports;

pub use crate::commands::{Host, run};
