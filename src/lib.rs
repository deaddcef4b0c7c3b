//! Tabular data cleaner.
//!
//! Decodes CSV and Excel uploads into a [`Table`], applies the enabled
//! cleaning rules, and re-encodes the result in the upload's format.
//! [`CleaningPipeline::run`] is the single entry point; the HTTP surface in
//! `interfaces::http` wraps it with staging and downloads.

mod app;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use app::run;
pub use application::{CleaningPipeline, PreviewSampler, RuleEngine};
pub use domain::error::{AppError, Result};
pub use domain::table::{Cell, CleaningConfig, CleaningResult, PreviewSample, Table};
pub use infrastructure::format::{FileFormat, FormatAdapter};
