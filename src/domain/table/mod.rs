// ============================================================
// TABLE DOMAIN LAYER
// ============================================================
// Core value types for the cleaning pipeline
// No I/O, no async, no format knowledge

mod cell;
mod cleaning_config;
mod preview;
mod data_table;

pub use cell::Cell;
pub use cleaning_config::CleaningConfig;
pub use preview::{CleaningResult, PreviewRow, PreviewSample};
pub use data_table::{first_duplicate, Row, Table};
