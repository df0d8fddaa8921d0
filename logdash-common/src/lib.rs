//! # logdash Common Library
//!
//! The reporting pipeline behind the logistics dashboard:
//! - CSV loading and column normalization
//! - Best-effort date parsing
//! - Outcome classification (`RESULTADO`)
//! - Filtering and summary aggregation
//! - CSV export of a filtered view
//! - Dataset caching and configuration loading

pub mod aggregate;
pub mod cache;
pub mod columns;
pub mod config;
pub mod dataset;
pub mod dates;
pub mod error;
pub mod export;
pub mod filter;
pub mod outcome;
pub mod pipeline;

pub use aggregate::Summary;
pub use cache::DatasetCache;
pub use dataset::{Cell, Dataset, LoadOptions, TripRecord};
pub use error::{Error, Result};
pub use filter::{DateRange, FilterSelection, FilteredView};
pub use outcome::{Indicator, Resultado};
pub use pipeline::{filter_options, run_pipeline, FilterOptions, PipelineOutput};
