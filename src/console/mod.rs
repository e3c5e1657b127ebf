//! Client-side catalog management engine: the in-memory projection with its
//! filter/sort/search pipeline, and the batch import pipeline.

pub mod import;
pub mod view;

pub use import::{BatchImporter, ImportReport, RowOutcome};
pub use view::{CatalogStats, CatalogView, FilterCriteria, FilterOptions, SortKey};
