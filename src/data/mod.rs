//! Data layer: core types, loading, filtering, and chart binning.
//!
//! Architecture:
//! ```text
//!  embedded iris / .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader  │  parse file → Dataset
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ Dataset  │  typed columns, category labels (Arc, immutable)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter  │  compute_view: missing-value + category predicates → FilteredView
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  engine  │  single-slot memo, invalidated by input changes
//!   └──────────┘
//!        │
//!        ▼
//!   histogram / scatter  → chart-ready series
//! ```

pub mod engine;
pub mod filter;
pub mod histogram;
pub mod loader;
pub mod model;
pub mod scatter;
