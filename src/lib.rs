//! Reactive species measurement dashboard.
//!
//! A dataset is loaded once, the sidebar controls feed an [`input::InputState`],
//! and a memoised [`data::engine::FilteredViewEngine`] derives the rows every
//! table and chart draws.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod input;
pub mod state;
pub mod ui;
