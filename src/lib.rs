//! Core library for the misc-expense command line application.
//!
//! The library recovers billing records from a worksheet, fetches their
//! miscellaneous expense line items from a relational store, and writes the
//! per-category totals back next to each record. Responsibilities are kept
//! narrow: workbook and store adapters live under [`io`], the record types in
//! [`model`], the three pipeline stages in [`scan`], [`aggregate`] and
//! [`project`], and the orchestration that ties them together in
//! [`pipeline`].

pub mod aggregate;
pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod project;
pub mod scan;

pub use error::{ExpenseError, Result};
