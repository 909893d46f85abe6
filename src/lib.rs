// Inventory dashboard core: a one-way pipeline from a spreadsheet-backed
// source to a filtered grid plus synchronized chart aggregates.
//
//   loader -> columns -> filter -> aggregate -> output
//
// Filter state is the only user-driven input; everything downstream of the
// loader is a pure function of (cached data, filter state).
pub mod aggregate;
pub mod columns;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod output;
pub mod source;
pub mod types;
pub mod util;
