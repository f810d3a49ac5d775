//! Core types and operations for the mobile adaptation heuristics library.
//!
//! This crate has no HTTP or database dependencies. The remote collection and
//! the local fallback are reached through the traits in [`adapter`]; the CMS
//! and SQLite crates implement them.

// Native `async fn` in traits; the trait declarations spell out `Send` bounds.
#![allow(async_fn_in_trait)]

pub mod adapter;
pub mod catalog;
pub mod display;
pub mod error;
pub mod export;
pub mod heuristic;
pub mod history;
pub mod memory;
pub mod store;
pub mod wizard;

pub use error::{Error, Result};

#[cfg(test)]
mod tests;
