//! Remote persistence for the heuristics library: a hosted data-items
//! collection reached over HTTP.
//!
//! [`CmsAdapter`] implements
//! [`PersistenceAdapter`](heuristics_core::adapter::PersistenceAdapter).
//! [`CollectionConfig`] names the collection and the [`FieldShape`] its items
//! use.

mod client;
mod config;
mod shape;

pub mod error;

pub use client::CmsAdapter;
pub use config::{CollectionConfig, FieldShape};
pub use error::{Error, Result};
pub use shape::{from_item, to_item};
