//! Index declaration model
//!
//! Declared composite indexes and the per-property specs they are made of.
//!
//! # Design Principles
//!
//! - Column order of a definition is load-bearing
//! - Direction and geospatial mode are mutually exclusive
//! - Canonical keys give every ordered column an explicit direction

mod definition;
mod errors;
mod property;

pub use definition::{IndexDefinition, IndexDefinitions, IndexKey};
pub use errors::{IndexError, IndexErrorCode, IndexResult, Severity};
pub use property::{Direction, Mode, PropertySpec};
