//! index_advisor - composite index requirements for document queries
//!
//! Given a query against a schemaless document store, derives whether a
//! declared composite index is needed, what it must contain, and which
//! index is still missing given the ones already declared.

pub mod cli;
pub mod index;
pub mod observability;
pub mod planner;
