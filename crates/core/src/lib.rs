//! Dealflow core - domain types, configuration, and the error taxonomy
//!
//! This crate holds everything the rest of the workspace agrees on and
//! nothing that does I/O:
//! - the `Deal` record and its fixed field↔column table (`domain`)
//! - the closed `Action` union parsed from model output (`domain::action`)
//! - application configuration with file/env/override layering (`config`)
//! - the `PipelineError` taxonomy and its user-facing rendering (`errors`)
//!
//! # Design principle
//!
//! The backing row store is authoritative and schemaless from this
//! system's point of view; everything here is optimistic typing around
//! free text. The one hard table is `Field` - the single source of truth
//! for column positions, shared by the read and write paths.

pub mod config;
pub mod domain;
pub mod errors;

pub use domain::action::Action;
pub use domain::deal::{Deal, Priority, Stage};
pub use domain::field::Field;
pub use errors::PipelineError;
