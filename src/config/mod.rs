// src/config/mod.rs

//! Configuration loading and validation for spinguard.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a steps file from disk (`loader.rs`).
//! - Validate basic invariants like unique step names (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, parse_and_validate};
pub use model::{ConfigFile, ConfigSection, RawConfigFile, StepConfig};
