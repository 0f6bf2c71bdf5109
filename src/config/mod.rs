//! Statutory tables and configuration loading.
//!
//! This module loads the benefit schedule from YAML files: the permanent
//! disability grade schedule, effective-dated policy constants, and the grade
//! classifier questionnaire.
//!
//! # Example
//!
//! ```no_run
//! use benefit_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/kr_iaci").unwrap();
//! println!("Loaded schedule: {}", loader.current_table().metadata().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AgeReductionBracket, GradesConfig, PolicyConstant, PolicyConstants, StatutoryTable,
    TableMetadata,
};

#[cfg(test)]
pub(crate) use types::test_support;
