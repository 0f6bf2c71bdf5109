//! Industrial-accident benefit calculation engine.
//!
//! This crate converts a worker's wage history and injury severity into the
//! statutory compensation amounts of the Korean Industrial Accident
//! Compensation Insurance Act: the average daily wage, the temporary-disability
//! (sick-leave) benefit, and the permanent-disability benefit with its
//! pension-or-lump-sum election. A small questionnaire estimates a disability
//! grade from symptom answers.
//!
//! Statutory figures are data, loaded from a YAML directory by
//! [`config::ConfigLoader`]. The [`api`] module exposes the calculators over
//! HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod classifier;
pub mod config;
pub mod error;
pub mod models;
