//! Application state for the benefit engine API.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::classifier::DecisionTree;
use crate::config::{ConfigLoader, StatutoryTable};
use crate::error::EngineResult;

/// Shared application state.
///
/// The loaded tables are immutable after start-up, so handlers read them
/// without any locking.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the table in effect on `as_of`, or the latest table if no date
    /// is given.
    ///
    /// # Errors
    ///
    /// Returns `StatutoryTableNotFound` if `as_of` precedes every table.
    pub fn table_for(&self, as_of: Option<NaiveDate>) -> EngineResult<&StatutoryTable> {
        match as_of {
            Some(date) => self.config.table_on(date),
            None => Ok(self.config.current_table()),
        }
    }

    /// Returns the grade questionnaire.
    pub fn decision_tree(&self) -> &DecisionTree {
        self.config.decision_tree()
    }
}
