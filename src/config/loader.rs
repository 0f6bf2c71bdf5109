//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading statutory
//! tables and the grade questionnaire from YAML files.

use chrono::NaiveDate;
use std::fs;
use std::path::Path;

use crate::classifier::{DecisionTree, QuestionnaireConfig};
use crate::error::{EngineError, EngineResult};

use super::types::{GradesConfig, PolicyConstants, StatutoryTable, TableMetadata};

/// Loads and provides access to the statutory tables.
///
/// Every table is validated at load time, so a malformed schedule or
/// questionnaire is reported when the process starts rather than when a
/// calculation runs.
///
/// # Directory Structure
///
/// ```text
/// config/kr_iaci/
/// ├── table.yaml          # Schedule metadata
/// ├── grades.yaml         # Permanent-disability grade schedule
/// ├── questionnaire.yaml  # Grade classifier decision tree
/// └── policy/
///     └── 2025-01-01.yaml # Policy constants effective from this date
/// ```
///
/// # Example
///
/// ```no_run
/// use benefit_engine::config::ConfigLoader;
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config/kr_iaci")?;
/// let date = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
/// let table = loader.table_on(date)?;
/// println!("Minimum daily benefit: {}", table.policy().min_daily);
/// # Ok::<(), benefit_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Sorted by effective date, oldest first. Never empty.
    tables: Vec<StatutoryTable>,
    decision_tree: DecisionTree,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Any required file is missing (`ConfigNotFound`)
    /// - Any file contains invalid YAML (`ConfigParseError`)
    /// - The grade schedule or a policy file breaks a table invariant
    ///   (`InvalidStatutoryTable`)
    /// - The questionnaire is not a well-formed tree (`MalformedDecisionTree`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<TableMetadata>(&path.join("table.yaml"))?;
        let grades = Self::load_yaml::<GradesConfig>(&path.join("grades.yaml"))?;
        let questionnaire =
            Self::load_yaml::<QuestionnaireConfig>(&path.join("questionnaire.yaml"))?;
        let policies = Self::load_policies(&path.join("policy"))?;

        let tables = policies
            .into_iter()
            .map(|policy| StatutoryTable::new(metadata.clone(), policy, grades.grades.clone()))
            .collect::<EngineResult<Vec<_>>>()?;
        let decision_tree = DecisionTree::from_config(questionnaire)?;

        Self::from_parts(tables, decision_tree)
    }

    /// Builds a loader from already-validated parts.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStatutoryTable` if `tables` is empty or two tables share
    /// an effective date.
    pub fn from_parts(
        tables: Vec<StatutoryTable>,
        decision_tree: DecisionTree,
    ) -> EngineResult<Self> {
        let mut tables = tables;
        tables.sort_by_key(|t| t.effective_date());

        if tables.is_empty() {
            return Err(EngineError::InvalidStatutoryTable {
                message: "no policy tables supplied".to_string(),
            });
        }
        if let Some(pair) = tables
            .windows(2)
            .find(|pair| pair[0].effective_date() == pair[1].effective_date())
        {
            return Err(EngineError::InvalidStatutoryTable {
                message: format!(
                    "two policy tables share the effective date {}",
                    pair[0].effective_date()
                ),
            });
        }

        Ok(Self {
            tables,
            decision_tree,
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads all policy files from the policy directory.
    fn load_policies(policy_dir: &Path) -> EngineResult<Vec<PolicyConstants>> {
        let policy_dir_str = policy_dir.display().to_string();

        let entries = fs::read_dir(policy_dir).map_err(|_| EngineError::ConfigNotFound {
            path: policy_dir_str.clone(),
        })?;

        let mut policies = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: policy_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                policies.push(Self::load_yaml::<PolicyConstants>(&path)?);
            }
        }

        if policies.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no policy files found)", policy_dir_str),
            });
        }

        Ok(policies)
    }

    /// Returns every loaded table, oldest first.
    pub fn tables(&self) -> &[StatutoryTable] {
        &self.tables
    }

    /// Returns the most recent table.
    pub fn current_table(&self) -> &StatutoryTable {
        // `from_parts` rejects an empty list.
        &self.tables[self.tables.len() - 1]
    }

    /// Returns the table in effect on `date`: the most recent one whose
    /// effective date is on or before it.
    ///
    /// # Errors
    ///
    /// Returns `StatutoryTableNotFound` if `date` precedes every table.
    pub fn table_on(&self, date: NaiveDate) -> EngineResult<&StatutoryTable> {
        self.tables
            .iter()
            .rfind(|t| t.effective_date() <= date)
            .ok_or(EngineError::StatutoryTableNotFound { date })
    }

    /// Returns the grade classifier questionnaire.
    pub fn decision_tree(&self) -> &DecisionTree {
        &self.decision_tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::{test_grades, test_metadata, test_policy};
    use crate::models::PaymentMode;

    fn config_path() -> &'static str {
        "./config/kr_iaci"
    }

    fn table_effective(date: NaiveDate) -> StatutoryTable {
        let mut policy = test_policy();
        policy.effective_date = date;
        StatutoryTable::new(test_metadata(), policy, test_grades()).unwrap()
    }

    fn loaded_tree() -> DecisionTree {
        ConfigLoader::load(config_path())
            .unwrap()
            .decision_tree()
            .clone()
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        let table = loader.current_table();
        assert_eq!(table.metadata().code, "KR-IACI");
        assert_eq!(table.grades().len(), 14);
    }

    #[test]
    fn test_loaded_schedule_matches_statute() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let table = loader.current_table();

        let grade_1 = table.lookup(1).unwrap();
        assert_eq!(grade_1.pension_days, Some(329));
        assert_eq!(grade_1.lump_sum_days, 1474);
        assert_eq!(grade_1.payment_mode, PaymentMode::PensionOnly);

        let grade_7 = table.lookup(7).unwrap();
        assert_eq!(grade_7.pension_days, Some(138));
        assert_eq!(grade_7.lump_sum_days, 616);
        assert_eq!(grade_7.payment_mode, PaymentMode::Choice);

        let grade_14 = table.lookup(14).unwrap();
        assert_eq!(grade_14.pension_days, None);
        assert_eq!(grade_14.lump_sum_days, 55);
        assert_eq!(grade_14.payment_mode, PaymentMode::LumpSumOnly);
    }

    #[test]
    fn test_loaded_policy_constants() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let policy = loader.current_table().policy();

        assert_eq!(policy.min_daily, 80_240);
        assert_eq!(policy.low_income_threshold, 64_192);
        assert_eq!(policy.minimum_compensation_base, 80_240);
        assert_eq!(policy.age_reduction.len(), 5);
        assert_eq!(policy.base_rate.to_string(), "0.70");
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("table.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_table_on_selects_most_recent_effective_table() {
        let loader = ConfigLoader::from_parts(
            vec![
                table_effective(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()),
                table_effective(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            ],
            loaded_tree(),
        )
        .unwrap();

        let mid_2024 = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        assert_eq!(
            loader.table_on(mid_2024).unwrap().effective_date(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );

        let new_year = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(loader.table_on(new_year).unwrap().effective_date(), new_year);
        assert_eq!(loader.current_table().effective_date(), new_year);
    }

    #[test]
    fn test_table_on_before_first_table_fails() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let date = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();

        match loader.table_on(date) {
            Err(EngineError::StatutoryTableNotFound { date: d }) => assert_eq!(d, date),
            other => panic!("Expected StatutoryTableNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_from_parts_rejects_duplicate_dates() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let result = ConfigLoader::from_parts(
            vec![table_effective(date), table_effective(date)],
            loaded_tree(),
        );
        assert!(matches!(
            result,
            Err(EngineError::InvalidStatutoryTable { .. })
        ));
    }

    #[test]
    fn test_from_parts_rejects_empty_tables() {
        let result = ConfigLoader::from_parts(vec![], loaded_tree());
        assert!(matches!(
            result,
            Err(EngineError::InvalidStatutoryTable { .. })
        ));
    }

    #[test]
    fn test_questionnaire_loaded() {
        let tree = loaded_tree();
        assert_eq!(tree.root().id, "root");
        assert!(tree.len() >= 3);
    }
}
