//! Audit steps recorded by the calculators.
//!
//! Every branch a calculator takes is recorded as an [`AuditStep`] so that the
//! caller can show the worker how an amount was reached.

use serde::{Deserialize, Serialize};

/// A single step in the audit trail recording a calculation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number, starting at 1.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Reference to the statutory provision for this rule.
    pub clause_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// Accumulates audit steps with consecutive step numbers.
#[derive(Debug, Default)]
pub(crate) struct AuditLog {
    steps: Vec<AuditStep>,
}

impl AuditLog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(
        &mut self,
        rule_id: &str,
        rule_name: &str,
        clause_ref: &str,
        input: serde_json::Value,
        output: serde_json::Value,
        reasoning: String,
    ) {
        let step_number = self.steps.len() as u32 + 1;
        self.steps.push(AuditStep {
            step_number,
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            clause_ref: clause_ref.to_string(),
            input,
            output,
            reasoning,
        });
    }

    /// Joins the reasoning of every step, one per line.
    pub(crate) fn explanation(&self) -> String {
        self.steps
            .iter()
            .map(|s| s.reasoning.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub(crate) fn into_steps(self) -> Vec<AuditStep> {
        self.steps
    }
}
