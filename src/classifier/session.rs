//! Walking the questionnaire.
//!
//! The walk is stateless on the engine side: the caller holds a
//! [`ClassifierState`] and passes it back with each answer. Every transition
//! returns a fresh state and never mutates the one passed in.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::tree::{DecisionNode, DecisionTree, Transition};

/// Where a caller is in the questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierState {
    /// The question currently being asked.
    pub current_node_id: String,
    /// Questions answered so far, oldest first.
    #[serde(default)]
    pub history: Vec<String>,
}

/// The outcome of answering a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ClassifierStep {
    /// Another question follows.
    Continue(ClassifierState),
    /// The questionnaire ended with a grade.
    Terminal {
        /// The grade to pass to the permanent-disability calculator.
        grade: u32,
    },
}

impl DecisionTree {
    /// Returns the state positioned at the root with no history.
    pub fn initial_state(&self) -> ClassifierState {
        ClassifierState {
            current_node_id: self.root().id.clone(),
            history: Vec::new(),
        }
    }

    /// Returns the question `state` is positioned at.
    ///
    /// # Errors
    ///
    /// Returns `InvalidClassifierState` if the state names a question that is
    /// not in this tree.
    pub fn current_node(&self, state: &ClassifierState) -> EngineResult<&DecisionNode> {
        self.find(&state.current_node_id)
            .ok_or_else(|| EngineError::InvalidClassifierState {
                node_id: state.current_node_id.clone(),
            })
    }

    /// Checks that the history followed by the current question is a path
    /// the questionnaire can actually take from the root.
    fn check_path(&self, state: &ClassifierState) -> EngineResult<()> {
        let mut previous: Option<&DecisionNode> = None;
        for id in state.history.iter().chain([&state.current_node_id]) {
            let invalid = || EngineError::InvalidClassifierState {
                node_id: id.clone(),
            };
            let at = self.index_of(id).ok_or_else(invalid)?;
            let linked = match previous {
                None => self.root().id == *id,
                Some(node) => node
                    .options
                    .iter()
                    .any(|option| option.transition == Transition::Continue(at)),
            };
            if !linked {
                return Err(invalid());
            }
            previous = Some(self.get(at));
        }
        Ok(())
    }
}

/// Answers the current question with the option at `option_index`.
///
/// # Errors
///
/// - `InvalidClassifierState` if the state is not a path the questionnaire
///   can take from the root
/// - `InvalidSelection` if the question has no option at `option_index`
///
/// # Example
///
/// ```no_run
/// use benefit_engine::classifier::{ClassifierStep, classify_grade};
/// use benefit_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/kr_iaci")?;
/// let tree = loader.decision_tree();
///
/// let ClassifierStep::Continue(state) = classify_grade(tree, &tree.initial_state(), 0)? else {
///     unreachable!("the root always asks a follow-up question");
/// };
/// assert_eq!(classify_grade(tree, &state, 0)?, ClassifierStep::Terminal { grade: 8 });
/// # Ok::<(), benefit_engine::error::EngineError>(())
/// ```
pub fn classify_grade(
    tree: &DecisionTree,
    state: &ClassifierState,
    option_index: usize,
) -> EngineResult<ClassifierStep> {
    tree.check_path(state)?;
    let node = tree.current_node(state)?;

    let option = node
        .options
        .get(option_index)
        .ok_or_else(|| EngineError::InvalidSelection {
            node_id: node.id.clone(),
            index: option_index,
            available: node.options.len(),
        })?;

    match option.transition {
        Transition::Continue(next) => {
            let mut history = state.history.clone();
            history.push(node.id.clone());
            Ok(ClassifierStep::Continue(ClassifierState {
                current_node_id: tree.get(next).id.clone(),
                history,
            }))
        }
        Transition::Terminal(grade) => {
            debug!(question = %node.id, option = option_index, grade, "Questionnaire reached a grade");
            Ok(ClassifierStep::Terminal { grade })
        }
    }
}

/// Returns to the previously answered question.
///
/// At the root there is nothing to go back to and the state is returned
/// unchanged.
///
/// # Errors
///
/// Returns `InvalidClassifierState` if the state is not a path the
/// questionnaire can take from the root.
pub fn back(tree: &DecisionTree, state: &ClassifierState) -> EngineResult<ClassifierState> {
    tree.check_path(state)?;

    let mut history = state.history.clone();
    Ok(match history.pop() {
        Some(previous) => ClassifierState {
            current_node_id: previous,
            history,
        },
        None => state.clone(),
    })
}

/// Clears the history and returns to the root.
pub fn reset(tree: &DecisionTree) -> ClassifierState {
    tree.initial_state()
}
