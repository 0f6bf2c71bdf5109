//! Disability grade classifier.
//!
//! A short questionnaire that maps a worker's answers about their symptoms to
//! an estimated disability grade. The questionnaire is data loaded from
//! `questionnaire.yaml`; adjusting questions never requires a code change.
//!
//! The grade it produces is an estimate. It is still checked against the
//! statutory table by the permanent-disability calculator.

mod session;
mod tree;

pub use session::{ClassifierState, ClassifierStep, back, classify_grade, reset};
pub use tree::{
    DecisionNode, DecisionOption, DecisionTree, MAX_DEPTH, NodeConfig, NodeIndex, OptionConfig,
    QuestionnaireConfig, Transition,
};
