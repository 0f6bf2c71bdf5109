//! The questionnaire decision tree.
//!
//! Questions are stored in an arena and addressed by [`NodeIndex`]. Each
//! option either continues to another question or ends with a grade. The tree
//! is checked when it is built: dangling references, cycles, unreachable
//! questions and out-of-range grades are all rejected up front.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{EngineError, EngineResult};
use crate::models::{MAX_GRADE, MIN_GRADE};

/// Questionnaire file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionnaireConfig {
    /// Id of the first question.
    pub root: String,
    /// Every question in the questionnaire.
    pub nodes: Vec<NodeConfig>,
}

/// A question as written in the questionnaire file.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeConfig {
    /// Unique id of the question.
    pub id: String,
    /// The question text.
    pub prompt: String,
    /// The answers offered.
    pub options: Vec<OptionConfig>,
}

/// An answer as written in the questionnaire file.
///
/// Exactly one of `next` and `grade` must be set.
#[derive(Debug, Clone, Deserialize)]
pub struct OptionConfig {
    /// The answer text.
    pub label: String,
    /// Id of the follow-up question.
    #[serde(default)]
    pub next: Option<String>,
    /// The grade this answer ends with.
    #[serde(default)]
    pub grade: Option<u32>,
}

/// Position of a question in the tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeIndex(usize);

/// Where an answer leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Ask another question.
    Continue(NodeIndex),
    /// The questionnaire ends with this grade.
    Terminal(u32),
}

/// An answer to a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionOption {
    /// The answer text.
    pub label: String,
    /// Where the answer leads.
    pub transition: Transition,
}

/// A question in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionNode {
    /// Unique id of the question.
    pub id: String,
    /// The question text.
    pub prompt: String,
    /// The answers offered.
    pub options: Vec<DecisionOption>,
}

/// A validated questionnaire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionTree {
    nodes: Vec<DecisionNode>,
    index: HashMap<String, NodeIndex>,
    root: NodeIndex,
    max_depth: usize,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    InProgress,
    Done(usize),
}

/// The most questions a single path through the questionnaire may ask.
pub const MAX_DEPTH: usize = 32;

fn malformed(message: String) -> EngineError {
    EngineError::MalformedDecisionTree { message }
}

impl DecisionTree {
    /// Builds and validates a tree from its file representation.
    ///
    /// # Errors
    ///
    /// Returns `MalformedDecisionTree` if any reference is dangling, an option
    /// is ambiguous, a grade is out of range, a path asks more than
    /// [`MAX_DEPTH`] questions, or the questions do not form a single-rooted
    /// acyclic graph.
    pub fn from_config(config: QuestionnaireConfig) -> EngineResult<Self> {
        if config.nodes.is_empty() {
            return Err(malformed("questionnaire has no questions".to_string()));
        }

        let mut index = HashMap::with_capacity(config.nodes.len());
        for (position, node) in config.nodes.iter().enumerate() {
            if index.insert(node.id.clone(), NodeIndex(position)).is_some() {
                return Err(malformed(format!("duplicate question id '{}'", node.id)));
            }
        }

        let root = *index
            .get(&config.root)
            .ok_or_else(|| malformed(format!("root question '{}' does not exist", config.root)))?;

        let mut nodes = Vec::with_capacity(config.nodes.len());
        for node in config.nodes {
            if node.options.is_empty() {
                return Err(malformed(format!("question '{}' has no options", node.id)));
            }
            let options = node
                .options
                .into_iter()
                .enumerate()
                .map(|(position, option)| {
                    let transition = resolve_transition(&index, &node.id, position, &option)?;
                    Ok(DecisionOption {
                        label: option.label,
                        transition,
                    })
                })
                .collect::<EngineResult<Vec<_>>>()?;
            nodes.push(DecisionNode {
                id: node.id,
                prompt: node.prompt,
                options,
            });
        }

        check_single_root(&nodes, root)?;

        let mut visits = vec![Visit::New; nodes.len()];
        let max_depth = longest_path(&nodes, root, &mut visits)?;
        if max_depth > MAX_DEPTH {
            return Err(malformed(format!(
                "a path asks {max_depth} questions, more than the limit of {MAX_DEPTH}"
            )));
        }
        if let Some(position) = visits.iter().position(|v| *v == Visit::New) {
            return Err(malformed(format!(
                "question '{}' cannot be reached from the root",
                nodes[position].id
            )));
        }

        Ok(Self {
            nodes,
            index,
            root,
            max_depth,
        })
    }

    /// Returns the first question.
    pub fn root(&self) -> &DecisionNode {
        &self.nodes[self.root.0]
    }

    /// Returns the question at `index`.
    pub fn get(&self, index: NodeIndex) -> &DecisionNode {
        &self.nodes[index.0]
    }

    /// Returns the arena position of the question with `id`.
    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    /// Finds a question by id.
    pub fn find(&self, id: &str) -> Option<&DecisionNode> {
        self.index.get(id).map(|&i| self.get(i))
    }

    /// Number of questions.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a validated tree has at least one question.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The largest number of questions answered before reaching a grade.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

fn resolve_transition(
    index: &HashMap<String, NodeIndex>,
    node_id: &str,
    position: usize,
    option: &OptionConfig,
) -> EngineResult<Transition> {
    match (&option.next, option.grade) {
        (Some(next), None) => index
            .get(next)
            .map(|&target| Transition::Continue(target))
            .ok_or_else(|| {
                malformed(format!(
                    "option {position} of '{node_id}' points to missing question '{next}'"
                ))
            }),
        (None, Some(grade)) if (MIN_GRADE..=MAX_GRADE).contains(&grade) => {
            Ok(Transition::Terminal(grade))
        }
        (None, Some(grade)) => Err(malformed(format!(
            "option {position} of '{node_id}' ends with grade {grade}, outside {MIN_GRADE}..={MAX_GRADE}"
        ))),
        (Some(_), Some(_)) => Err(malformed(format!(
            "option {position} of '{node_id}' has both a next question and a grade"
        ))),
        (None, None) => Err(malformed(format!(
            "option {position} of '{node_id}' has neither a next question nor a grade"
        ))),
    }
}

/// Every question other than the root must be the target of some option.
fn check_single_root(nodes: &[DecisionNode], root: NodeIndex) -> EngineResult<()> {
    let mut referenced = vec![false; nodes.len()];
    for option in nodes.iter().flat_map(|n| &n.options) {
        if let Transition::Continue(target) = option.transition {
            referenced[target.0] = true;
        }
    }

    if referenced[root.0] {
        return Err(malformed(format!(
            "root question '{}' is the target of an option",
            nodes[root.0].id
        )));
    }
    if let Some(position) = referenced
        .iter()
        .enumerate()
        .position(|(i, &is_ref)| i != root.0 && !is_ref)
    {
        return Err(malformed(format!(
            "question '{}' is not referenced by any option (more than one root)",
            nodes[position].id
        )));
    }
    Ok(())
}

/// Depth-first walk from `root` returning the longest question chain.
///
/// Uses an explicit stack of `(question, next option, deepest child)` frames
/// so that a long chain cannot exhaust the call stack.
fn longest_path(
    nodes: &[DecisionNode],
    root: NodeIndex,
    visits: &mut [Visit],
) -> EngineResult<usize> {
    let mut stack = vec![(root, 0usize, 0usize)];
    visits[root.0] = Visit::InProgress;

    while let Some(frame) = stack.last_mut() {
        let (at, position, deepest) = *frame;
        match nodes[at.0].options.get(position) {
            Some(option) => {
                frame.1 += 1;
                let Transition::Continue(next) = option.transition else {
                    continue;
                };
                match visits[next.0] {
                    Visit::Done(depth) => frame.2 = deepest.max(depth),
                    Visit::InProgress => {
                        return Err(malformed(format!(
                            "question '{}' is part of a cycle",
                            nodes[next.0].id
                        )));
                    }
                    Visit::New => {
                        if stack.len() >= MAX_DEPTH {
                            return Err(too_deep(&nodes[next.0]));
                        }
                        visits[next.0] = Visit::InProgress;
                        stack.push((next, 0, 0));
                    }
                }
            }
            None => {
                let depth = deepest + 1;
                visits[at.0] = Visit::Done(depth);
                stack.pop();
                match stack.last_mut() {
                    Some(parent) => parent.2 = parent.2.max(depth),
                    None => return Ok(depth),
                }
            }
        }
    }

    Ok(0)
}

fn too_deep(node: &DecisionNode) -> EngineError {
    malformed(format!(
        "question '{}' lies deeper than the limit of {MAX_DEPTH} questions",
        node.id
    ))
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    fn expect_malformed(config: QuestionnaireConfig, needle: &str) {
        match DecisionTree::from_config(config) {
            Err(EngineError::MalformedDecisionTree { message }) => {
                assert!(
                    message.contains(needle),
                    "expected '{needle}' in '{message}'"
                );
            }
            other => panic!("Expected MalformedDecisionTree, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_tree_builds() {
        let tree = lower_limb_tree();
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.root().id, "root");
        assert_eq!(tree.max_depth(), 2);
        assert_eq!(tree.find("rom_detail").unwrap().options.len(), 4);
        assert!(tree.find("missing").is_none());
    }

    #[test]
    fn test_transitions_are_resolved_to_indices() {
        let tree = lower_limb_tree();
        match tree.root().options[0].transition {
            Transition::Continue(next) => assert_eq!(tree.get(next).id, "rom_detail"),
            other => panic!("Expected Continue, got {:?}", other),
        }
        assert_eq!(
            tree.find("rom_detail").unwrap().options[0].transition,
            Transition::Terminal(8)
        );
    }

    #[test]
    fn test_missing_reference_rejected() {
        let mut config = lower_limb_config();
        config.nodes[0].options[1] = option_next("amputation", "nowhere");
        expect_malformed(config, "missing question 'nowhere'");
    }

    #[test]
    fn test_missing_root_rejected() {
        let mut config = lower_limb_config();
        config.root = "start".to_string();
        expect_malformed(config, "root question 'start' does not exist");
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut config = lower_limb_config();
        config.nodes[2].id = "rom_detail".to_string();
        expect_malformed(config, "duplicate question id 'rom_detail'");
    }

    #[test]
    fn test_grade_out_of_range_rejected() {
        let mut config = lower_limb_config();
        config.nodes[1].options[3] = option_grade("mild", 15);
        expect_malformed(config, "grade 15");
    }

    #[test]
    fn test_ambiguous_option_rejected() {
        let mut config = lower_limb_config();
        config.nodes[1].options[0].next = Some("amputation_detail".to_string());
        expect_malformed(config, "both a next question and a grade");
    }

    #[test]
    fn test_empty_option_rejected() {
        let mut config = lower_limb_config();
        config.nodes[1].options[0].grade = None;
        expect_malformed(config, "neither a next question nor a grade");
    }

    #[test]
    fn test_question_without_options_rejected() {
        let mut config = lower_limb_config();
        config.nodes[2].options.clear();
        expect_malformed(config, "has no options");
    }

    #[test]
    fn test_second_root_rejected() {
        let mut config = lower_limb_config();
        config.nodes.push(node("orphan", vec![option_grade("x", 9)]));
        expect_malformed(config, "'orphan' is not referenced");
    }

    #[test]
    fn test_cycle_back_to_root_rejected() {
        let mut config = lower_limb_config();
        config.nodes[1].options[3] = option_next("start over", "root");
        expect_malformed(config, "root question 'root' is the target");
    }

    #[test]
    fn test_detached_cycle_rejected() {
        let mut config = lower_limb_config();
        config.nodes.push(node("loop_a", vec![option_next("a", "loop_b")]));
        config.nodes.push(node("loop_b", vec![option_next("b", "loop_a")]));
        expect_malformed(config, "cannot be reached from the root");
    }

    #[test]
    fn test_reachable_cycle_rejected() {
        let mut config = lower_limb_config();
        config.nodes[1].options[3] = option_next("more", "amputation_detail");
        config.nodes[2].options[3] = option_next("more", "rom_detail");
        expect_malformed(config, "part of a cycle");
    }

    #[test]
    fn test_shared_follow_up_question_allowed() {
        let mut config = lower_limb_config();
        config.nodes[0].options[1] = option_next("amputation", "rom_detail");
        config.nodes.remove(2);
        let tree = DecisionTree::from_config(config).unwrap();
        assert_eq!(tree.max_depth(), 2);
    }

    #[test]
    fn test_questionnaire_yaml_parses() {
        let yaml = r#"
root: q1
nodes:
  - id: q1
    prompt: First?
    options:
      - label: go on
        next: q2
      - label: stop
        grade: 14
  - id: q2
    prompt: Second?
    options:
      - label: done
        grade: 3
"#;
        let config: QuestionnaireConfig = serde_yaml::from_str(yaml).unwrap();
        let tree = DecisionTree::from_config(config).unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.max_depth(), 2);
    }

    fn chain_config(length: usize) -> QuestionnaireConfig {
        let mut nodes: Vec<NodeConfig> = (0..length - 1)
            .map(|i| node(&format!("q{i}"), vec![option_next("next", &format!("q{}", i + 1))]))
            .collect();
        nodes.push(node(&format!("q{}", length - 1), vec![option_grade("end", 14)]));
        QuestionnaireConfig {
            root: "q0".to_string(),
            nodes,
        }
    }

    #[test]
    fn test_chain_at_depth_limit_allowed() {
        let tree = DecisionTree::from_config(chain_config(MAX_DEPTH)).unwrap();
        assert_eq!(tree.max_depth(), MAX_DEPTH);
    }

    #[test]
    fn test_chain_past_depth_limit_rejected() {
        expect_malformed(chain_config(MAX_DEPTH + 1), "deeper than the limit");
    }

    #[test]
    fn test_very_long_chain_rejected_without_overflow() {
        expect_malformed(chain_config(200_000), "deeper than the limit");
    }

    #[test]
    fn test_shared_chain_reached_from_deeper_path_rejected() {
        let mut config = chain_config(MAX_DEPTH - 1);
        for node in &mut config.nodes {
            node.id = format!("c{}", &node.id[1..]);
            for option in &mut node.options {
                if let Some(next) = &mut option.next {
                    *next = format!("c{}", &next[1..]);
                }
            }
        }
        config.root = "root".to_string();
        config.nodes.push(node(
            "root",
            vec![option_next("short", "c0"), option_next("long", "x1")],
        ));
        config.nodes.push(node("x1", vec![option_next("on", "x2")]));
        config.nodes.push(node("x2", vec![option_next("on", "c0")]));
        expect_malformed(config, "more than the limit");
    }
}
