use crate::model::bpmn_graph_struct::{Edge, Node};
use serde::{Deserialize, Serialize};

///
/// Error caused by a misconfigured cost model
///
/// All cost functions must return finite, non-negative values. The search
/// engine checks every cost it evaluates and surfaces the first offender;
/// node-level costs are evaluated eagerly before any search work begins.
///
#[derive(Debug, Clone, PartialEq)]
pub enum CostModelError {
    /// A cost function returned a negative value
    NegativeCost {
        /// The edit operation whose cost function misbehaved
        operation: &'static str,
        /// The offending value
        value: f64,
    },
    /// A cost function returned NaN or an infinite value
    NonFiniteCost {
        /// The edit operation whose cost function misbehaved
        operation: &'static str,
    },
}

impl std::fmt::Display for CostModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CostModelError::NegativeCost { operation, value } => {
                write!(f, "Cost model returned negative {operation} cost: {value}")
            }
            CostModelError::NonFiniteCost { operation } => {
                write!(f, "Cost model returned non-finite {operation} cost")
            }
        }
    }
}

impl std::error::Error for CostModelError {}

///
/// Cost model for graph edit operations
///
/// A bundle of six pure functions giving the cost of deleting, inserting, or
/// substituting a node or an edge. All returned values must be finite and
/// non-negative, and the substitution cost of a node against itself must be
/// the model's minimum (usually 0). The latter is a caller-supplied
/// invariant, not enforced by the engine; the former is checked per call and
/// rejected with a [`CostModelError`].
///
pub trait GEDCostModel {
    /// Cost of deleting `node`
    fn node_deletion_cost(&self, node: &Node) -> f64;
    /// Cost of inserting `node`
    fn node_insertion_cost(&self, node: &Node) -> f64;
    /// Cost of substituting `a` (in the first graph) by `b` (in the second graph)
    fn node_substitution_cost(&self, a: &Node, b: &Node) -> f64;
    /// Cost of deleting `edge`
    fn edge_deletion_cost(&self, edge: &Edge) -> f64;
    /// Cost of inserting `edge`
    fn edge_insertion_cost(&self, edge: &Edge) -> f64;
    /// Cost of substituting `a` (in the first graph) by `b` (in the second graph)
    fn edge_substitution_cost(&self, a: &Edge, b: &Edge) -> f64;
}

/// Whether two optional labels disagree; a missing label never counts as a disagreement
fn labels_disagree(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a != b,
        _ => false,
    }
}

/// Whether two optional labels fully agree (both absent, or both present and equal)
fn labels_match(a: Option<&str>, b: Option<&str>) -> bool {
    a == b
}

///
/// Named cost model presets
///
/// The two substitution-cost conventions found in evaluation practice are
/// exposed side by side; which one reflects the intended semantics is a
/// caller decision, not a hard-coded default.
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CostModelPreset {
    /// All edit operations cost 1; node substitution is free exactly when
    /// the element kinds match and the labels do not disagree (a missing
    /// label on either side never counts as a disagreement), otherwise a
    /// full mismatch (cost 1). Edges are compared by co-occurrence only,
    /// so edge substitution is always free.
    #[default]
    UnitUniform,
    /// Graded node substitution: 0 for a full match (same kind, same
    /// label), 0.5 for a partial match (labels present and equal, kinds
    /// differ), 1 otherwise. Label-level semantic agreement is rewarded
    /// even across structurally different element kinds. Edge substitution
    /// is free exactly when the labels fully agree, 1 otherwise.
    GradedSubstitution,
}

impl GEDCostModel for CostModelPreset {
    fn node_deletion_cost(&self, _node: &Node) -> f64 {
        1.0
    }

    fn node_insertion_cost(&self, _node: &Node) -> f64 {
        1.0
    }

    fn node_substitution_cost(&self, a: &Node, b: &Node) -> f64 {
        let labels = (a.comparison_label(), b.comparison_label());
        match self {
            CostModelPreset::UnitUniform => {
                if a.node_type == b.node_type && !labels_disagree(labels.0, labels.1) {
                    0.0
                } else {
                    1.0
                }
            }
            CostModelPreset::GradedSubstitution => {
                if a.node_type == b.node_type && labels_match(labels.0, labels.1) {
                    0.0
                } else if labels.0.is_some() && labels_match(labels.0, labels.1) {
                    0.5
                } else {
                    1.0
                }
            }
        }
    }

    fn edge_deletion_cost(&self, _edge: &Edge) -> f64 {
        1.0
    }

    fn edge_insertion_cost(&self, _edge: &Edge) -> f64 {
        1.0
    }

    fn edge_substitution_cost(&self, a: &Edge, b: &Edge) -> f64 {
        match self {
            CostModelPreset::UnitUniform => 0.0,
            CostModelPreset::GradedSubstitution => {
                if labels_match(a.comparison_label(), b.comparison_label()) {
                    0.0
                } else {
                    1.0
                }
            }
        }
    }
}

/// Validate a single cost value returned by a [`GEDCostModel`]
pub(crate) fn checked_cost(operation: &'static str, value: f64) -> Result<f64, CostModelError> {
    if !value.is_finite() {
        Err(CostModelError::NonFiniteCost { operation })
    } else if value < 0.0 {
        Err(CostModelError::NegativeCost { operation, value })
    } else {
        Ok(value)
    }
}
