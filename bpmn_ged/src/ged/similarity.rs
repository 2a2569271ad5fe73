use crate::ged::cost::GEDCostModel;
use crate::ged::search::{compute_ged, distance_to_empty, GEDSearchError, GEDSearchOptions};
use crate::model::bpmn_graph_struct::BpmnGraph;
use serde::{Deserialize, Serialize};

///
/// Outcome of a full pairwise model comparison
///
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraphComparison {
    /// Raw graph edit distance
    pub ged: f64,
    /// GED normalized by the sum of both graphs' distances to the empty
    /// graph; `0` when both graphs are empty
    pub relative_ged: f64,
    /// `1 - relative_ged`. Lands in `[0, 1]` for metric cost models (where
    /// deletion/insertion costs dominate substitution costs) but is not
    /// clamped, so a poorly configured cost model can push it outside that
    /// range.
    pub similarity: f64,
    /// Whether the underlying GED was proven minimal (see [`GEDResult::exact`])
    ///
    /// [`GEDResult::exact`]: crate::ged::search::GEDResult::exact
    pub exact: bool,
}

///
/// Compare two graphs: compute the GED, derive the relative GED and the
/// similarity score
///
/// `relative_ged = ged(G1, G2) / (ged(G1, ∅) + ged(G2, ∅))`, with the
/// distances to the empty graph computed via the closed-form shortcut
/// ([`distance_to_empty`]); `relative_ged(∅, ∅)` is defined as `0`.
///
pub fn compare_graphs<C: GEDCostModel>(
    g1: &BpmnGraph,
    g2: &BpmnGraph,
    model: &C,
    options: &GEDSearchOptions,
) -> Result<GraphComparison, GEDSearchError> {
    let result = compute_ged(g1, g2, model, options)?;
    let denominator = distance_to_empty(g1, model)? + distance_to_empty(g2, model)?;
    let relative_ged = if denominator == 0.0 {
        0.0
    } else {
        result.cost / denominator
    };
    Ok(GraphComparison {
        ged: result.cost,
        relative_ged,
        similarity: 1.0 - relative_ged,
        exact: result.exact,
    })
}
