//! Label normalization of process model graphs
//!
//! Two models describing the same process rarely use identical wording, so
//! raw label equality underestimates semantic agreement. A
//! [`LabelNormalizationProvider`] maps the free-text labels of both graphs of
//! a comparison onto a small shared vocabulary (e.g. single letters) before
//! the GED is computed. Providers backed by semantic-matching services are
//! allowed to be nondeterministic; the core only relies on the returned
//! mapping being internally consistent for the duration of one comparison.

use crate::model::bpmn_graph_struct::{BpmnGraph, Edge, Node};
use serde::Serialize;
use std::collections::HashMap;

/// Mapping from original label text to a canonical token
pub type LabelMapping = HashMap<String, String>;

///
/// Error reported by a [`LabelNormalizationProvider`]
///
#[derive(Debug, Clone)]
pub enum NormalizationError {
    /// The provider (e.g. a backing semantic-matching service) failed
    Provider(String),
}

impl std::fmt::Display for NormalizationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NormalizationError::Provider(msg) => {
                write!(f, "Label normalization provider failed: {msg}")
            }
        }
    }
}

impl std::error::Error for NormalizationError {}

///
/// Label sets and edge context of the two graphs of one comparison
///
#[derive(Debug, Clone, Copy, Serialize)]
pub struct NormalizationRequest<'a> {
    /// Nodes of the first graph
    pub g1_nodes: &'a [Node],
    /// Nodes of the second graph
    pub g2_nodes: &'a [Node],
    /// Edges of the first graph
    pub g1_edges: &'a [Edge],
    /// Edges of the second graph
    pub g2_edges: &'a [Edge],
}

impl<'a> NormalizationRequest<'a> {
    /// Build a request covering both graphs of a comparison
    pub fn for_graphs(g1: &'a BpmnGraph, g2: &'a BpmnGraph) -> Self {
        Self {
            g1_nodes: g1.nodes(),
            g2_nodes: g2.nodes(),
            g1_edges: g1.edges(),
            g2_edges: g2.edges(),
        }
    }
}

///
/// Capability interface for label normalization
///
/// Implementations may be nondeterministic and may return a partial or empty
/// mapping: any label absent from the mapping is treated as its own
/// canonical token, and unlabeled elements are never rewritten.
///
pub trait LabelNormalizationProvider: Sync {
    /// Produce one label mapping covering both graphs of the request
    fn normalize(
        &self,
        request: &NormalizationRequest<'_>,
    ) -> Result<LabelMapping, NormalizationError>;
}

///
/// Provider returning an empty mapping, leaving every label as its own
/// canonical token
///
/// The deterministic stand-in for tests and offline runs.
///
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityNormalizationProvider;

impl LabelNormalizationProvider for IdentityNormalizationProvider {
    fn normalize(
        &self,
        _request: &NormalizationRequest<'_>,
    ) -> Result<LabelMapping, NormalizationError> {
        Ok(LabelMapping::new())
    }
}

///
/// Provider returning a fixed label table, independent of the request
///
#[derive(Debug, Clone, Default)]
pub struct StaticNormalizationProvider {
    mapping: LabelMapping,
}

impl StaticNormalizationProvider {
    /// Create a provider that always answers with the given mapping
    pub fn new(mapping: LabelMapping) -> Self {
        Self { mapping }
    }
}

impl LabelNormalizationProvider for StaticNormalizationProvider {
    fn normalize(
        &self,
        _request: &NormalizationRequest<'_>,
    ) -> Result<LabelMapping, NormalizationError> {
        Ok(self.mapping.clone())
    }
}

///
/// Rewrite a graph with the canonical tokens of the given mapping
///
/// Returns a new graph whose nodes and edges carry `normalized_name`; labels
/// absent from the mapping map to themselves (identity fallback), unlabeled
/// elements stay untouched. The input graph is not modified.
///
pub fn apply_label_mapping(graph: &BpmnGraph, mapping: &LabelMapping) -> BpmnGraph {
    let canonical =
        |name: &Option<String>| name.as_ref().map(|l| mapping.get(l).unwrap_or(l).clone());
    let nodes = graph
        .nodes()
        .iter()
        .map(|n| Node {
            normalized_name: canonical(&n.name),
            ..n.clone()
        })
        .collect();
    let edges = graph
        .edges()
        .iter()
        .map(|e| Edge {
            normalized_name: canonical(&e.name),
            ..e.clone()
        })
        .collect();
    BpmnGraph::new(nodes, edges).expect("normalization keeps IDs and endpoints unchanged")
}

///
/// Request one mapping for the pair and apply it to both graphs
///
pub fn normalize_graph_pair(
    g1: &BpmnGraph,
    g2: &BpmnGraph,
    provider: &dyn LabelNormalizationProvider,
) -> Result<(BpmnGraph, BpmnGraph), NormalizationError> {
    let mapping = provider.normalize(&NormalizationRequest::for_graphs(g1, g2))?;
    Ok((
        apply_label_mapping(g1, &mapping),
        apply_label_mapping(g2, &mapping),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::bpmn_graph_struct::{BpmnGraph, Edge, Node};

    fn labeled_graph() -> BpmnGraph {
        BpmnGraph::new(
            vec![
                Node::new("n1", "task", Some("Submit order")),
                Node::new("n2", "task", Some("Process payment")),
                Node::new("n3", "exclusiveGateway", None),
            ],
            vec![
                Edge::new("n1", "n2", Some("Order submitted")),
                Edge::new("n2", "n3", None),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_identity_fallback() {
        let g = labeled_graph();
        let provider = IdentityNormalizationProvider;
        let (n1, n2) = normalize_graph_pair(&g, &g, &provider).unwrap();
        assert_eq!(n1, n2);
        // Every labeled element keeps its own label as canonical token
        assert_eq!(
            n1.node_by_id("n1").unwrap().normalized_name.as_deref(),
            Some("Submit order")
        );
        assert_eq!(n1.edges()[0].normalized_name.as_deref(), Some("Order submitted"));
        // Unlabeled elements are never rewritten
        assert_eq!(n1.node_by_id("n3").unwrap().normalized_name, None);
        assert_eq!(n1.edges()[1].normalized_name, None);
    }

    #[test]
    fn test_static_table_with_partial_mapping() {
        let g = labeled_graph();
        let provider = StaticNormalizationProvider::new(LabelMapping::from([(
            "Submit order".to_string(),
            "A".to_string(),
        )]));
        let normalized = {
            let mapping = provider
                .normalize(&NormalizationRequest::for_graphs(&g, &g))
                .unwrap();
            apply_label_mapping(&g, &mapping)
        };
        assert_eq!(
            normalized.node_by_id("n1").unwrap().normalized_name.as_deref(),
            Some("A")
        );
        // Label absent from the mapping falls back to itself
        assert_eq!(
            normalized.node_by_id("n2").unwrap().normalized_name.as_deref(),
            Some("Process payment")
        );
        // The original graph is untouched
        assert_eq!(g.node_by_id("n1").unwrap().normalized_name, None);
    }

    #[test]
    fn test_comparison_label_prefers_normalized_name() {
        let g = labeled_graph();
        let mapping = LabelMapping::from([("Submit order".to_string(), "A".to_string())]);
        let normalized = apply_label_mapping(&g, &mapping);
        assert_eq!(
            normalized.node_by_id("n1").unwrap().comparison_label(),
            Some("A")
        );
        assert_eq!(g.node_by_id("n1").unwrap().comparison_label(), Some("Submit order"));
    }
}
