use serde::{Deserialize, Serialize};
use std::collections::HashMap;

///
/// Node of a [`BpmnGraph`]: a single BPMN flow element (task, event, gateway, ...)
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Element ID (unique within its graph)
    pub id: String,
    /// Element kind (e.g., `task`, `startEvent`, `parallelGateway`)
    #[serde(rename = "type")]
    pub node_type: String,
    /// Human-readable element name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Canonical label token assigned by a normalization provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized_name: Option<String>,
}

impl Node {
    /// Create a new [`Node`] with the given ID, element kind and optional name
    pub fn new<S: Into<String>, T: Into<String>>(id: S, node_type: T, name: Option<&str>) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            name: name.map(String::from),
            normalized_name: None,
        }
    }

    /// The label used for comparisons: the normalized name if one was assigned, otherwise the raw name
    pub fn comparison_label(&self) -> Option<&str> {
        self.normalized_name.as_deref().or(self.name.as_deref())
    }
}

///
/// Edge of a [`BpmnGraph`]: a BPMN sequence flow between two flow elements
///
/// Parallel edges between the same ordered node pair are allowed (sequence
/// flows are not deduplicated).
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// ID of the source node
    pub source: String,
    /// ID of the target node
    pub target: String,
    /// Human-readable flow name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Canonical label token assigned by a normalization provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized_name: Option<String>,
}

impl Edge {
    /// Create a new [`Edge`] between the given node IDs with an optional name
    pub fn new<S: Into<String>, T: Into<String>>(source: S, target: T, name: Option<&str>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            name: name.map(String::from),
            normalized_name: None,
        }
    }

    /// The label used for comparisons: the normalized name if one was assigned, otherwise the raw name
    pub fn comparison_label(&self) -> Option<&str> {
        self.normalized_name.as_deref().or(self.name.as_deref())
    }
}

///
/// Error encountered while constructing a [`BpmnGraph`]
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The same node ID was declared more than once
    DuplicateNodeId(String),
    /// An edge references a source node ID that is not declared
    UnknownEdgeSource(String),
    /// An edge references a target node ID that is not declared
    UnknownEdgeTarget(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::DuplicateNodeId(id) => {
                write!(f, "Duplicate node ID: {id}")
            }
            ValidationError::UnknownEdgeSource(id) => {
                write!(f, "Edge source references unknown node ID: {id}")
            }
            ValidationError::UnknownEdgeTarget(id) => {
                write!(f, "Edge target references unknown node ID: {id}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Deserialize)]
struct RawBpmnGraph {
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    edges: Vec<Edge>,
}

impl TryFrom<RawBpmnGraph> for BpmnGraph {
    type Error = ValidationError;

    fn try_from(raw: RawBpmnGraph) -> Result<Self, Self::Error> {
        BpmnGraph::new(raw.nodes, raw.edges)
    }
}

///
/// An attributed directed graph derived from a BPMN process model
///
/// Immutable after construction: [`BpmnGraph::new`] validates that node IDs
/// are unique and that every edge endpoint references a declared node, so no
/// dangling endpoints can exist afterwards. Graphs may be cyclic and need not
/// be connected. The empty graph ([`BpmnGraph::empty`]) is a valid value used
/// as the normalization reference for the relative GED.
///
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawBpmnGraph")]
pub struct BpmnGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    #[serde(skip)]
    node_index: HashMap<String, usize>,
    #[serde(skip)]
    out_edge_index: HashMap<String, Vec<usize>>,
}

impl PartialEq for BpmnGraph {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes && self.edges == other.edges
    }
}

impl BpmnGraph {
    /// Construct a validated [`BpmnGraph`] from a node list and an edge list
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self, ValidationError> {
        let mut node_index: HashMap<String, usize> = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if node_index.insert(node.id.clone(), i).is_some() {
                return Err(ValidationError::DuplicateNodeId(node.id.clone()));
            }
        }
        let mut out_edge_index: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, edge) in edges.iter().enumerate() {
            if !node_index.contains_key(&edge.source) {
                return Err(ValidationError::UnknownEdgeSource(edge.source.clone()));
            }
            if !node_index.contains_key(&edge.target) {
                return Err(ValidationError::UnknownEdgeTarget(edge.target.clone()));
            }
            out_edge_index.entry(edge.source.clone()).or_default().push(i);
        }
        Ok(Self {
            nodes,
            edges,
            node_index,
            out_edge_index,
        })
    }

    /// The empty graph (no nodes, no edges)
    pub fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            node_index: HashMap::new(),
            out_edge_index: HashMap::new(),
        }
    }

    /// All nodes, in insertion order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edges, in insertion order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Look up a node by its ID
    pub fn node_by_id(&self, id: &str) -> Option<&Node> {
        self.node_index.get(id).map(|&i| &self.nodes[i])
    }

    /// Position of a node in [`BpmnGraph::nodes`] by its ID
    pub fn node_position(&self, id: &str) -> Option<usize> {
        self.node_index.get(id).copied()
    }

    /// All edges leaving the node with the given ID
    pub fn out_edges<'a>(&'a self, source: &str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.out_edge_index
            .get(source)
            .into_iter()
            .flatten()
            .map(|&i| &self.edges[i])
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether this is the empty graph
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Degree (in + out, counting parallel edges and self-loops once per edge) of the node with the given ID
    pub fn degree(&self, id: &str) -> usize {
        self.edges
            .iter()
            .filter(|e| e.source == id || e.target == id)
            .count()
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }

    /// Deserialize (and validate) from a JSON string in the ingestion format
    /// `{"nodes": [{"id", "type", "name"?}], "edges": [{"source", "target", "name"?}]}`
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
