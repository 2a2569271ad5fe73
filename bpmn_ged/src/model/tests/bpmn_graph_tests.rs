use crate::model::bpmn_graph_struct::{BpmnGraph, Edge, Node, ValidationError};

fn nodes() -> Vec<Node> {
    vec![
        Node::new("start", "startEvent", None),
        Node::new("t1", "task", Some("Write draft")),
        Node::new("end", "endEvent", None),
    ]
}

#[test]
fn test_graph_construction_and_accessors() {
    let g = BpmnGraph::new(
        nodes(),
        vec![
            Edge::new("start", "t1", None),
            Edge::new("t1", "end", Some("done")),
            // Parallel sequence flows are not deduplicated
            Edge::new("t1", "end", None),
        ],
    )
    .unwrap();

    assert_eq!(g.node_count(), 3);
    assert_eq!(g.edge_count(), 3);
    assert!(!g.is_empty());
    assert_eq!(g.node_by_id("t1").unwrap().name.as_deref(), Some("Write draft"));
    assert!(g.node_by_id("missing").is_none());
    assert_eq!(g.out_edges("t1").count(), 2);
    assert_eq!(g.out_edges("end").count(), 0);
    assert_eq!(g.degree("t1"), 3);
    assert_eq!(g.degree("end"), 2);
}

#[test]
fn test_duplicate_node_id_rejected() {
    let mut dup = nodes();
    dup.push(Node::new("t1", "task", Some("Write draft again")));
    assert_eq!(
        BpmnGraph::new(dup, vec![]),
        Err(ValidationError::DuplicateNodeId("t1".to_string()))
    );
}

#[test]
fn test_dangling_edge_endpoints_rejected() {
    assert_eq!(
        BpmnGraph::new(nodes(), vec![Edge::new("ghost", "t1", None)]),
        Err(ValidationError::UnknownEdgeSource("ghost".to_string()))
    );
    assert_eq!(
        BpmnGraph::new(nodes(), vec![Edge::new("t1", "ghost", None)]),
        Err(ValidationError::UnknownEdgeTarget("ghost".to_string()))
    );
}

#[test]
fn test_empty_graph() {
    let g = BpmnGraph::empty();
    assert!(g.is_empty());
    assert_eq!(g.node_count(), 0);
    assert_eq!(g.edge_count(), 0);
}

#[test]
fn test_self_loops_and_cycles_allowed() {
    let g = BpmnGraph::new(
        nodes(),
        vec![
            Edge::new("t1", "t1", None),
            Edge::new("t1", "start", None),
            Edge::new("start", "t1", None),
        ],
    );
    assert!(g.is_ok());
}

#[test]
fn test_json_round_trip_validates() {
    let json = r#"{
        "nodes": [
            {"id": "start", "type": "startEvent"},
            {"id": "t1", "type": "task", "name": "Write draft"}
        ],
        "edges": [
            {"source": "start", "target": "t1"}
        ]
    }"#;
    let g = BpmnGraph::from_json(json).unwrap();
    assert_eq!(g.node_count(), 2);
    assert_eq!(g.node_by_id("t1").unwrap().normalized_name, None);

    let reparsed = BpmnGraph::from_json(&g.to_json()).unwrap();
    assert_eq!(g, reparsed);

    // Deserialization goes through the same validation as construction
    let dangling = r#"{"nodes": [], "edges": [{"source": "a", "target": "b"}]}"#;
    assert!(BpmnGraph::from_json(dangling).is_err());
}
