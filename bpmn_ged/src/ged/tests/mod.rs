use crate::model::bpmn_graph_struct::{BpmnGraph, Edge, Node};

mod similarity_tests;

/// Seven-node process: start -> write draft -> parallel split -> two tasks ->
/// parallel join -> end
pub(crate) fn write_draft_graph() -> BpmnGraph {
    BpmnGraph::new(
        vec![
            Node::new("StartEvent_1", "startEvent", None),
            Node::new("Activity_14k7ctp", "task", Some("Write draft")),
            Node::new("Gateway_1p0lqz7", "parallelGateway", None),
            Node::new("Activity_10dlls5", "task", Some("Contact publisher")),
            Node::new("Activity_08pijh0", "task", Some("Process payment")),
            Node::new("Gateway_0hkn0t9", "parallelGateway", None),
            Node::new("Event_05ig0cp", "endEvent", None),
        ],
        vec![
            Edge::new("StartEvent_1", "Activity_14k7ctp", None),
            Edge::new("Activity_14k7ctp", "Gateway_1p0lqz7", None),
            Edge::new("Gateway_1p0lqz7", "Activity_10dlls5", None),
            Edge::new("Gateway_1p0lqz7", "Activity_08pijh0", None),
            Edge::new("Activity_08pijh0", "Gateway_0hkn0t9", None),
            Edge::new("Activity_10dlls5", "Gateway_0hkn0t9", None),
            Edge::new("Gateway_0hkn0t9", "Event_05ig0cp", None),
        ],
    )
    .unwrap()
}

/// [`write_draft_graph`] with the start event's kind changed and the end
/// event plus its incoming flow removed
pub(crate) fn write_draft_graph_modified() -> BpmnGraph {
    BpmnGraph::new(
        vec![
            Node::new("StartEvent_1", "intermediateThrowEvent", None),
            Node::new("Activity_14k7ctp", "task", Some("Write draft")),
            Node::new("Gateway_1p0lqz7", "parallelGateway", None),
            Node::new("Activity_10dlls5", "task", Some("Contact publisher")),
            Node::new("Activity_08pijh0", "task", Some("Process payment")),
            Node::new("Gateway_0hkn0t9", "parallelGateway", None),
        ],
        vec![
            Edge::new("StartEvent_1", "Activity_14k7ctp", None),
            Edge::new("Activity_14k7ctp", "Gateway_1p0lqz7", None),
            Edge::new("Gateway_1p0lqz7", "Activity_10dlls5", None),
            Edge::new("Gateway_1p0lqz7", "Activity_08pijh0", None),
            Edge::new("Activity_08pijh0", "Gateway_0hkn0t9", None),
            Edge::new("Activity_10dlls5", "Gateway_0hkn0t9", None),
        ],
    )
    .unwrap()
}

/// The inner parallel block of [`write_draft_graph`] on its own
pub(crate) fn gateway_block_graph() -> BpmnGraph {
    BpmnGraph::new(
        vec![
            Node::new("Gateway_1p0lqz7", "parallelGateway", None),
            Node::new("Activity_10dlls5", "task", Some("Contact publisher")),
            Node::new("Activity_08pijh0", "task", Some("Process payment")),
            Node::new("Gateway_0hkn0t9", "parallelGateway", None),
        ],
        vec![
            Edge::new("Gateway_1p0lqz7", "Activity_10dlls5", None),
            Edge::new("Gateway_1p0lqz7", "Activity_08pijh0", None),
            Edge::new("Activity_08pijh0", "Gateway_0hkn0t9", None),
            Edge::new("Activity_10dlls5", "Gateway_0hkn0t9", None),
        ],
    )
    .unwrap()
}

/// A chain of `n` distinctly named tasks, large enough to make tiny time
/// budgets bite
pub(crate) fn task_chain(n: usize, renamed: usize) -> BpmnGraph {
    let nodes: Vec<Node> = (0..n)
        .map(|i| {
            let name = if i < renamed {
                format!("Renamed step {i}")
            } else {
                format!("Step {i}")
            };
            Node::new(format!("t{i}"), "task", Some(&name))
        })
        .collect();
    let edges: Vec<Edge> = (1..n)
        .map(|i| Edge::new(format!("t{}", i - 1), format!("t{i}"), None))
        .collect();
    BpmnGraph::new(nodes, edges).unwrap()
}
