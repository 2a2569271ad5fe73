use crate::model::import_bpmn::{import_bpmn_file, import_bpmn_slice, BPMNParseError};
use crate::utils::test_utils::get_test_data_path;

#[test]
fn test_bpmn_import() {
    let path = get_test_data_path().join("write_draft.bpmn");
    let g = import_bpmn_file(path).unwrap();

    assert_eq!(g.node_count(), 7);
    assert_eq!(g.edge_count(), 7);

    let start = g.node_by_id("StartEvent_1").unwrap();
    assert_eq!(start.node_type, "startEvent");
    assert_eq!(start.name, None);

    let task = g.node_by_id("Activity_14k7ctp").unwrap();
    assert_eq!(task.node_type, "task");
    assert_eq!(task.name.as_deref(), Some("Write draft"));

    // <incoming>/<outgoing> children of tasks must not become nodes
    assert!(g.nodes().iter().all(|n| n.node_type != "incoming"));

    assert_eq!(g.out_edges("Gateway_1p0lqz7").count(), 2);
    let last_flow = &g.edges()[6];
    assert_eq!(last_flow.source, "Gateway_0hkn0t9");
    assert_eq!(last_flow.target, "Event_05ig0cp");
}

#[test]
fn test_bpmn_import_without_namespace_prefix() {
    let xml = br#"<?xml version="1.0"?>
        <definitions xmlns="http://www.omg.org/spec/BPMN/20100524/MODEL">
          <process id="p">
            <startEvent id="s"/>
            <task id="t" name="Do work"/>
            <sequenceFlow id="f" sourceRef="s" targetRef="t" name="go"/>
          </process>
        </definitions>"#;
    let g = import_bpmn_slice(xml).unwrap();
    assert_eq!(g.node_count(), 2);
    assert_eq!(g.edge_count(), 1);
    assert_eq!(g.edges()[0].name.as_deref(), Some("go"));
}

#[test]
fn test_bpmn_import_only_first_process() {
    let xml = br#"<definitions>
          <process id="p1">
            <startEvent id="s1"/>
          </process>
          <process id="p2">
            <startEvent id="s2"/>
            <task id="t2"/>
          </process>
        </definitions>"#;
    let g = import_bpmn_slice(xml).unwrap();
    assert_eq!(g.node_count(), 1);
    assert!(g.node_by_id("s1").is_some());
}

#[test]
fn test_invalid_bpmn_import() {
    let no_process = b"<definitions><foo/></definitions>";
    assert!(matches!(
        import_bpmn_slice(no_process),
        Err(BPMNParseError::NoProcessElement)
    ));

    let missing_source_ref =
        b"<process><sequenceFlow id=\"f\" targetRef=\"t\"/></process>";
    assert!(matches!(
        import_bpmn_slice(missing_source_ref),
        Err(BPMNParseError::MissingKey("sourceRef"))
    ));

    let dangling = b"<process><sequenceFlow sourceRef=\"a\" targetRef=\"b\"/></process>";
    assert!(matches!(
        import_bpmn_slice(dangling),
        Err(BPMNParseError::Validation(_))
    ));
}
