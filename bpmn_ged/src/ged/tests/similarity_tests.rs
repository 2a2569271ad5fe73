use super::{gateway_block_graph, write_draft_graph, write_draft_graph_modified};
use crate::ged::cost::CostModelPreset;
use crate::ged::search::GEDSearchOptions;
use crate::ged::similarity::compare_graphs;
use crate::model::bpmn_graph_struct::BpmnGraph;

const UNIT: CostModelPreset = CostModelPreset::UnitUniform;

#[test]
fn test_relative_ged_of_modified_process() {
    let g1 = write_draft_graph();
    let g2 = write_draft_graph_modified();
    let cmp = compare_graphs(&g1, &g2, &UNIT, &GEDSearchOptions::default()).unwrap();

    assert!(cmp.exact);
    assert_eq!(cmp.ged, 3.0);
    // Denominator: 14 (7 nodes + 7 edges) + 12 (6 nodes + 6 edges)
    assert!((cmp.relative_ged - 3.0 / 26.0).abs() < 1e-12);
    assert!((cmp.similarity - (1.0 - 3.0 / 26.0)).abs() < 1e-12);
}

#[test]
fn test_identical_graphs_have_similarity_one() {
    let g = write_draft_graph_modified();
    let cmp = compare_graphs(&g, &g, &UNIT, &GEDSearchOptions::default()).unwrap();
    assert_eq!(cmp.ged, 0.0);
    assert_eq!(cmp.relative_ged, 0.0);
    assert_eq!(cmp.similarity, 1.0);
}

#[test]
fn test_both_empty_graphs() {
    let empty = BpmnGraph::empty();
    let cmp = compare_graphs(&empty, &empty, &UNIT, &GEDSearchOptions::default()).unwrap();
    assert_eq!(cmp.ged, 0.0);
    // 0/0 is defined as 0, so two empty graphs are perfectly similar
    assert_eq!(cmp.relative_ged, 0.0);
    assert_eq!(cmp.similarity, 1.0);
}

#[test]
fn test_graph_against_empty_graph() {
    let g = write_draft_graph();
    let empty = BpmnGraph::empty();
    let cmp = compare_graphs(&g, &empty, &UNIT, &GEDSearchOptions::default()).unwrap();
    assert_eq!(cmp.ged, 14.0);
    assert_eq!(cmp.relative_ged, 1.0);
    assert_eq!(cmp.similarity, 0.0);
}

#[test]
fn test_relative_ged_bounds_under_unit_preset() {
    let graphs = [
        write_draft_graph(),
        write_draft_graph_modified(),
        gateway_block_graph(),
    ];
    for g1 in &graphs {
        for g2 in &graphs {
            let cmp = compare_graphs(g1, g2, &UNIT, &GEDSearchOptions::default()).unwrap();
            assert!(
                (0.0..=1.0).contains(&cmp.relative_ged),
                "rged {} out of bounds",
                cmp.relative_ged
            );
            assert!((0.0..=1.0).contains(&cmp.similarity));
        }
    }
}
