mod bpmn_graph_tests;
mod bpmn_import_tests;
