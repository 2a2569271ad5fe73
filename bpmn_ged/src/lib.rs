#![warn(
    clippy::doc_markdown,
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs
)]

#![allow(clippy::needless_doctest_main)]

#![doc = include_str!("../README.md")]

///
/// Process model graphs ([`BpmnGraph`]) and BPMN 2.0 XML import
///
pub mod model {
    /// [`BpmnGraph`] struct and sub-structs
    pub mod bpmn_graph_struct;
    /// Import [`BpmnGraph`] from `.bpmn` (BPMN 2.0 XML)
    pub mod import_bpmn;

    #[doc(inline)]
    pub use bpmn_graph_struct::BpmnGraph;

    #[cfg(test)]
    mod tests;
}

///
/// Graph Edit Distance (GED)
///
pub mod ged {
    /// Cost models for edit operations ([`GEDCostModel`] and the named presets)
    ///
    /// [`GEDCostModel`]: cost::GEDCostModel
    pub mod cost;
    /// Best-first branch-and-bound search engine computing the GED
    pub mod search;
    /// Relative GED and similarity scoring
    pub mod similarity;

    #[cfg(test)]
    mod tests;
}

/// Label normalization of process model graphs via an external provider
pub mod normalization;

///
/// Batch evaluation of process model directories
///
pub mod evaluation {
    /// Pairwise comparison of two model directories with CSV reports
    pub mod batch;
}

/// Util module with smaller helper functions, structs or enums
pub mod utils;

#[doc(inline)]
pub use model::bpmn_graph_struct::{BpmnGraph, Edge, Node, ValidationError};

#[doc(inline)]
pub use model::import_bpmn::{import_bpmn_file, import_bpmn_reader, import_bpmn_slice};

#[doc(inline)]
pub use ged::cost::{CostModelPreset, GEDCostModel};

#[doc(inline)]
pub use ged::search::{compute_ged, distance_to_empty, GEDResult, GEDSearchOptions};

#[doc(inline)]
pub use ged::similarity::{compare_graphs, GraphComparison};

#[doc(inline)]
pub use evaluation::batch::{run_batch_evaluation, BatchEvaluationOptions, BatchEvaluationSummary};
