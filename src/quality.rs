use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::graph::{to_readability_graph, LayoutEdge, PositionedNode};
use crate::metrics::{
    calculate_aspect_ratio, calculate_density, calculate_edge_length_stats,
    calculate_node_occlusion, ExtendedMetrics, Greadability, ReadabilityEngine,
    ReadabilityMetrics,
};
use crate::scoring::{calculate_overall_score, DiagramType, WeightTable};

/// Layout algorithm family that produced the positions. Recorded, never acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutType {
    Hierarchical,
    ForceDirected,
    Orthogonal,
    Swimlane,
    Grid,
    Manual,
}

impl LayoutType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutType::Hierarchical => "hierarchical",
            LayoutType::ForceDirected => "force-directed",
            LayoutType::Orthogonal => "orthogonal",
            LayoutType::Swimlane => "swimlane",
            LayoutType::Grid => "grid",
            LayoutType::Manual => "manual",
        }
    }
}

impl fmt::Display for LayoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "hierarchical" | "layered" => Ok(Self::Hierarchical),
            "force-directed" | "force" => Ok(Self::ForceDirected),
            "orthogonal" => Ok(Self::Orthogonal),
            "swimlane" => Ok(Self::Swimlane),
            "grid" => Ok(Self::Grid),
            "manual" => Ok(Self::Manual),
            other => Err(format!("unknown layout type: {other}")),
        }
    }
}

/// Outcome of one layout evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutQualityReport {
    pub overall_score: f64,
    pub metrics: ReadabilityMetrics,
    pub extended_metrics: ExtendedMetrics,
    pub timestamp: DateTime<Utc>,
    pub layout_type: LayoutType,
    pub diagram_type: DiagramType,
    pub node_count: usize,
    pub edge_count: usize,
    pub computation_time_ms: f64,
}

pub struct QualityEvaluator {
    engine: Box<dyn ReadabilityEngine>,
    weights: WeightTable,
}

impl QualityEvaluator {
    pub fn new(engine: Box<dyn ReadabilityEngine>, weights: WeightTable) -> Self {
        Self { engine, weights }
    }

    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    pub fn evaluate(
        &self,
        nodes: &[PositionedNode],
        edges: &[LayoutEdge],
        layout_type: LayoutType,
        diagram_type: DiagramType,
    ) -> LayoutQualityReport {
        let started = Utc::now();

        let graph = to_readability_graph(nodes, edges);
        let metrics = self.engine.evaluate(&graph);
        let extended_metrics = ExtendedMetrics {
            readability: metrics,
            edge_length: calculate_edge_length_stats(&graph),
            node_node_occlusion: calculate_node_occlusion(nodes),
            aspect_ratio: calculate_aspect_ratio(nodes),
            density: calculate_density(graph.nodes.len(), graph.links.len()),
        };
        let weights = self.weights.get(diagram_type);
        let overall_score =
            calculate_overall_score(&metrics, &extended_metrics, &weights, nodes.len());

        let finished = Utc::now();
        let computation_time_ms = elapsed_ms(started, finished);
        tracing::debug!(
            %diagram_type,
            %layout_type,
            nodes = nodes.len(),
            edges = edges.len(),
            overall_score,
            computation_time_ms,
            "layout quality evaluated"
        );

        LayoutQualityReport {
            overall_score,
            metrics,
            extended_metrics,
            timestamp: finished,
            layout_type,
            diagram_type,
            node_count: nodes.len(),
            edge_count: edges.len(),
            computation_time_ms,
        }
    }
}

// `std::time::Instant` panics on wasm32-unknown-unknown; chrono's clock does not.
fn elapsed_ms(started: DateTime<Utc>, finished: DateTime<Utc>) -> f64 {
    let elapsed = finished - started;
    elapsed
        .num_microseconds()
        .map(|micros| micros as f64 / 1000.0)
        .unwrap_or_else(|| elapsed.num_milliseconds() as f64)
        .max(0.0)
}

impl Default for QualityEvaluator {
    fn default() -> Self {
        Self::new(Box::new(Greadability::default()), WeightTable::default())
    }
}

impl fmt::Debug for QualityEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QualityEvaluator")
            .field("weights", &self.weights)
            .finish_non_exhaustive()
    }
}

/// Evaluates a positioned layout with the default readability engine and the
/// built-in weight profiles.
pub fn calculate_layout_quality(
    nodes: &[PositionedNode],
    edges: &[LayoutEdge],
    layout_type: LayoutType,
    diagram_type: DiagramType,
) -> LayoutQualityReport {
    QualityEvaluator::default().evaluate(nodes, edges, layout_type, diagram_type)
}
