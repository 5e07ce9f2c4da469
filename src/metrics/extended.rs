use crate::geometry::{bounding_box, distance, Rect};
use crate::graph::{NormalizedGraph, PositionedNode};

use super::EdgeLengthStats;

/// Center-to-center length statistics over the graph's links. Population
/// standard deviation; all zero when there are no links.
pub fn calculate_edge_length_stats(graph: &NormalizedGraph) -> EdgeLengthStats {
    if graph.links.is_empty() {
        return EdgeLengthStats::default();
    }

    let lengths: Vec<f64> = graph
        .links
        .iter()
        .map(|link| {
            let (a, b) = graph.link_points(link);
            distance(a, b)
        })
        .collect();

    let count = lengths.len() as f64;
    let min = lengths.iter().copied().fold(f64::INFINITY, f64::min);
    let max = lengths.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = lengths.iter().sum::<f64>() / count;
    let variance = lengths
        .iter()
        .map(|len| (len - mean) * (len - mean))
        .sum::<f64>()
        / count;

    EdgeLengthStats {
        min,
        max,
        mean,
        std_dev: variance.sqrt(),
    }
}

/// Number of unordered node pairs whose bounding boxes strictly overlap.
pub fn calculate_node_occlusion(nodes: &[PositionedNode]) -> usize {
    let rects: Vec<Rect> = nodes.iter().map(PositionedNode::bounds).collect();
    let mut count = 0usize;
    for i in 0..rects.len() {
        for j in (i + 1)..rects.len() {
            if rects[i].overlaps(&rects[j]) {
                count += 1;
            }
        }
    }
    count
}

/// Width over height of the drawing's bounding box; `1.0` when there is
/// nothing to measure.
pub fn calculate_aspect_ratio(nodes: &[PositionedNode]) -> f64 {
    let rects: Vec<Rect> = nodes.iter().map(PositionedNode::bounds).collect();
    let Some(bbox) = bounding_box(&rects) else {
        return 1.0;
    };
    if bbox.width <= f64::EPSILON || bbox.height <= f64::EPSILON {
        return 1.0;
    }
    bbox.width / bbox.height
}

/// Fraction of possible undirected edges that are present.
pub fn calculate_density(node_count: usize, edge_count: usize) -> f64 {
    if node_count <= 1 {
        return 0.0;
    }
    let max_edges = (node_count * (node_count - 1)) as f64 / 2.0;
    (edge_count as f64 / max_edges).min(1.0)
}
