use crate::geometry::{acute_angle_degrees, bearing_degrees, segments_cross};
use crate::graph::{NormalizedGraph, NormalizedLink};

use super::ReadabilityMetrics;

pub const DEFAULT_IDEAL_CROSSING_ANGLE: f64 = 70.0;

/// Computes the normalized readability scores of a drawing.
///
/// Implementations must be deterministic: the same graph always yields the same
/// scores, each in `[0, 1]` with higher meaning more readable.
pub trait ReadabilityEngine {
    fn evaluate(&self, graph: &NormalizedGraph) -> ReadabilityMetrics;
}

/// Straight-line readability measures in the style of the greadability
/// library: edge crossings, crossing angle and angular resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Greadability {
    pub ideal_crossing_angle: f64,
}

impl Default for Greadability {
    fn default() -> Self {
        Self {
            ideal_crossing_angle: DEFAULT_IDEAL_CROSSING_ANGLE,
        }
    }
}

impl ReadabilityEngine for Greadability {
    fn evaluate(&self, graph: &NormalizedGraph) -> ReadabilityMetrics {
        let links: Vec<NormalizedLink> = graph
            .links
            .iter()
            .copied()
            .filter(|link| link.source != link.target)
            .collect();
        let degrees = graph.degrees();

        let crossing_angles = crossing_angles(graph, &links);
        ReadabilityMetrics {
            crossing_number: crossing_number_score(links.len(), &degrees, crossing_angles.len()),
            crossing_angle: self.crossing_angle_score(&crossing_angles),
            angular_resolution_min: angular_resolution_min(graph, &links, &degrees),
            angular_resolution_dev: angular_resolution_dev(graph, &links, &degrees),
        }
    }
}

impl Greadability {
    fn crossing_angle_score(&self, angles: &[f64]) -> f64 {
        if angles.is_empty() || self.ideal_crossing_angle <= 0.0 {
            return 1.0;
        }
        let ideal = self.ideal_crossing_angle;
        let total: f64 = angles
            .iter()
            .map(|angle| ((ideal - angle).abs() / ideal).min(1.0))
            .sum();
        clamp_unit(1.0 - total / angles.len() as f64)
    }
}

/// Acute angle of every crossing between links that share no endpoint.
fn crossing_angles(graph: &NormalizedGraph, links: &[NormalizedLink]) -> Vec<f64> {
    let mut angles = Vec::new();
    for i in 0..links.len() {
        for j in (i + 1)..links.len() {
            let (a, b) = (links[i], links[j]);
            if a.source == b.source
                || a.source == b.target
                || a.target == b.source
                || a.target == b.target
            {
                continue;
            }
            let (p1, p2) = graph.link_points(&a);
            let (q1, q2) = graph.link_points(&b);
            if segments_cross(p1, p2, q1, q2) {
                angles.push(acute_angle_degrees(p1, p2, q1, q2));
            }
        }
    }
    angles
}

fn crossing_number_score(link_count: usize, degrees: &[usize], crossings: usize) -> f64 {
    let all_pairs = (link_count * link_count.saturating_sub(1)) as f64 / 2.0;
    let adjacent_pairs: f64 = degrees
        .iter()
        .map(|&d| (d * d.saturating_sub(1)) as f64 / 2.0)
        .sum();
    let max_crossings = all_pairs - adjacent_pairs;
    if max_crossings <= 0.0 {
        return 1.0;
    }
    clamp_unit(1.0 - crossings as f64 / max_crossings)
}

/// Sorted gaps (degrees) between consecutive incident edges around each node.
/// Nodes with degree below two get an empty list.
fn incident_gaps(graph: &NormalizedGraph, links: &[NormalizedLink]) -> Vec<Vec<f64>> {
    let mut bearings: Vec<Vec<f64>> = vec![Vec::new(); graph.nodes.len()];
    for link in links {
        let (a, b) = graph.link_points(link);
        bearings[link.source].push(bearing_degrees(a, b));
        bearings[link.target].push(bearing_degrees(b, a));
    }

    bearings
        .into_iter()
        .map(|mut around| {
            if around.len() < 2 {
                return Vec::new();
            }
            around.sort_by(|a, b| a.total_cmp(b));
            let mut gaps: Vec<f64> = around.windows(2).map(|w| w[1] - w[0]).collect();
            gaps.push(360.0 - (around[around.len() - 1] - around[0]));
            gaps
        })
        .collect()
}

fn angular_resolution_min(
    graph: &NormalizedGraph,
    links: &[NormalizedLink],
    degrees: &[usize],
) -> f64 {
    let gaps = incident_gaps(graph, links);
    let mut total = 0.0;
    let mut counted = 0usize;
    for (node_gaps, &degree) in gaps.iter().zip(degrees) {
        if degree < 2 || node_gaps.is_empty() {
            continue;
        }
        let ideal = 360.0 / degree as f64;
        let min_gap = node_gaps.iter().copied().fold(f64::INFINITY, f64::min);
        total += ((ideal - min_gap).abs() / ideal).min(1.0);
        counted += 1;
    }
    if counted == 0 {
        return 1.0;
    }
    clamp_unit(1.0 - total / counted as f64)
}

fn angular_resolution_dev(
    graph: &NormalizedGraph,
    links: &[NormalizedLink],
    degrees: &[usize],
) -> f64 {
    let gaps = incident_gaps(graph, links);
    let mut total = 0.0;
    let mut counted = 0usize;
    for (node_gaps, &degree) in gaps.iter().zip(degrees) {
        if degree < 2 || node_gaps.is_empty() {
            continue;
        }
        let ideal = 360.0 / degree as f64;
        let deviation: f64 = node_gaps
            .iter()
            .map(|gap| (ideal - gap).abs() / ideal)
            .sum();
        // 2d - 2 is the largest possible summed deviation around a node.
        total += (deviation / (2 * degree - 2) as f64).min(1.0);
        counted += 1;
    }
    if counted == 0 {
        return 1.0;
    }
    clamp_unit(1.0 - total / counted as f64)
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{to_readability_graph, LayoutEdge, PositionedNode};

    fn point_node(id: &str, x: f64, y: f64) -> PositionedNode {
        PositionedNode::new(id, x, y, 0.0, 0.0)
    }

    #[test]
    fn empty_graph_is_perfect() {
        let metrics = Greadability::default().evaluate(&NormalizedGraph::default());
        assert_eq!(metrics, ReadabilityMetrics::PERFECT);
    }

    #[test]
    fn single_crossing_lowers_crossing_number() {
        let nodes = vec![
            point_node("a", 0.0, 0.0),
            point_node("b", 100.0, 100.0),
            point_node("c", 0.0, 100.0),
            point_node("d", 100.0, 0.0),
        ];
        let edges = vec![LayoutEdge::new("e1", "a", "b"), LayoutEdge::new("e2", "c", "d")];
        let metrics = Greadability::default().evaluate(&to_readability_graph(&nodes, &edges));
        // two disjoint links: one possible crossing, one actual
        assert_eq!(metrics.crossing_number, 0.0);
        // crossing at 90 degrees against an ideal of 70
        assert!((metrics.crossing_angle - (1.0 - 20.0 / 70.0)).abs() < 1e-9);
    }

    #[test]
    fn evenly_spread_star_has_perfect_angular_resolution() {
        let nodes = vec![
            point_node("hub", 0.0, 0.0),
            point_node("e", 100.0, 0.0),
            point_node("n", 0.0, 100.0),
            point_node("w", -100.0, 0.0),
            point_node("s", 0.0, -100.0),
        ];
        let edges = vec![
            LayoutEdge::new("1", "hub", "e"),
            LayoutEdge::new("2", "hub", "n"),
            LayoutEdge::new("3", "hub", "w"),
            LayoutEdge::new("4", "hub", "s"),
        ];
        let metrics = Greadability::default().evaluate(&to_readability_graph(&nodes, &edges));
        assert!((metrics.angular_resolution_min - 1.0).abs() < 1e-9);
        assert!((metrics.angular_resolution_dev - 1.0).abs() < 1e-9);
        assert_eq!(metrics.crossing_number, 1.0);
    }

    #[test]
    fn cramped_edges_reduce_angular_resolution() {
        let nodes = vec![
            point_node("hub", 0.0, 0.0),
            point_node("a", 100.0, 0.0),
            point_node("b", 100.0, 10.0),
        ];
        let edges = vec![LayoutEdge::new("1", "hub", "a"), LayoutEdge::new("2", "hub", "b")];
        let metrics = Greadability::default().evaluate(&to_readability_graph(&nodes, &edges));
        assert!(metrics.angular_resolution_min < 0.5);
        assert!(metrics.angular_resolution_dev < 1.0);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let nodes = vec![
            point_node("a", 0.0, 0.0),
            point_node("b", 120.0, 40.0),
            point_node("c", 30.0, 90.0),
            point_node("d", 80.0, -20.0),
        ];
        let edges = vec![
            LayoutEdge::new("1", "a", "b"),
            LayoutEdge::new("2", "c", "d"),
            LayoutEdge::new("3", "a", "c"),
        ];
        let graph = to_readability_graph(&nodes, &edges);
        let engine = Greadability::default();
        assert_eq!(engine.evaluate(&graph), engine.evaluate(&graph));
    }
}
