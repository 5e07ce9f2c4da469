//! Layout-engine agnostic node/edge input and the normalized graph the metric
//! calculators consume.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};

pub const DEFAULT_NODE_WIDTH: f64 = 180.0;
pub const DEFAULT_NODE_HEIGHT: f64 = 110.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MeasuredSize {
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
}

/// A node positioned by a layout engine. `x`/`y` are the top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Size reported by the renderer after measuring; wins over `width`/`height`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measured: Option<MeasuredSize>,
}

impl PositionedNode {
    pub fn new(id: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            width: Some(width),
            height: Some(height),
            measured: None,
        }
    }

    pub fn resolved_width(&self) -> f64 {
        self.measured
            .and_then(|m| m.width)
            .or(self.width)
            .unwrap_or(DEFAULT_NODE_WIDTH)
    }

    pub fn resolved_height(&self) -> f64 {
        self.measured
            .and_then(|m| m.height)
            .or(self.height)
            .unwrap_or(DEFAULT_NODE_HEIGHT)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.resolved_width(), self.resolved_height())
    }

    pub fn center(&self) -> Point {
        self.bounds().center()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayoutEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl LayoutEdge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
}

impl NormalizedNode {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Link between two normalized nodes, by index into [`NormalizedGraph::nodes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedLink {
    pub source: usize,
    pub target: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedGraph {
    pub nodes: Vec<NormalizedNode>,
    pub links: Vec<NormalizedLink>,
}

impl NormalizedGraph {
    pub fn link_points(&self, link: &NormalizedLink) -> (Point, Point) {
        (
            self.nodes[link.source].point(),
            self.nodes[link.target].point(),
        )
    }

    /// Number of non-loop links touching each node.
    pub fn degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0usize; self.nodes.len()];
        for link in &self.links {
            if link.source == link.target {
                continue;
            }
            degrees[link.source] += 1;
            degrees[link.target] += 1;
        }
        degrees
    }
}

/// Converts positioned nodes to center coordinates and keeps only edges whose
/// endpoints both exist. Every node survives; stale edges are dropped silently.
pub fn to_readability_graph(nodes: &[PositionedNode], edges: &[LayoutEdge]) -> NormalizedGraph {
    let normalized: Vec<NormalizedNode> = nodes
        .iter()
        .map(|node| {
            let center = node.center();
            NormalizedNode {
                id: node.id.clone(),
                x: center.x,
                y: center.y,
            }
        })
        .collect();

    let mut index: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
    for (idx, node) in nodes.iter().enumerate() {
        index.entry(node.id.as_str()).or_insert(idx);
    }

    let links = edges
        .iter()
        .filter_map(|edge| {
            let source = *index.get(edge.source.as_str())?;
            let target = *index.get(edge.target.as_str())?;
            Some(NormalizedLink { source, target })
        })
        .collect();

    NormalizedGraph {
        nodes: normalized,
        links,
    }
}
