//! A deterministic grid placement, enough to feed the quality evaluator when no
//! external layout engine is wired in.

use crate::config::GridConfig;
use crate::graph::{LayoutEdge, PositionedNode};
use crate::transform::TransformedGraph;

pub fn grid_columns(node_count: usize, config: &GridConfig) -> usize {
    config
        .columns
        .filter(|columns| *columns > 0)
        .unwrap_or_else(|| (node_count as f64).sqrt().ceil() as usize)
        .max(1)
}

/// Places nodes row-major, each centred in its cell. Column widths and row
/// heights fit the largest node they hold.
pub fn grid_layout(
    graph: &TransformedGraph,
    config: &GridConfig,
) -> (Vec<PositionedNode>, Vec<LayoutEdge>) {
    let columns = grid_columns(graph.nodes.len(), config);
    let rows = graph.nodes.len().div_ceil(columns);

    let mut column_widths = vec![0.0f64; columns];
    let mut row_heights = vec![0.0f64; rows];
    for (idx, node) in graph.nodes.iter().enumerate() {
        let (row, col) = (idx / columns, idx % columns);
        column_widths[col] = column_widths[col].max(node.width);
        row_heights[row] = row_heights[row].max(node.height);
    }

    let mut column_x = vec![0.0f64; columns];
    for i in 1..columns {
        column_x[i] = column_x[i - 1] + column_widths[i - 1] + config.column_gap;
    }
    let mut row_y = vec![0.0f64; rows];
    for i in 1..rows {
        row_y[i] = row_y[i - 1] + row_heights[i - 1] + config.row_gap;
    }

    let nodes = graph
        .nodes
        .iter()
        .enumerate()
        .map(|(idx, node)| {
            let (row, col) = (idx / columns, idx % columns);
            let x = column_x[col] + (column_widths[col] - node.width) / 2.0;
            let y = row_y[row] + (row_heights[row] - node.height) / 2.0;
            PositionedNode::new(node.id.clone(), x, y, node.width, node.height)
        })
        .collect();
    let edges = graph
        .edges
        .iter()
        .map(|edge| LayoutEdge::new(edge.id.clone(), edge.source.clone(), edge.target.clone()))
        .collect();
    (nodes, edges)
}
