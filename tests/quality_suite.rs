use std::path::Path;

use diagram_quality::config::GridConfig;
use diagram_quality::graph::{LayoutEdge, PositionedNode};
use diagram_quality::history::{MetricsHistory, RegressionSeverity, SaveOptions};
use diagram_quality::transform::{BadgePosition, NodeType};
use diagram_quality::{
    DiagramType, LayoutType, MetaModel, calculate_layout_quality, compare_layout_quality,
    grid_layout, to_readability_graph, transform_model,
};
use serde::Deserialize;

fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path).expect("fixture read failed")
}

fn load_model(name: &str) -> MetaModel {
    serde_json::from_str(&fixture(name)).expect("fixture model parse failed")
}

#[derive(Deserialize)]
struct LayoutFixture {
    nodes: Vec<PositionedNode>,
    edges: Vec<LayoutEdge>,
}

#[test]
fn three_element_model_end_to_end() {
    let model = load_model("three_element_model.json");
    let graph = transform_model(&model).expect("transform failed");
    assert_eq!(graph.nodes.len(), 3);
    assert_eq!(graph.edges.len(), 3);
    assert!(graph.skipped_duplicates.is_empty());
    assert!(graph.dangling.is_empty());

    let (nodes, edges) = grid_layout(&graph, &GridConfig::default());
    let report = calculate_layout_quality(
        &nodes,
        &edges,
        LayoutType::Hierarchical,
        DiagramType::Business,
    );
    assert_eq!(report.node_count, 3);
    assert_eq!(report.edge_count, 3);
    assert!((0.0..=1.0).contains(&report.overall_score));
    assert_eq!(report.extended_metrics.node_node_occlusion, 0);
    assert_eq!(report.extended_metrics.density, 1.0);

    let json = serde_json::to_string(&report).unwrap();
    let restored = serde_json::from_str(&json).unwrap();
    assert_eq!(report, restored);
}

#[test]
fn transformed_nodes_carry_badges_and_fields() {
    let graph = transform_model(&load_model("three_element_model.json")).unwrap();
    let process = &graph.nodes[0];
    assert_eq!(process.node_type, NodeType::BusinessProcess);
    assert_eq!(process.label, "Order Intake");
    let contents: Vec<&str> = process.badges.iter().map(|b| b.content.as_str()).collect();
    assert_eq!(contents, vec!["sales", "HIGH", "▶"]);
    assert_eq!(process.field_items[0].label, "Subprocesses");
    assert_eq!(process.field_items[0].value, "validate");

    let service = &graph.nodes[1];
    let fields: Vec<(&str, &str)> = service
        .field_items
        .iter()
        .map(|f| (f.label.as_str(), f.value.as_str()))
        .collect();
    assert_eq!(fields, vec![("Description", "Ships orders"), ("SLA", "24h")]);
}

#[test]
fn motivation_dedup_is_type_aware() {
    let graph = transform_model(&load_model("motivation_duplicates.json")).unwrap();
    let ids: Vec<&str> = graph.edges.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["r1", "r3", "r4"]);
    assert_eq!(graph.skipped_duplicates.len(), 1);
    assert_eq!(graph.skipped_duplicates[0].relationship_id, "r2");
    assert_eq!(graph.dangling.len(), 1);
    assert_eq!(graph.dangling[0].target, "deleted-goal");

    let requirement = &graph.nodes[1];
    assert_eq!(requirement.badges[0].content, "✓");
    assert_eq!(requirement.badges[0].position, BadgePosition::TopLeft);
    let stakeholder = &graph.nodes[2];
    assert_eq!(stakeholder.badges[0].position, BadgePosition::Inline);
    assert!(stakeholder.field_items.is_empty());
}

#[test]
fn positioned_fixture_scores_crossing() {
    let layout: LayoutFixture = serde_json::from_str(&fixture("positioned_layout.json")).unwrap();
    let graph = to_readability_graph(&layout.nodes, &layout.edges);
    assert_eq!(graph.nodes.len(), 4);
    assert_eq!(graph.links.len(), 3);
    assert_eq!((graph.nodes[2].x, graph.nodes[2].y), (80.0, 345.0));
    assert_eq!((graph.nodes[3].x, graph.nodes[3].y), (490.0, 355.0));

    let report = calculate_layout_quality(
        &layout.nodes,
        &layout.edges,
        LayoutType::Manual,
        DiagramType::Motivation,
    );
    assert_eq!(report.edge_count, 4);
    assert_eq!(report.metrics.crossing_number, 0.0);
    assert!(report.metrics.crossing_angle < 1.0);
    assert!((0.0..=1.0).contains(&report.overall_score));
}

#[test]
fn untangled_layout_beats_crossed_layout() {
    let layout: LayoutFixture = serde_json::from_str(&fixture("positioned_layout.json")).unwrap();
    let crossed = calculate_layout_quality(
        &layout.nodes,
        &layout.edges,
        LayoutType::Manual,
        DiagramType::Motivation,
    );

    let mut untangled = layout.nodes.clone();
    for node in &mut untangled {
        match node.id.as_str() {
            "n3" => node.x = 400.0,
            "n4" => node.x = 0.0,
            _ => {}
        }
    }
    let improved = calculate_layout_quality(
        &untangled,
        &layout.edges,
        LayoutType::Manual,
        DiagramType::Motivation,
    );
    assert_eq!(improved.metrics.crossing_number, 1.0);

    let cmp = compare_layout_quality(&improved, &crossed);
    assert!(cmp.improved);
    assert!(cmp.overall_improvement > 0.0);
}

#[test]
fn history_flags_a_regressed_layout() {
    let model = load_model("three_element_model.json");
    let graph = transform_model(&model).unwrap();
    let (nodes, edges) = grid_layout(&graph, &GridConfig::default());
    let good = calculate_layout_quality(&nodes, &edges, LayoutType::Grid, DiagramType::Business);

    let mut history = MetricsHistory::in_memory(Default::default());
    history
        .save_snapshot(good.clone(), SaveOptions::baseline())
        .unwrap();

    let stacked: Vec<PositionedNode> = nodes
        .iter()
        .map(|node| PositionedNode { x: 0.0, y: 0.0, ..node.clone() })
        .collect();
    let bad = calculate_layout_quality(&stacked, &edges, LayoutType::Grid, DiagramType::Business);
    assert!(bad.overall_score < good.overall_score);

    let regression = history.detect_regression(&bad);
    assert!(regression.has_regression);
    assert_ne!(regression.severity, RegressionSeverity::None);
    assert!(regression.overall_percentage_change < 0.0);

    let unchanged = history.detect_regression(&good);
    assert!(!unchanged.has_regression);
}
