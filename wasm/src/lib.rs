use diagram_quality::config::GridConfig;
use diagram_quality::{
    DiagramType, LayoutEdge, LayoutType, MetaModel, PositionedNode, calculate_layout_quality,
    grid_layout, transform_model,
};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScoreOptions {
    layout_type: Option<LayoutType>,
    diagram_type: Option<DiagramType>,
}

#[derive(Debug, Deserialize)]
struct LayoutInput {
    nodes: Vec<PositionedNode>,
    #[serde(default)]
    edges: Vec<LayoutEdge>,
}

fn to_js_error(error: impl ToString) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn score(layout_json: &str, options: ScoreOptions) -> Result<String, String> {
    let input: LayoutInput = serde_json::from_str(layout_json).map_err(|e| e.to_string())?;
    let report = calculate_layout_quality(
        &input.nodes,
        &input.edges,
        options.layout_type.unwrap_or(LayoutType::Hierarchical),
        options.diagram_type.unwrap_or(DiagramType::C4),
    );
    serde_json::to_string(&report).map_err(|e| e.to_string())
}

fn transform(model_json: &str) -> Result<String, String> {
    let model: MetaModel = serde_json::from_str(model_json).map_err(|e| e.to_string())?;
    let graph = transform_model(&model).map_err(|e| e.to_string())?;
    serde_json::to_string(&graph).map_err(|e| e.to_string())
}

/// Scores `{nodes, edges}` JSON and returns the quality report as JSON.
#[wasm_bindgen]
pub fn score_layout(layout_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<ScoreOptions>(&raw_options).map_err(to_js_error)?
    } else {
        ScoreOptions::default()
    };
    score(layout_json, options).map_err(to_js_error)
}

#[wasm_bindgen]
pub fn transform_model_json(model_json: &str) -> Result<String, JsValue> {
    transform(model_json).map_err(to_js_error)
}

/// Transforms a model, places it on a grid, and scores the result.
#[wasm_bindgen]
pub fn score_model(model_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let model: MetaModel = serde_json::from_str(model_json).map_err(to_js_error)?;
    let graph = transform_model(&model).map_err(to_js_error)?;
    let (nodes, edges) = grid_layout(&graph, &GridConfig::default());
    let layout = serde_json::json!({ "nodes": nodes, "edges": edges }).to_string();
    score_layout(&layout, options_json)
}
