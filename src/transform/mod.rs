//! Maps a layered [`MetaModel`] into drawable nodes and deduplicated edges.

mod edges;
mod elements;
mod fields;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::{Point, Size};
use crate::model::{LayerKind, MetaModel, ModelElement, Relationship};

pub use edges::{
    DanglingRelationship, DedupPolicy, DrawableEdge, EdgeBuilder, EdgeKey, SkippedRelationship,
};
pub use elements::{Badge, BadgePosition, ElementKind, NodeType};
pub use fields::{extract_field_items, field_label, FieldItem};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawableNode {
    pub id: String,
    pub node_type: NodeType,
    pub label: String,
    pub layer_id: String,
    /// Type tag as written in the model.
    pub element_type: String,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub badges: Vec<Badge>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub field_items: Vec<FieldItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformedGraph {
    pub nodes: Vec<DrawableNode>,
    pub edges: Vec<DrawableEdge>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_duplicates: Vec<SkippedRelationship>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dangling: Vec<DanglingRelationship>,
}

pub fn transform_element(element: &ModelElement, layer_id: &str) -> Result<DrawableNode> {
    let kind = ElementKind::from_tag(&element.element_type).ok_or_else(|| {
        Error::UnknownElementType {
            element_id: element.id.clone(),
            element_type: element.element_type.clone(),
        }
    })?;
    let node_type = kind.node_type();
    let decoration = kind.decorate(element);
    let visual = element.visual.as_ref();
    let size = visual
        .and_then(|visual| visual.size)
        .filter(|size| size.width > 0.0 && size.height > 0.0)
        .unwrap_or_else(|| node_type.default_size());
    let Size { width, height } = size;

    Ok(DrawableNode {
        id: element.id.clone(),
        node_type,
        label: element.display_name().to_string(),
        layer_id: if element.layer_id.is_empty() {
            layer_id.to_string()
        } else {
            element.layer_id.clone()
        },
        element_type: element.element_type.clone(),
        width,
        height,
        position: visual.and_then(|visual| visual.position),
        badges: decoration.badges,
        field_items: extract_field_items(
            &element.properties,
            &decoration.leading_keys,
            &decoration.consumed_keys,
        ),
    })
}

/// Transforms every element of every layer, then builds edges from layer
/// relationships, element relationships, and cross-layer references, in that
/// order. A reference is keyed with the dedup policy of the layer owning its
/// source element. Fails on the first element whose type has no mapping.
pub fn transform_model(model: &MetaModel) -> Result<TransformedGraph> {
    let mut nodes = Vec::with_capacity(model.element_count());
    for (layer_id, layer) in &model.layers {
        for element in &layer.elements {
            nodes.push(transform_element(element, layer_id)?);
        }
    }

    let node_ids: HashSet<&str> = nodes.iter().map(|node| node.id.as_str()).collect();
    let owners: HashMap<&str, LayerKind> = model
        .layers
        .iter()
        .flat_map(|(layer_id, layer)| {
            let kind = LayerKind::from_id(layer_id);
            layer.elements.iter().map(move |element| (element.id.as_str(), kind))
        })
        .collect();
    let mut builder = EdgeBuilder::new();
    for (layer_id, layer) in &model.layers {
        let policy = DedupPolicy::for_layer(LayerKind::from_id(layer_id));
        let element_relationships = layer
            .elements
            .iter()
            .flat_map(|element| element.relationships.iter());
        for relationship in layer.relationships.iter().chain(element_relationships) {
            builder.push(relationship, policy, Some(layer_id.as_str()), &node_ids);
        }
    }
    for reference in &model.references {
        let relationship = Relationship::new(
            format!(
                "{}-{}-{}",
                reference.source.element_id, reference.reference_type, reference.target.element_id
            ),
            reference.reference_type.clone(),
            reference.source.element_id.clone(),
            reference.target.element_id.clone(),
        );
        let policy = owners
            .get(reference.source.element_id.as_str())
            .map_or(DedupPolicy::SourceTarget, |kind| DedupPolicy::for_layer(*kind));
        builder.push(&relationship, policy, None, &node_ids);
    }

    let (edges, skipped_duplicates, dangling) = builder.finish();
    tracing::debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        skipped = skipped_duplicates.len(),
        dangling = dangling.len(),
        "transformed model"
    );
    Ok(TransformedGraph {
        nodes,
        edges,
        skipped_duplicates,
        dangling,
    })
}
