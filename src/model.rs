//! Serde shapes of the layered architecture model fed to the transformer.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::geometry::{Point, Size};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaModel {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Keyed by layer id, in document order.
    #[serde(default)]
    pub layers: IndexMap<String, Layer>,
    #[serde(default)]
    pub references: Vec<CrossLayerReference>,
}

impl MetaModel {
    pub fn element_count(&self) -> usize {
        self.layers.values().map(|layer| layer.elements.len()).sum()
    }

    pub fn find_element(&self, id: &str) -> Option<&ModelElement> {
        self.layers
            .values()
            .flat_map(|layer| layer.elements.iter())
            .find(|element| element.id == id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub id: String,
    #[serde(rename = "type", default)]
    pub layer_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub elements: Vec<ModelElement>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl Layer {
    pub fn kind(&self) -> LayerKind {
        LayerKind::from_id(&self.id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelElement {
    pub id: String,
    #[serde(rename = "type")]
    pub element_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub layer_id: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual: Option<Visual>,
}

impl ModelElement {
    /// `name`, falling back to a `name` property, then the id.
    pub fn display_name(&self) -> &str {
        if !self.name.is_empty() {
            return &self.name;
        }
        match self.properties.get("name") {
            Some(Value::String(name)) if !name.is_empty() => name,
            _ => &self.id,
        }
    }

    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }

    pub fn property_bool(&self, key: &str) -> Option<bool> {
        self.properties.get(key).and_then(Value::as_bool)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub id: String,
    #[serde(rename = "type", default)]
    pub relationship_type: String,
    pub source_id: String,
    pub target_id: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub properties: Map<String, Value>,
}

impl Relationship {
    pub fn new(
        id: impl Into<String>,
        relationship_type: impl Into<String>,
        source_id: impl Into<String>,
        target_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            relationship_type: relationship_type.into(),
            source_id: source_id.into(),
            target_id: target_id.into(),
            properties: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visual {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub style: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRef {
    pub layer_id: String,
    pub element_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossLayerReference {
    pub source: ElementRef,
    pub target: ElementRef,
    #[serde(rename = "type", default)]
    pub reference_type: String,
}

/// Architecture layer a layer id refers to. Ids arrive both as `data_model` and
/// `DataModel`, so matching ignores case and separators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Motivation,
    Business,
    Security,
    Application,
    Technology,
    Api,
    DataModel,
    Datastore,
    Ux,
    Navigation,
    Apm,
    Other,
}

impl LayerKind {
    pub fn from_id(id: &str) -> Self {
        match normalize_tag(id).as_str() {
            "motivation" => Self::Motivation,
            "business" => Self::Business,
            "security" => Self::Security,
            "application" | "c4" => Self::Application,
            "technology" => Self::Technology,
            "api" => Self::Api,
            "datamodel" | "data" => Self::DataModel,
            "datastore" => Self::Datastore,
            "ux" => Self::Ux,
            "navigation" => Self::Navigation,
            "apm" | "apmobservability" => Self::Apm,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LayerKind::Motivation => "Motivation",
            LayerKind::Business => "Business",
            LayerKind::Security => "Security",
            LayerKind::Application => "Application",
            LayerKind::Technology => "Technology",
            LayerKind::Api => "Api",
            LayerKind::DataModel => "DataModel",
            LayerKind::Datastore => "Datastore",
            LayerKind::Ux => "Ux",
            LayerKind::Navigation => "Navigation",
            LayerKind::Apm => "ApmObservability",
            LayerKind::Other => "Other",
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercases and strips `-`, `_`, and whitespace.
pub(crate) fn normalize_tag(raw: &str) -> String {
    raw.chars()
        .filter(|ch| !matches!(ch, '-' | '_') && !ch.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
