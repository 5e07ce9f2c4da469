//! Relationship to edge conversion with duplicate suppression.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{LayerKind, Relationship};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawableEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub relationship_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_id: Option<String>,
}

/// Identity of a relationship for deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeKey {
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_type: Option<String>,
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.source, self.target)?;
        if let Some(kind) = &self.relationship_type {
            write!(f, ":{kind}")?;
        }
        Ok(())
    }
}

/// Whether the relationship type is part of the dedup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupPolicy {
    SourceTarget,
    SourceTargetType,
}

impl DedupPolicy {
    /// Motivation relationships of different types (influence, realizes, ...)
    /// are distinct edges; elsewhere one edge per endpoint pair.
    pub fn for_layer(kind: LayerKind) -> Self {
        match kind {
            LayerKind::Motivation => Self::SourceTargetType,
            _ => Self::SourceTarget,
        }
    }

    pub fn key(self, relationship: &Relationship) -> EdgeKey {
        EdgeKey {
            source: relationship.source_id.clone(),
            target: relationship.target_id.clone(),
            relationship_type: match self {
                Self::SourceTarget => None,
                Self::SourceTargetType => Some(relationship.relationship_type.clone()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedRelationship {
    pub relationship_id: String,
    /// Id of the edge that already claimed the key.
    pub kept_id: String,
    pub key: EdgeKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DanglingRelationship {
    pub relationship_id: String,
    pub source: String,
    pub target: String,
}

/// Accumulates edges across layers. The first relationship claiming a key
/// wins; later ones are recorded and logged.
#[derive(Debug, Default)]
pub struct EdgeBuilder {
    edges: Vec<DrawableEdge>,
    claimed: HashMap<EdgeKey, String>,
    skipped: Vec<SkippedRelationship>,
    dangling: Vec<DanglingRelationship>,
}

impl EdgeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        relationship: &Relationship,
        policy: DedupPolicy,
        layer_id: Option<&str>,
        node_ids: &HashSet<&str>,
    ) {
        if !node_ids.contains(relationship.source_id.as_str())
            || !node_ids.contains(relationship.target_id.as_str())
        {
            tracing::debug!(
                relationship = %relationship.id,
                source = %relationship.source_id,
                target = %relationship.target_id,
                "dropping relationship with missing endpoint"
            );
            self.dangling.push(DanglingRelationship {
                relationship_id: relationship.id.clone(),
                source: relationship.source_id.clone(),
                target: relationship.target_id.clone(),
            });
            return;
        }

        let key = policy.key(relationship);
        if let Some(kept_id) = self.claimed.get(&key) {
            tracing::warn!(
                relationship = %relationship.id,
                kept = %kept_id,
                source = %relationship.source_id,
                target = %relationship.target_id,
                key = %key,
                "skipping duplicate relationship"
            );
            self.skipped.push(SkippedRelationship {
                relationship_id: relationship.id.clone(),
                kept_id: kept_id.clone(),
                key,
            });
            return;
        }

        self.claimed.insert(key, relationship.id.clone());
        self.edges.push(DrawableEdge {
            id: relationship.id.clone(),
            source: relationship.source_id.clone(),
            target: relationship.target_id.clone(),
            relationship_type: relationship.relationship_type.clone(),
            layer_id: layer_id.map(str::to_string),
        });
    }

    pub fn finish(
        self,
    ) -> (
        Vec<DrawableEdge>,
        Vec<SkippedRelationship>,
        Vec<DanglingRelationship>,
    ) {
        (self.edges, self.skipped, self.dangling)
    }
}
