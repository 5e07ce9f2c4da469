//! Element type dispatch: the alias table resolving raw `type` tags, the node
//! type each kind renders as, and the per-kind badge handlers.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::geometry::Size;
use crate::model::{normalize_tag, ModelElement};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Goal,
    Requirement,
    Stakeholder,
    Driver,
    Outcome,
    Principle,
    Constraint,
    Assessment,
    Process,
    Function,
    Service,
    Actor,
    Event,
    Person,
    System,
    Container,
    Component,
    Entity,
    Database,
}

static ELEMENT_KINDS: Lazy<HashMap<&'static str, ElementKind>> = Lazy::new(|| {
    use ElementKind::*;
    HashMap::from([
        ("goal", Goal),
        ("requirement", Requirement),
        ("stakeholder", Stakeholder),
        ("driver", Driver),
        ("outcome", Outcome),
        ("principle", Principle),
        ("constraint", Constraint),
        ("assessment", Assessment),
        ("process", Process),
        ("businessprocess", Process),
        ("function", Function),
        ("businessfunction", Function),
        ("service", Service),
        ("businessservice", Service),
        ("actor", Actor),
        ("businessactor", Actor),
        ("event", Event),
        ("businessevent", Event),
        ("person", Person),
        ("system", System),
        ("softwaresystem", System),
        ("container", Container),
        ("component", Component),
        ("entity", Entity),
        ("schema", Entity),
        ("database", Database),
        ("datastore", Database),
    ])
});

impl ElementKind {
    /// Resolves a raw type tag; case, `-`, `_`, and spaces are ignored.
    pub fn from_tag(tag: &str) -> Option<Self> {
        ELEMENT_KINDS.get(normalize_tag(tag).as_str()).copied()
    }

    pub fn node_type(self) -> NodeType {
        match self {
            ElementKind::Goal => NodeType::MotivationGoal,
            ElementKind::Requirement => NodeType::MotivationRequirement,
            ElementKind::Stakeholder => NodeType::MotivationStakeholder,
            ElementKind::Driver => NodeType::MotivationDriver,
            ElementKind::Outcome => NodeType::MotivationOutcome,
            ElementKind::Principle => NodeType::MotivationPrinciple,
            ElementKind::Constraint => NodeType::MotivationConstraint,
            ElementKind::Assessment => NodeType::MotivationAssessment,
            ElementKind::Process => NodeType::BusinessProcess,
            ElementKind::Function => NodeType::BusinessFunction,
            ElementKind::Service => NodeType::BusinessService,
            ElementKind::Actor => NodeType::BusinessActor,
            ElementKind::Event => NodeType::BusinessEvent,
            ElementKind::Person => NodeType::C4Person,
            ElementKind::System => NodeType::C4System,
            ElementKind::Container => NodeType::C4Container,
            ElementKind::Component => NodeType::C4Component,
            ElementKind::Entity => NodeType::DataEntity,
            ElementKind::Database => NodeType::DataDatabase,
        }
    }

    pub(crate) fn decorate(self, element: &ModelElement) -> Decoration {
        match self {
            ElementKind::Requirement => requirement_badges(element),
            ElementKind::Goal => goal_badges(element),
            ElementKind::Stakeholder => stakeholder_badges(element),
            ElementKind::Process => process_badges(element),
            ElementKind::Container | ElementKind::Component => leading_fields(element),
            ElementKind::Driver
            | ElementKind::Outcome
            | ElementKind::Principle
            | ElementKind::Constraint
            | ElementKind::Assessment
            | ElementKind::Function
            | ElementKind::Service
            | ElementKind::Actor
            | ElementKind::Event
            | ElementKind::Person
            | ElementKind::System
            | ElementKind::Entity
            | ElementKind::Database => Decoration::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeType {
    MotivationGoal,
    MotivationRequirement,
    MotivationStakeholder,
    MotivationDriver,
    MotivationOutcome,
    MotivationPrinciple,
    MotivationConstraint,
    MotivationAssessment,
    BusinessProcess,
    BusinessFunction,
    BusinessService,
    BusinessActor,
    BusinessEvent,
    C4Person,
    C4System,
    C4Container,
    C4Component,
    DataEntity,
    DataDatabase,
}

impl NodeType {
    pub fn default_size(self) -> Size {
        let (width, height) = match self {
            NodeType::MotivationStakeholder | NodeType::BusinessActor => (160.0, 90.0),
            NodeType::MotivationRequirement | NodeType::MotivationConstraint => (180.0, 100.0),
            NodeType::BusinessProcess | NodeType::BusinessFunction => (200.0, 90.0),
            NodeType::BusinessEvent => (160.0, 80.0),
            NodeType::C4Person => (160.0, 120.0),
            NodeType::C4System => (240.0, 150.0),
            NodeType::C4Container => (220.0, 140.0),
            NodeType::C4Component => (200.0, 120.0),
            NodeType::DataEntity => (220.0, 160.0),
            NodeType::DataDatabase => (180.0, 120.0),
            _ => (180.0, 110.0),
        };
        Size { width, height }
    }
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::MotivationGoal => "motivation-goal",
            NodeType::MotivationRequirement => "motivation-requirement",
            NodeType::MotivationStakeholder => "motivation-stakeholder",
            NodeType::MotivationDriver => "motivation-driver",
            NodeType::MotivationOutcome => "motivation-outcome",
            NodeType::MotivationPrinciple => "motivation-principle",
            NodeType::MotivationConstraint => "motivation-constraint",
            NodeType::MotivationAssessment => "motivation-assessment",
            NodeType::BusinessProcess => "business-process",
            NodeType::BusinessFunction => "business-function",
            NodeType::BusinessService => "business-service",
            NodeType::BusinessActor => "business-actor",
            NodeType::BusinessEvent => "business-event",
            NodeType::C4Person => "c4-person",
            NodeType::C4System => "c4-system",
            NodeType::C4Container => "c4-container",
            NodeType::C4Component => "c4-component",
            NodeType::DataEntity => "data-entity",
            NodeType::DataDatabase => "data-database",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BadgePosition {
    TopLeft,
    TopRight,
    Inline,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub content: String,
    pub position: BadgePosition,
    pub aria_label: String,
}

impl Badge {
    fn new(content: impl Into<String>, position: BadgePosition, aria_label: String) -> Self {
        Self {
            content: content.into(),
            position,
            aria_label,
        }
    }
}

/// What a kind handler contributes beyond the generic field items.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Decoration {
    pub badges: Vec<Badge>,
    /// Property keys shown ahead of every other field item.
    pub leading_keys: Vec<&'static str>,
    /// Property keys already rendered as badges.
    pub consumed_keys: Vec<&'static str>,
}

const SATISFIED_STATUSES: &[&str] = &[
    "satisfied",
    "implemented",
    "approved",
    "met",
    "done",
    "complete",
    "completed",
];

fn requirement_badges(element: &ModelElement) -> Decoration {
    let status = element.property_str("status").unwrap_or("unspecified");
    let satisfied = SATISFIED_STATUSES.contains(&status.to_ascii_lowercase().as_str());
    let glyph = if satisfied { "✓" } else { "○" };
    Decoration {
        badges: vec![Badge::new(
            glyph,
            BadgePosition::TopLeft,
            format!("Requirement status: {status}"),
        )],
        consumed_keys: vec!["status"],
        ..Decoration::default()
    }
}

fn goal_badges(element: &ModelElement) -> Decoration {
    let Some(priority) = element.property_str("priority") else {
        return Decoration::default();
    };
    Decoration {
        badges: vec![Badge::new(
            priority.to_ascii_uppercase(),
            BadgePosition::TopRight,
            format!("Priority: {priority}"),
        )],
        consumed_keys: vec!["priority"],
        ..Decoration::default()
    }
}

fn stakeholder_badges(element: &ModelElement) -> Decoration {
    let Some(kind) = element.property_str("stakeholderType") else {
        return Decoration::default();
    };
    Decoration {
        badges: vec![Badge::new(
            kind,
            BadgePosition::Inline,
            format!("Stakeholder type: {kind}"),
        )],
        consumed_keys: vec!["stakeholderType"],
        ..Decoration::default()
    }
}

fn process_badges(element: &ModelElement) -> Decoration {
    let mut decoration = Decoration::default();
    if let Some(owner) = element.property_str("owner") {
        decoration.badges.push(Badge::new(
            owner,
            BadgePosition::Inline,
            format!("Owner: {owner}"),
        ));
        decoration.consumed_keys.push("owner");
    }
    if let Some(criticality) = element.property_str("criticality") {
        decoration.badges.push(Badge::new(
            criticality.to_ascii_uppercase(),
            BadgePosition::TopRight,
            format!("Criticality: {criticality}"),
        ));
        decoration.consumed_keys.push("criticality");
    }
    let subprocesses = match element.properties.get("subprocesses") {
        Some(Value::Array(items)) => items.len(),
        _ => 0,
    };
    if subprocesses > 0 {
        let badge = if element.property_bool("_expanded").unwrap_or(false) {
            Badge::new(
                "▼",
                BadgePosition::TopLeft,
                "Collapse subprocesses".to_string(),
            )
        } else {
            Badge::new(
                "▶",
                BadgePosition::TopLeft,
                format!("Expand {subprocesses} subprocesses"),
            )
        };
        decoration.badges.push(badge);
    }
    decoration
}

fn leading_fields(_element: &ModelElement) -> Decoration {
    Decoration {
        leading_keys: vec!["technology", "description"],
        ..Decoration::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn element(element_type: &str, properties: Value) -> ModelElement {
        ModelElement {
            id: "e1".to_string(),
            element_type: element_type.to_string(),
            properties: properties.as_object().cloned().unwrap_or_default(),
            ..ModelElement::default()
        }
    }

    #[test]
    fn tags_resolve_loosely() {
        assert_eq!(ElementKind::from_tag("Goal"), Some(ElementKind::Goal));
        assert_eq!(ElementKind::from_tag("business_process"), Some(ElementKind::Process));
        assert_eq!(ElementKind::from_tag("Software System"), Some(ElementKind::System));
        assert_eq!(ElementKind::from_tag("data-store"), Some(ElementKind::Database));
        assert_eq!(ElementKind::from_tag("schema"), Some(ElementKind::Entity));
        assert_eq!(ElementKind::from_tag("widget"), None);
    }

    #[test]
    fn requirement_status_glyph() {
        let done = element("requirement", json!({ "status": "Satisfied" }));
        let badge = &ElementKind::Requirement.decorate(&done).badges[0];
        assert_eq!(badge.content, "✓");
        assert_eq!(badge.position, BadgePosition::TopLeft);
        assert_eq!(badge.aria_label, "Requirement status: Satisfied");

        let open = element("requirement", json!({}));
        assert_eq!(ElementKind::Requirement.decorate(&open).badges[0].content, "○");
    }

    #[test]
    fn goal_priority_sits_top_right() {
        let goal = element("goal", json!({ "priority": "high" }));
        let decoration = ElementKind::Goal.decorate(&goal);
        assert_eq!(decoration.badges[0].content, "HIGH");
        assert_eq!(decoration.badges[0].position, BadgePosition::TopRight);
        assert_eq!(decoration.consumed_keys, vec!["priority"]);

        assert!(ElementKind::Goal.decorate(&element("goal", json!({}))).badges.is_empty());
    }

    #[test]
    fn process_expand_badge_tracks_state() {
        let collapsed = element(
            "process",
            json!({ "owner": "ops", "criticality": "high", "subprocesses": ["a", "b"] }),
        );
        let badges = ElementKind::Process.decorate(&collapsed).badges;
        assert_eq!(badges.len(), 3);
        assert_eq!(badges[0].position, BadgePosition::Inline);
        assert_eq!(badges[2].content, "▶");
        assert_eq!(badges[2].aria_label, "Expand 2 subprocesses");

        let expanded = element("process", json!({ "subprocesses": ["a"], "_expanded": true }));
        let badges = ElementKind::Process.decorate(&expanded).badges;
        assert_eq!(badges.len(), 1);
        assert_eq!(badges[0].content, "▼");

        let leaf = element("process", json!({ "subprocesses": [] }));
        assert!(ElementKind::Process.decorate(&leaf).badges.is_empty());
    }

    #[test]
    fn node_types_serialize_kebab_case() {
        assert_eq!(NodeType::C4Container.to_string(), "c4-container");
        assert_eq!(
            serde_json::to_value(NodeType::C4Container).unwrap(),
            json!(NodeType::C4Container.as_str())
        );
        assert_eq!(
            ElementKind::Database.node_type().to_string(),
            "data-database"
        );
    }
}
