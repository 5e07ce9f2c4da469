use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::metrics::{ExtendedMetrics, ReadabilityMetrics};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagramType {
    Motivation,
    Business,
    C4,
    Application,
    Technology,
    DataModel,
}

impl DiagramType {
    pub const ALL: [DiagramType; 6] = [
        DiagramType::Motivation,
        DiagramType::Business,
        DiagramType::C4,
        DiagramType::Application,
        DiagramType::Technology,
        DiagramType::DataModel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DiagramType::Motivation => "motivation",
            DiagramType::Business => "business",
            DiagramType::C4 => "c4",
            DiagramType::Application => "application",
            DiagramType::Technology => "technology",
            DiagramType::DataModel => "data-model",
        }
    }
}

impl fmt::Display for DiagramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiagramType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "motivation" => Ok(Self::Motivation),
            "business" => Ok(Self::Business),
            "c4" => Ok(Self::C4),
            "application" => Ok(Self::Application),
            "technology" => Ok(Self::Technology),
            "data-model" | "datamodel" | "data" => Ok(Self::DataModel),
            other => Err(format!("unknown diagram type: {other}")),
        }
    }
}

/// Relative importance of each scored dimension. The six fields of a weight
/// record sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricWeights {
    pub crossing_number: f64,
    pub crossing_angle: f64,
    pub angular_resolution_min: f64,
    pub angular_resolution_dev: f64,
    pub edge_length_uniformity: f64,
    pub node_occlusion: f64,
}

impl MetricWeights {
    pub fn sum(&self) -> f64 {
        self.crossing_number
            + self.crossing_angle
            + self.angular_resolution_min
            + self.angular_resolution_dev
            + self.edge_length_uniformity
            + self.node_occlusion
    }

    pub fn values(&self) -> [f64; 6] {
        [
            self.crossing_number,
            self.crossing_angle,
            self.angular_resolution_min,
            self.angular_resolution_dev,
            self.edge_length_uniformity,
            self.node_occlusion,
        ]
    }
}

// Crossings dominate on motivation views, where dense causal arrows tangle first.
const MOTIVATION_WEIGHTS: MetricWeights = MetricWeights {
    crossing_number: 0.30,
    crossing_angle: 0.15,
    angular_resolution_min: 0.15,
    angular_resolution_dev: 0.10,
    edge_length_uniformity: 0.10,
    node_occlusion: 0.20,
};

// Process and swimlane views read best with even edge lengths.
const BUSINESS_WEIGHTS: MetricWeights = MetricWeights {
    crossing_number: 0.15,
    crossing_angle: 0.10,
    angular_resolution_min: 0.10,
    angular_resolution_dev: 0.10,
    edge_length_uniformity: 0.35,
    node_occlusion: 0.20,
};

const C4_WEIGHTS: MetricWeights = MetricWeights {
    crossing_number: 0.25,
    crossing_angle: 0.15,
    angular_resolution_min: 0.10,
    angular_resolution_dev: 0.10,
    edge_length_uniformity: 0.15,
    node_occlusion: 0.25,
};

const APPLICATION_WEIGHTS: MetricWeights = MetricWeights {
    crossing_number: 0.20,
    crossing_angle: 0.15,
    angular_resolution_min: 0.15,
    angular_resolution_dev: 0.10,
    edge_length_uniformity: 0.20,
    node_occlusion: 0.20,
};

const TECHNOLOGY_WEIGHTS: MetricWeights = MetricWeights {
    crossing_number: 0.20,
    crossing_angle: 0.10,
    angular_resolution_min: 0.15,
    angular_resolution_dev: 0.15,
    edge_length_uniformity: 0.20,
    node_occlusion: 0.20,
};

const DATA_MODEL_WEIGHTS: MetricWeights = MetricWeights {
    crossing_number: 0.25,
    crossing_angle: 0.10,
    angular_resolution_min: 0.10,
    angular_resolution_dev: 0.10,
    edge_length_uniformity: 0.20,
    node_occlusion: 0.25,
};

/// Built-in weight profile for a diagram type.
pub fn get_metric_weights(diagram_type: DiagramType) -> MetricWeights {
    match diagram_type {
        DiagramType::Motivation => MOTIVATION_WEIGHTS,
        DiagramType::Business => BUSINESS_WEIGHTS,
        DiagramType::C4 => C4_WEIGHTS,
        DiagramType::Application => APPLICATION_WEIGHTS,
        DiagramType::Technology => TECHNOLOGY_WEIGHTS,
        DiagramType::DataModel => DATA_MODEL_WEIGHTS,
    }
}

/// Diagram-type keyed weight profiles, the built-in ones unless overridden
/// through configuration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeightTable {
    overrides: BTreeMap<DiagramType, MetricWeights>,
}

impl WeightTable {
    pub fn with_overrides(overrides: BTreeMap<DiagramType, MetricWeights>) -> Self {
        Self { overrides }
    }

    pub fn get(&self, diagram_type: DiagramType) -> MetricWeights {
        self.overrides
            .get(&diagram_type)
            .copied()
            .unwrap_or_else(|| get_metric_weights(diagram_type))
    }
}

/// `1 - min(stdDev / mean, 1)`; a zero mean counts as perfectly uniform.
pub fn edge_length_uniformity(extended: &ExtendedMetrics) -> f64 {
    let stats = extended.edge_length;
    if stats.mean <= 0.0 {
        return 1.0;
    }
    (1.0 - (stats.std_dev / stats.mean).min(1.0)).clamp(0.0, 1.0)
}

/// `1 - occluded pairs / possible pairs`; trivially 1 with fewer than two nodes.
pub fn node_occlusion_score(extended: &ExtendedMetrics, node_count: usize) -> f64 {
    if node_count <= 1 {
        return 1.0;
    }
    let max_pairs = (node_count * (node_count - 1)) as f64 / 2.0;
    (1.0 - extended.node_node_occlusion as f64 / max_pairs).clamp(0.0, 1.0)
}

/// Weighted sum over the six scored dimensions.
pub fn calculate_overall_score(
    metrics: &ReadabilityMetrics,
    extended: &ExtendedMetrics,
    weights: &MetricWeights,
    node_count: usize,
) -> f64 {
    let score = weights.crossing_number * metrics.crossing_number
        + weights.crossing_angle * metrics.crossing_angle
        + weights.angular_resolution_min * metrics.angular_resolution_min
        + weights.angular_resolution_dev * metrics.angular_resolution_dev
        + weights.edge_length_uniformity * edge_length_uniformity(extended)
        + weights.node_occlusion * node_occlusion_score(extended, node_count);
    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::EdgeLengthStats;

    fn extended(std_dev: f64, mean: f64, occlusion: usize) -> ExtendedMetrics {
        ExtendedMetrics {
            readability: ReadabilityMetrics::PERFECT,
            edge_length: EdgeLengthStats {
                min: 0.0,
                max: 0.0,
                mean,
                std_dev,
            },
            node_node_occlusion: occlusion,
            aspect_ratio: 1.0,
            density: 0.0,
        }
    }

    #[test]
    fn weights_sum_to_one_for_every_diagram_type() {
        for diagram in DiagramType::ALL {
            let sum = get_metric_weights(diagram).sum();
            assert!((sum - 1.0).abs() < 1e-10, "{diagram}: weights sum to {sum}");
            assert!(get_metric_weights(diagram).values().iter().all(|w| *w >= 0.0));
        }
    }

    #[test]
    fn profiles_emphasize_their_priorities() {
        let motivation = get_metric_weights(DiagramType::Motivation);
        assert!(motivation.values().iter().all(|w| *w <= motivation.crossing_number));
        let business = get_metric_weights(DiagramType::Business);
        assert!(business.values().iter().all(|w| *w <= business.edge_length_uniformity));
    }

    #[test]
    fn perfect_inputs_score_one() {
        let weights = get_metric_weights(DiagramType::C4);
        let score = calculate_overall_score(
            &ReadabilityMetrics::PERFECT,
            &extended(0.0, 0.0, 0),
            &weights,
            4,
        );
        assert!((score - 1.0).abs() < 1e-10);
    }

    #[test]
    fn derived_scores_follow_their_definitions() {
        assert_eq!(edge_length_uniformity(&extended(50.0, 100.0, 0)), 0.5);
        assert_eq!(edge_length_uniformity(&extended(300.0, 100.0, 0)), 0.0);
        assert_eq!(edge_length_uniformity(&extended(0.0, 0.0, 0)), 1.0);
        assert_eq!(node_occlusion_score(&extended(0.0, 0.0, 3), 3), 0.0);
        assert_eq!(node_occlusion_score(&extended(0.0, 0.0, 0), 1), 1.0);
        assert_eq!(node_occlusion_score(&extended(0.0, 0.0, 1), 5), 0.9);
    }

    #[test]
    fn overrides_replace_builtin_profile() {
        let mut overrides = BTreeMap::new();
        overrides.insert(
            DiagramType::Business,
            MetricWeights {
                crossing_number: 1.0,
                crossing_angle: 0.0,
                angular_resolution_min: 0.0,
                angular_resolution_dev: 0.0,
                edge_length_uniformity: 0.0,
                node_occlusion: 0.0,
            },
        );
        let table = WeightTable::with_overrides(overrides);
        assert_eq!(table.get(DiagramType::Business).crossing_number, 1.0);
        assert_eq!(table.get(DiagramType::C4), get_metric_weights(DiagramType::C4));
    }

    #[test]
    fn diagram_type_parses_loosely() {
        assert_eq!("C4".parse::<DiagramType>(), Ok(DiagramType::C4));
        assert_eq!("data_model".parse::<DiagramType>(), Ok(DiagramType::DataModel));
        assert!("unknown".parse::<DiagramType>().is_err());
    }
}
