use crate::metrics::{Greadability, DEFAULT_IDEAL_CROSSING_ANGLE};
use crate::quality::QualityEvaluator;
use crate::scoring::{DiagramType, MetricWeights, WeightTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub ideal_crossing_angle: f64,
    /// Replacement weight profiles; types not listed keep the built-in profile.
    pub weights: BTreeMap<DiagramType, MetricWeights>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            ideal_crossing_angle: DEFAULT_IDEAL_CROSSING_ANGLE,
            weights: BTreeMap::new(),
        }
    }
}

/// Lower bounds, in percent of score lost, of each regression band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionThresholds {
    pub minor: f64,
    pub moderate: f64,
    pub severe: f64,
}

impl Default for RegressionThresholds {
    fn default() -> Self {
        Self {
            minor: 5.0,
            moderate: 10.0,
            severe: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    pub storage_key_prefix: String,
    pub max_snapshots: usize,
    pub regression: RegressionThresholds,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            storage_key_prefix: "layout-metrics-".to_string(),
            max_snapshots: 100,
            regression: RegressionThresholds::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub column_gap: f64,
    pub row_gap: f64,
    /// Fixed column count; `None` uses `ceil(sqrt(n))`.
    pub columns: Option<usize>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            column_gap: 80.0,
            row_gap: 80.0,
            columns: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub scoring: ScoringConfig,
    pub history: HistoryConfig,
    pub grid: GridConfig,
}

impl Config {
    pub fn evaluator(&self) -> QualityEvaluator {
        QualityEvaluator::new(
            Box::new(Greadability {
                ideal_crossing_angle: self.scoring.ideal_crossing_angle,
            }),
            WeightTable::with_overrides(self.scoring.weights.clone()),
        )
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ScoringConfigFile {
    ideal_crossing_angle: Option<f64>,
    weights: Option<BTreeMap<DiagramType, MetricWeights>>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RegressionConfigFile {
    minor: Option<f64>,
    moderate: Option<f64>,
    severe: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct HistoryConfigFile {
    storage_key_prefix: Option<String>,
    max_snapshots: Option<usize>,
    regression: Option<RegressionConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GridConfigFile {
    column_gap: Option<f64>,
    row_gap: Option<f64>,
    columns: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    scoring: Option<ScoringConfigFile>,
    history: Option<HistoryConfigFile>,
    grid: Option<GridConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parses a camelCase JSON (or JSON5) config, merging present fields over the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = match serde_json::from_str(contents) {
        Ok(parsed) => parsed,
        Err(json_err) => json5::from_str(contents)
            .map_err(|_| anyhow::anyhow!("invalid config file: {json_err}"))?,
    };

    let mut config = Config::default();

    if let Some(scoring) = parsed.scoring {
        if let Some(v) = scoring.ideal_crossing_angle {
            if !(v > 0.0 && v <= 90.0) {
                return Err(anyhow::anyhow!(
                    "idealCrossingAngle must be within (0, 90], got {v}"
                ));
            }
            config.scoring.ideal_crossing_angle = v;
        }
        if let Some(weights) = scoring.weights {
            for (diagram, profile) in &weights {
                validate_weights(*diagram, profile)?;
            }
            config.scoring.weights = weights;
        }
    }

    if let Some(history) = parsed.history {
        if let Some(v) = history.storage_key_prefix {
            config.history.storage_key_prefix = v;
        }
        if let Some(v) = history.max_snapshots {
            if v == 0 {
                return Err(anyhow::anyhow!("maxSnapshots must be at least 1"));
            }
            config.history.max_snapshots = v;
        }
        if let Some(regression) = history.regression {
            if let Some(v) = regression.minor {
                config.history.regression.minor = v;
            }
            if let Some(v) = regression.moderate {
                config.history.regression.moderate = v;
            }
            if let Some(v) = regression.severe {
                config.history.regression.severe = v;
            }
            let r = config.history.regression;
            if !(0.0 <= r.minor && r.minor <= r.moderate && r.moderate <= r.severe) {
                return Err(anyhow::anyhow!(
                    "regression thresholds must satisfy 0 <= minor <= moderate <= severe"
                ));
            }
        }
    }

    if let Some(grid) = parsed.grid {
        if let Some(v) = grid.column_gap {
            config.grid.column_gap = v;
        }
        if let Some(v) = grid.row_gap {
            config.grid.row_gap = v;
        }
        if grid.columns.is_some() {
            config.grid.columns = grid.columns.filter(|columns| *columns > 0);
        }
    }

    Ok(config)
}

fn validate_weights(diagram: DiagramType, weights: &MetricWeights) -> anyhow::Result<()> {
    if weights.values().iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(anyhow::anyhow!(
            "weights for `{diagram}` must be finite and non-negative"
        ));
    }
    let sum = weights.sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(anyhow::anyhow!(
            "weights for `{diagram}` sum to {sum}, expected 1.0"
        ));
    }
    Ok(())
}
