pub mod compare;
pub mod config;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod history;
pub mod layout;
pub mod metrics;
pub mod model;
pub mod quality;
pub mod scoring;
pub mod transform;

#[cfg(feature = "cli")]
pub mod cli;

pub use compare::{QualityComparison, compare_layout_quality};
pub use config::{Config, load_config};
pub use error::{Error, Result};
pub use graph::{LayoutEdge, PositionedNode, to_readability_graph};
pub use history::{MetricsHistory, RegressionResult, RegressionSeverity, SaveOptions};
pub use layout::grid_layout;
pub use model::MetaModel;
pub use quality::{LayoutQualityReport, LayoutType, QualityEvaluator, calculate_layout_quality};
pub use scoring::{DiagramType, MetricWeights, get_metric_weights};
pub use transform::{TransformedGraph, transform_model};

#[cfg(feature = "cli")]
pub use cli::run;
