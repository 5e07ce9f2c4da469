use serde::{Deserialize, Serialize};

use crate::quality::LayoutQualityReport;
use crate::scoring::{edge_length_uniformity, node_occlusion_score};

/// Percentage change from `baseline` to `current`.
///
/// A non-positive baseline is treated as starting from nothing: the result is
/// `current * 100`, so the outcome is always finite.
pub fn percentage_change(current: f64, baseline: f64) -> f64 {
    if baseline > 0.0 {
        (current - baseline) / baseline * 100.0
    } else {
        current * 100.0
    }
}

/// Per-metric percentage changes, every one using [`percentage_change`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricChanges {
    pub crossing_number: f64,
    pub crossing_angle: f64,
    pub angular_resolution_min: f64,
    pub angular_resolution_dev: f64,
    pub edge_length_uniformity: f64,
    pub node_occlusion: f64,
}

impl MetricChanges {
    pub fn between(current: &LayoutQualityReport, baseline: &LayoutQualityReport) -> Self {
        let (cur, base) = (&current.metrics, &baseline.metrics);
        Self {
            crossing_number: percentage_change(cur.crossing_number, base.crossing_number),
            crossing_angle: percentage_change(cur.crossing_angle, base.crossing_angle),
            angular_resolution_min: percentage_change(
                cur.angular_resolution_min,
                base.angular_resolution_min,
            ),
            angular_resolution_dev: percentage_change(
                cur.angular_resolution_dev,
                base.angular_resolution_dev,
            ),
            edge_length_uniformity: percentage_change(
                edge_length_uniformity(&current.extended_metrics),
                edge_length_uniformity(&baseline.extended_metrics),
            ),
            node_occlusion: percentage_change(
                node_occlusion_score(&current.extended_metrics, current.node_count),
                node_occlusion_score(&baseline.extended_metrics, baseline.node_count),
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityComparison {
    pub overall_improvement: f64,
    pub improved: bool,
    pub metric_changes: MetricChanges,
}

pub fn compare_layout_quality(
    current: &LayoutQualityReport,
    baseline: &LayoutQualityReport,
) -> QualityComparison {
    let overall_improvement = percentage_change(current.overall_score, baseline.overall_score);
    QualityComparison {
        overall_improvement,
        improved: overall_improvement > 0.0,
        metric_changes: MetricChanges::between(current, baseline),
    }
}
