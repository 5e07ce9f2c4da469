//! Snapshot history of layout quality reports, with one baseline per
//! (diagram type, layout type) pair and regression detection against it.

pub mod store;

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::compare::{percentage_change, MetricChanges};
use crate::config::{HistoryConfig, RegressionThresholds};
use crate::error::{Error, Result};
use crate::quality::{LayoutQualityReport, LayoutType};
use crate::scoring::DiagramType;

pub use store::{FileStore, KeyValueStore, MemoryStore};

pub const EXPORT_FORMAT_VERSION: u32 = 1;

// Absorbs float noise such as 1.0 -> 0.9 computing to -9.999999999999998%.
const PERCENT_EPSILON: f64 = 1e-9;

pub type BaselineKey = (DiagramType, LayoutType);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub id: String,
    pub report: LayoutQualityReport,
    pub is_baseline: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl MetricsSnapshot {
    pub fn key(&self) -> BaselineKey {
        (self.report.diagram_type, self.report.layout_type)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveOptions {
    pub model_id: Option<String>,
    pub label: Option<String>,
    pub set_as_baseline: bool,
}

impl SaveOptions {
    pub fn baseline() -> Self {
        Self {
            set_as_baseline: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegressionSeverity {
    None,
    Minor,
    Moderate,
    Severe,
}

impl RegressionSeverity {
    /// Bands a percentage change; each band includes its lower bound.
    pub fn classify(percentage_change: f64, thresholds: &RegressionThresholds) -> Self {
        if percentage_change >= 0.0 || percentage_change.is_nan() {
            return Self::None;
        }
        let magnitude = percentage_change.abs() + PERCENT_EPSILON;
        if magnitude >= thresholds.severe {
            Self::Severe
        } else if magnitude >= thresholds.moderate {
            Self::Moderate
        } else if magnitude >= thresholds.minor {
            Self::Minor
        } else {
            Self::None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegressionResult {
    pub has_regression: bool,
    pub severity: RegressionSeverity,
    pub overall_percentage_change: f64,
    pub metric_changes: MetricChanges,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_id: Option<String>,
}

impl RegressionResult {
    fn without_baseline() -> Self {
        Self {
            has_regression: false,
            severity: RegressionSeverity::None,
            overall_percentage_change: 0.0,
            metric_changes: MetricChanges::default(),
            baseline_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageStats {
    pub total_snapshots: usize,
    pub baseline_count: usize,
    pub by_diagram_type: BTreeMap<DiagramType, usize>,
    pub oldest: Option<DateTime<Utc>>,
    pub newest: Option<DateTime<Utc>>,
}

/// Plain, self-contained copy of a history's state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryExport {
    pub version: u32,
    pub exported_at: DateTime<Utc>,
    pub snapshots: Vec<MetricsSnapshot>,
    /// `"{diagramType}:{layoutType}"` to snapshot id.
    pub baselines: BTreeMap<String, String>,
}

pub fn baseline_key_string((diagram, layout): BaselineKey) -> String {
    format!("{diagram}:{layout}")
}

pub fn parse_baseline_key(raw: &str) -> Option<BaselineKey> {
    let (diagram, layout) = raw.split_once(':')?;
    Some((diagram.parse().ok()?, layout.parse().ok()?))
}

fn generate_snapshot_id() -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!(
        "snapshot-{}-{}",
        Utc::now().timestamp_millis(),
        &random[..9]
    )
}

#[derive(Debug)]
pub struct MetricsHistory<S: KeyValueStore = MemoryStore> {
    config: HistoryConfig,
    store: S,
    snapshots: IndexMap<String, MetricsSnapshot>,
    baselines: HashMap<BaselineKey, String>,
}

impl MetricsHistory<MemoryStore> {
    pub fn in_memory(config: HistoryConfig) -> Self {
        Self {
            config,
            store: MemoryStore::new(),
            snapshots: IndexMap::new(),
            baselines: HashMap::new(),
        }
    }
}

impl<S: KeyValueStore> MetricsHistory<S> {
    /// Opens a history over `store`, loading whatever state it already holds
    /// under the configured key prefix.
    pub fn open(config: HistoryConfig, store: S) -> Result<Self> {
        let mut history = Self {
            config,
            store,
            snapshots: IndexMap::new(),
            baselines: HashMap::new(),
        };
        history.load()?;
        Ok(history)
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    fn snapshots_key(&self) -> String {
        format!("{}snapshots", self.config.storage_key_prefix)
    }

    fn baselines_key(&self) -> String {
        format!("{}baselines", self.config.storage_key_prefix)
    }

    fn load(&mut self) -> Result<()> {
        let snapshots_key = self.snapshots_key();
        let baselines_key = self.baselines_key();

        let snapshots: Vec<MetricsSnapshot> = match self.store.get(&snapshots_key)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|source| Error::Serialization {
                key: snapshots_key,
                source,
            })?,
            None => Vec::new(),
        };
        let baselines: BTreeMap<String, String> = match self.store.get(&baselines_key)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|source| Error::Serialization {
                key: baselines_key,
                source,
            })?,
            None => BTreeMap::new(),
        };

        self.replace_state(snapshots, baselines);
        Ok(())
    }

    fn replace_state(
        &mut self,
        snapshots: Vec<MetricsSnapshot>,
        baselines: BTreeMap<String, String>,
    ) {
        self.snapshots = IndexMap::with_capacity(snapshots.len());
        for snapshot in snapshots {
            if let Some(previous) = self.snapshots.insert(snapshot.id.clone(), snapshot) {
                tracing::warn!(
                    snapshot = %previous.id,
                    replaced_timestamp = %previous.report.timestamp,
                    "duplicate snapshot id; keeping the later entry"
                );
            }
        }
        self.baselines = baselines
            .iter()
            .filter_map(|(raw_key, id)| {
                let key = parse_baseline_key(raw_key)?;
                self.snapshots
                    .get(id)
                    .is_some_and(|snapshot| snapshot.key() == key)
                    .then(|| (key, id.clone()))
            })
            .collect();
        for snapshot in self.snapshots.values_mut() {
            snapshot.is_baseline = self.baselines.get(&snapshot.key()) == Some(&snapshot.id);
        }
    }

    fn persist(&mut self) -> Result<()> {
        let snapshots_key = self.snapshots_key();
        let baselines_key = self.baselines_key();
        let snapshots: Vec<&MetricsSnapshot> = self.snapshots.values().collect();
        let snapshots_json =
            serde_json::to_string(&snapshots).map_err(|source| Error::Serialization {
                key: snapshots_key.clone(),
                source,
            })?;
        let baselines_json = serde_json::to_string(&self.baseline_index()).map_err(|source| {
            Error::Serialization {
                key: baselines_key.clone(),
                source,
            }
        })?;
        self.store.set(&snapshots_key, &snapshots_json)?;
        self.store.set(&baselines_key, &baselines_json)
    }

    fn baseline_index(&self) -> BTreeMap<String, String> {
        self.baselines
            .iter()
            .map(|(key, id)| (baseline_key_string(*key), id.clone()))
            .collect()
    }

    pub fn save_snapshot(
        &mut self,
        report: LayoutQualityReport,
        options: SaveOptions,
    ) -> Result<MetricsSnapshot> {
        let snapshot = MetricsSnapshot {
            id: generate_snapshot_id(),
            report,
            is_baseline: false,
            model_id: options.model_id,
            label: options.label,
        };
        let id = snapshot.id.clone();
        self.snapshots.insert(id.clone(), snapshot);
        if options.set_as_baseline {
            self.promote(&id);
        }
        let saved = self.snapshots.get(&id).cloned();
        self.prune();
        self.persist()?;
        saved.ok_or(Error::UnknownSnapshot(id))
    }

    fn promote(&mut self, id: &str) {
        let Some(key) = self.snapshots.get(id).map(MetricsSnapshot::key) else {
            return;
        };
        if let Some(previous) = self.baselines.insert(key, id.to_string()) {
            if previous != id {
                if let Some(old) = self.snapshots.get_mut(&previous) {
                    old.is_baseline = false;
                }
            }
        }
        if let Some(snapshot) = self.snapshots.get_mut(id) {
            snapshot.is_baseline = true;
        }
        tracing::info!(
            snapshot = id,
            diagram_type = %key.0,
            layout_type = %key.1,
            "baseline updated"
        );
    }

    /// Promotes an existing snapshot to baseline for its diagram/layout pair.
    pub fn set_baseline(&mut self, id: &str) -> Result<()> {
        if !self.snapshots.contains_key(id) {
            return Err(Error::UnknownSnapshot(id.to_string()));
        }
        self.promote(id);
        self.persist()
    }

    pub fn clear_baseline(&mut self, diagram: DiagramType, layout: LayoutType) -> Result<bool> {
        let Some(id) = self.baselines.remove(&(diagram, layout)) else {
            return Ok(false);
        };
        if let Some(snapshot) = self.snapshots.get_mut(&id) {
            snapshot.is_baseline = false;
        }
        self.persist()?;
        Ok(true)
    }

    pub fn get_baseline(&self, diagram: DiagramType, layout: LayoutType) -> Option<&MetricsSnapshot> {
        let id = self.baselines.get(&(diagram, layout))?;
        self.snapshots.get(id)
    }

    pub fn baselines(&self) -> Vec<&MetricsSnapshot> {
        self.snapshots
            .values()
            .filter(|snapshot| snapshot.is_baseline)
            .collect()
    }

    pub fn get_snapshot(&self, id: &str) -> Option<&MetricsSnapshot> {
        self.snapshots.get(id)
    }

    pub fn delete_snapshot(&mut self, id: &str) -> Result<bool> {
        let Some(removed) = self.snapshots.shift_remove(id) else {
            return Ok(false);
        };
        if removed.is_baseline {
            self.baselines.remove(&removed.key());
        }
        self.persist()?;
        Ok(true)
    }

    pub fn detect_regression(&self, report: &LayoutQualityReport) -> RegressionResult {
        let Some(baseline) = self.get_baseline(report.diagram_type, report.layout_type) else {
            return RegressionResult::without_baseline();
        };
        let change = percentage_change(report.overall_score, baseline.report.overall_score);
        let severity = RegressionSeverity::classify(change, &self.config.regression);
        RegressionResult {
            has_regression: severity != RegressionSeverity::None,
            severity,
            overall_percentage_change: change,
            metric_changes: MetricChanges::between(report, &baseline.report),
            baseline_id: Some(baseline.id.clone()),
        }
    }

    /// Snapshots for one diagram/layout pair, oldest first, keeping only the
    /// most recent `limit` when given.
    pub fn get_metrics_history(
        &self,
        diagram: DiagramType,
        layout: LayoutType,
        limit: Option<usize>,
    ) -> Vec<&MetricsSnapshot> {
        let mut matching: Vec<&MetricsSnapshot> = self
            .snapshots
            .values()
            .filter(|snapshot| snapshot.key() == (diagram, layout))
            .collect();
        matching.sort_by_key(|snapshot| snapshot.report.timestamp);
        if let Some(limit) = limit {
            let skip = matching.len().saturating_sub(limit);
            matching.drain(..skip);
        }
        matching
    }

    pub fn get_storage_stats(&self) -> StorageStats {
        let mut stats = StorageStats {
            total_snapshots: self.snapshots.len(),
            baseline_count: self.baselines.len(),
            ..StorageStats::default()
        };
        for snapshot in self.snapshots.values() {
            *stats
                .by_diagram_type
                .entry(snapshot.report.diagram_type)
                .or_insert(0) += 1;
            let ts = snapshot.report.timestamp;
            stats.oldest = Some(stats.oldest.map_or(ts, |cur| cur.min(ts)));
            stats.newest = Some(stats.newest.map_or(ts, |cur| cur.max(ts)));
        }
        stats
    }

    pub fn export_data(&self) -> HistoryExport {
        HistoryExport {
            version: EXPORT_FORMAT_VERSION,
            exported_at: Utc::now(),
            snapshots: self.snapshots.values().cloned().collect(),
            baselines: self.baseline_index(),
        }
    }

    /// Replaces the whole state with `data`.
    pub fn import_data(&mut self, data: HistoryExport) -> Result<()> {
        self.replace_state(data.snapshots, data.baselines);
        self.prune();
        self.persist()
    }

    pub fn clear(&mut self) -> Result<()> {
        self.snapshots.clear();
        self.baselines.clear();
        let snapshots_key = self.snapshots_key();
        let baselines_key = self.baselines_key();
        self.store.remove(&snapshots_key)?;
        self.store.remove(&baselines_key)
    }

    /// Drops the oldest non-baseline snapshots until the cap is met. Baselines
    /// are never pruned, even if they alone exceed the cap.
    fn prune(&mut self) {
        let excess = self.snapshots.len().saturating_sub(self.config.max_snapshots);
        if excess == 0 {
            return;
        }
        let mut candidates: Vec<(DateTime<Utc>, usize, String)> = self
            .snapshots
            .values()
            .enumerate()
            .filter(|(_, snapshot)| !snapshot.is_baseline)
            .map(|(order, snapshot)| (snapshot.report.timestamp, order, snapshot.id.clone()))
            .collect();
        candidates.sort();
        for (_, _, id) in candidates.into_iter().take(excess) {
            self.snapshots.shift_remove(&id);
            tracing::debug!(snapshot = %id, "pruned snapshot");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::tests::report_with_score;

    fn config(max_snapshots: usize) -> HistoryConfig {
        HistoryConfig {
            storage_key_prefix: "test-".to_string(),
            max_snapshots,
            ..HistoryConfig::default()
        }
    }

    fn report(score: f64) -> LayoutQualityReport {
        report_with_score(score, DiagramType::C4, LayoutType::Hierarchical)
    }

    #[test]
    fn snapshot_ids_are_unique_and_prefixed() {
        let mut history = MetricsHistory::in_memory(config(10));
        let a = history.save_snapshot(report(0.5), SaveOptions::default()).unwrap();
        let b = history.save_snapshot(report(0.5), SaveOptions::default()).unwrap();
        assert!(a.id.starts_with("snapshot-"));
        assert_ne!(a.id, b.id);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn new_baseline_demotes_previous() {
        let mut history = MetricsHistory::in_memory(config(10));
        let first = history.save_snapshot(report(0.5), SaveOptions::baseline()).unwrap();
        let second = history.save_snapshot(report(0.6), SaveOptions::baseline()).unwrap();

        let baseline = history
            .get_baseline(DiagramType::C4, LayoutType::Hierarchical)
            .unwrap();
        assert_eq!(baseline.id, second.id);
        assert!(!history.get_snapshot(&first.id).unwrap().is_baseline);
        assert_eq!(history.len(), 2);
        assert_eq!(history.baselines().len(), 1);
    }

    #[test]
    fn baselines_are_scoped_by_diagram_and_layout() {
        let mut history = MetricsHistory::in_memory(config(10));
        history.save_snapshot(report(0.5), SaveOptions::baseline()).unwrap();
        let other = report_with_score(0.7, DiagramType::Business, LayoutType::Hierarchical);
        history.save_snapshot(other, SaveOptions::baseline()).unwrap();
        assert_eq!(history.baselines().len(), 2);
        assert!(history.get_baseline(DiagramType::C4, LayoutType::Grid).is_none());
    }

    #[test]
    fn regression_without_baseline_is_none() {
        let history = MetricsHistory::in_memory(config(10));
        let result = history.detect_regression(&report(0.1));
        assert!(!result.has_regression);
        assert_eq!(result.severity, RegressionSeverity::None);
        assert!(result.baseline_id.is_none());
    }

    #[test]
    fn severity_band_boundaries() {
        let thresholds = RegressionThresholds::default();
        let classify = |change| RegressionSeverity::classify(change, &thresholds);
        assert_eq!(classify(12.0), RegressionSeverity::None);
        assert_eq!(classify(0.0), RegressionSeverity::None);
        assert_eq!(classify(-4.99), RegressionSeverity::None);
        assert_eq!(classify(-5.0), RegressionSeverity::Minor);
        assert_eq!(classify(-9.99), RegressionSeverity::Minor);
        assert_eq!(classify(-10.0), RegressionSeverity::Moderate);
        assert_eq!(classify(-19.99), RegressionSeverity::Moderate);
        assert_eq!(classify(-20.0), RegressionSeverity::Severe);
        assert_eq!(classify(-75.0), RegressionSeverity::Severe);
    }

    #[test]
    fn detects_regression_against_baseline() {
        let mut history = MetricsHistory::in_memory(config(10));
        let baseline = history.save_snapshot(report(1.0), SaveOptions::baseline()).unwrap();

        let moderate = history.detect_regression(&report(0.9));
        assert!(moderate.has_regression);
        assert_eq!(moderate.severity, RegressionSeverity::Moderate);
        assert_eq!(moderate.baseline_id.as_deref(), Some(baseline.id.as_str()));

        let severe = history.detect_regression(&report(0.75));
        assert_eq!(severe.severity, RegressionSeverity::Severe);
        assert_eq!(severe.overall_percentage_change, -25.0);

        let better = history.detect_regression(&report(1.0));
        assert!(!better.has_regression);
    }

    #[test]
    fn pruning_keeps_baselines_and_newest() {
        let cap = 10;
        let mut history = MetricsHistory::in_memory(config(cap));
        let mut baseline_ids = Vec::new();
        let mut regular_ids = Vec::new();
        for i in 0..cap + 5 {
            let options = if i == 0 || i == 3 {
                SaveOptions::baseline()
            } else {
                SaveOptions::default()
            };
            let diagram = if i == 3 {
                DiagramType::Business
            } else {
                DiagramType::C4
            };
            let snapshot = history
                .save_snapshot(
                    report_with_score(0.5, diagram, LayoutType::Hierarchical),
                    options,
                )
                .unwrap();
            if snapshot.is_baseline {
                baseline_ids.push(snapshot.id);
            } else {
                regular_ids.push(snapshot.id);
            }
        }

        assert_eq!(history.len(), cap);
        for id in &baseline_ids {
            assert!(history.get_snapshot(id).is_some(), "baseline {id} pruned");
        }
        let kept = cap - baseline_ids.len();
        for id in &regular_ids[regular_ids.len() - kept..] {
            assert!(history.get_snapshot(id).is_some());
        }
        for id in &regular_ids[..regular_ids.len() - kept] {
            assert!(history.get_snapshot(id).is_none());
        }
    }

    #[test]
    fn history_is_sorted_and_limited() {
        let mut history = MetricsHistory::in_memory(config(20));
        let mut ids = Vec::new();
        for i in 0..5 {
            let mut r = report(0.5);
            r.timestamp = r.timestamp - chrono::Duration::minutes(10 - i);
            ids.push(history.save_snapshot(r, SaveOptions::default()).unwrap().id);
        }
        history
            .save_snapshot(
                report_with_score(0.5, DiagramType::C4, LayoutType::Grid),
                SaveOptions::default(),
            )
            .unwrap();

        let all = history.get_metrics_history(DiagramType::C4, LayoutType::Hierarchical, None);
        assert_eq!(all.len(), 5);
        assert!(all.windows(2).all(|w| w[0].report.timestamp <= w[1].report.timestamp));

        let recent =
            history.get_metrics_history(DiagramType::C4, LayoutType::Hierarchical, Some(2));
        let recent_ids: Vec<&str> = recent.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(recent_ids, vec![ids[3].as_str(), ids[4].as_str()]);
    }

    #[test]
    fn storage_stats_count_by_diagram_type() {
        let mut history = MetricsHistory::in_memory(config(20));
        history.save_snapshot(report(0.5), SaveOptions::baseline()).unwrap();
        history.save_snapshot(report(0.6), SaveOptions::default()).unwrap();
        history
            .save_snapshot(
                report_with_score(0.6, DiagramType::Motivation, LayoutType::ForceDirected),
                SaveOptions::default(),
            )
            .unwrap();
        let stats = history.get_storage_stats();
        assert_eq!(stats.total_snapshots, 3);
        assert_eq!(stats.baseline_count, 1);
        assert_eq!(stats.by_diagram_type.get(&DiagramType::C4), Some(&2));
        assert_eq!(stats.by_diagram_type.get(&DiagramType::Motivation), Some(&1));
        assert!(stats.oldest <= stats.newest);
    }

    #[test]
    fn export_import_round_trip_through_json() {
        let mut history = MetricsHistory::in_memory(config(20));
        history.save_snapshot(report(0.5), SaveOptions::baseline()).unwrap();
        history.save_snapshot(report(0.6), SaveOptions::default()).unwrap();
        let json = serde_json::to_string(&history.export_data()).unwrap();

        let mut restored = MetricsHistory::in_memory(config(20));
        restored.save_snapshot(report(0.1), SaveOptions::default()).unwrap();
        restored.import_data(serde_json::from_str(&json).unwrap()).unwrap();

        let stats = restored.get_storage_stats();
        assert_eq!(stats.total_snapshots, 2);
        assert_eq!(stats.baseline_count, 1);
        assert_eq!(restored.export_data().snapshots, history.export_data().snapshots);
    }

    #[test]
    fn import_with_repeated_id_keeps_the_later_snapshot() {
        let mut history = MetricsHistory::in_memory(config(20));
        history.save_snapshot(report(0.5), SaveOptions::default()).unwrap();
        history.save_snapshot(report(0.6), SaveOptions::default()).unwrap();
        let mut data = history.export_data();
        let shared_id = data.snapshots[0].id.clone();
        data.snapshots[1].id = shared_id.clone();

        let mut restored = MetricsHistory::in_memory(config(20));
        restored.import_data(data).unwrap();
        assert_eq!(restored.get_storage_stats().total_snapshots, 1);
        assert_eq!(
            restored.get_snapshot(&shared_id).unwrap().report.overall_score,
            0.6
        );
    }

    #[test]
    fn deleting_baseline_clears_index() {
        let mut history = MetricsHistory::in_memory(config(20));
        let baseline = history.save_snapshot(report(0.5), SaveOptions::baseline()).unwrap();
        assert!(history.delete_snapshot(&baseline.id).unwrap());
        assert!(!history.delete_snapshot(&baseline.id).unwrap());
        assert!(history
            .get_baseline(DiagramType::C4, LayoutType::Hierarchical)
            .is_none());
    }

    #[test]
    fn set_and_clear_baseline() {
        let mut history = MetricsHistory::in_memory(config(20));
        let snapshot = history.save_snapshot(report(0.5), SaveOptions::default()).unwrap();
        assert!(matches!(
            history.set_baseline("missing"),
            Err(Error::UnknownSnapshot(_))
        ));
        history.set_baseline(&snapshot.id).unwrap();
        assert!(history.get_snapshot(&snapshot.id).unwrap().is_baseline);
        assert!(history
            .clear_baseline(DiagramType::C4, LayoutType::Hierarchical)
            .unwrap());
        assert!(!history.get_snapshot(&snapshot.id).unwrap().is_baseline);
    }

    #[test]
    fn state_reloads_from_store_under_prefix() {
        let mut history = MetricsHistory::in_memory(config(20));
        history.save_snapshot(report(0.5), SaveOptions::baseline()).unwrap();
        let store = history.store().clone();
        assert!(store.keys().all(|key| key.starts_with("test-")));

        let reopened = MetricsHistory::open(config(20), store.clone()).unwrap();
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.baselines().len(), 1);

        let isolated = MetricsHistory::open(
            HistoryConfig {
                storage_key_prefix: "other-".to_string(),
                ..HistoryConfig::default()
            },
            store,
        )
        .unwrap();
        assert!(isolated.is_empty());
    }

    #[test]
    fn clear_empties_history_and_store() {
        let mut history = MetricsHistory::in_memory(config(20));
        history.save_snapshot(report(0.5), SaveOptions::baseline()).unwrap();
        history.clear().unwrap();
        assert!(history.is_empty());
        assert_eq!(history.store().keys().count(), 0);
    }
}
