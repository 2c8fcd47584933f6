// Rust structs for the values the snapshot hands to the presentation layer
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Node name → node status column (e.g. "Ready", "NotReady").
pub type NodeStatusMap = HashMap<String, String>;

/// Pod name → raw usage reported by `kubectl top pods`.
pub type MetricsMap = HashMap<String, PodMetrics>;

/// Raw CPU / memory quantities as printed by `kubectl top`, e.g. "125m" / "256Mi".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodMetrics {
    pub cpu: String,
    pub memory: String,
}

impl Default for PodMetrics {
    /// Used when a pod has no entry in the metrics listing.
    fn default() -> Self {
        Self {
            cpu: "0m".to_string(),
            memory: "0Mi".to_string(),
        }
    }
}

/// The columns picked out of one `kubectl get pods -o wide` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodRow {
    pub name: String,
    pub status: String,
    pub restarts: String,
    pub ip: String,
    pub node: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodRecord {
    pub name: String,
    pub status: String,
    pub restarts: String,
    pub ip: String,
    pub node: String,
    pub node_status: String,
    /// Raw quantity, e.g. "125m"
    pub cpu: String,
    /// Gauge value for display, always within 0..=100
    pub cpu_percent: u8,
    /// Raw quantity, e.g. "256Mi"
    pub memory: String,
    pub mem_percent: u8,
    pub namespace: String,
}

/// Where the pods of a [`Snapshot`] came from.
///
/// `Fallback` is reported both when the cluster could not be queried and
/// when it answered with zero matching pods; the two cases are not told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotSource {
    Live,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub pods: Vec<PodRecord>,
    pub total_pods: usize,
    pub running_pods: usize,
    pub failed_pods: usize,
    pub source: SnapshotSource,
}

impl Snapshot {
    pub fn is_fallback(&self) -> bool {
        self.source == SnapshotSource::Fallback
    }
}
