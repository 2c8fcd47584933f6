// Join pod, metrics and node listings into one dashboard snapshot
use std::num::IntErrorKind;

use crate::commands::kubectl::Kubectl;
use crate::commands::tables::{parse_metrics, parse_node_statuses, parse_pods};
use crate::models::k8s::{
    MetricsMap, NodeStatusMap, PodMetrics, PodRecord, PodRow, Snapshot, SnapshotSource,
};

/// Gauge shown when CPU usage is unknown or not in millicores.
pub const CPU_DEFAULT_PERCENT: u8 = 15;
/// Gauge shown when memory usage is unknown or not in mebibytes.
pub const MEM_DEFAULT_PERCENT: u8 = 20;

const GAUGE_MIN: i64 = 5;
const GAUGE_MAX: i64 = 100;

const FAILED_STATUSES: [&str; 3] = ["Failed", "Error", "CrashLoopBackOff"];

// ── utilization gauges ────────────────────────────────────────────────────────

/// Maps `<n><unit>` onto 5..=100 as `n / 10`, so 1000m or 1000Mi reads as full.
/// This is a display approximation, not a share of real node capacity.
fn gauge(raw: &str, unit: &str, default: u8) -> u8 {
    let Some(digits) = raw.strip_suffix(unit) else {
        return default;
    };
    match digits.parse::<i64>() {
        Ok(n) => (n / 10).clamp(GAUGE_MIN, GAUGE_MAX) as u8,
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => GAUGE_MAX as u8,
        Err(e) if *e.kind() == IntErrorKind::NegOverflow => GAUGE_MIN as u8,
        Err(_) => default,
    }
}

/// CPU gauge from a quantity such as "450m".
pub fn cpu_percent(raw: &str) -> u8 {
    gauge(raw, "m", CPU_DEFAULT_PERCENT)
}

/// Memory gauge from a quantity such as "512Mi".
pub fn mem_percent(raw: &str) -> u8 {
    gauge(raw, "Mi", MEM_DEFAULT_PERCENT)
}

// ── join ──────────────────────────────────────────────────────────────────────

/// Left join of pod rows against metrics and node status. Pods are never
/// dropped; a pod without metrics gets "0m"/"0Mi" with the default gauges,
/// and a pod on an unlisted node gets node status "Unknown".
pub fn join(
    rows: Vec<PodRow>,
    metrics: &MetricsMap,
    nodes: &NodeStatusMap,
    namespace: &str,
) -> Vec<PodRecord> {
    rows.into_iter()
        .map(|row| {
            let (usage, cpu_pct, mem_pct) = match metrics.get(&row.name) {
                Some(m) => (m.clone(), cpu_percent(&m.cpu), mem_percent(&m.memory)),
                None => (PodMetrics::default(), CPU_DEFAULT_PERCENT, MEM_DEFAULT_PERCENT),
            };
            let node_status = nodes
                .get(&row.node)
                .cloned()
                .unwrap_or_else(|| "Unknown".to_string());

            PodRecord {
                name: row.name,
                status: row.status,
                restarts: row.restarts,
                ip: row.ip,
                node: row.node,
                node_status,
                cpu: usage.cpu,
                cpu_percent: cpu_pct,
                memory: usage.memory,
                mem_percent: mem_pct,
                namespace: namespace.to_string(),
            }
        })
        .collect()
}

// ── demo data ─────────────────────────────────────────────────────────────────

struct DemoPod {
    name: &'static str,
    status: &'static str,
    restarts: &'static str,
    ip: &'static str,
    node: &'static str,
    node_status: &'static str,
    cpu: &'static str,
    cpu_percent: u8,
    memory: &'static str,
    mem_percent: u8,
}

const DEMO_NAMESPACE: &str = "tas";

// Literal values; the gauges are not recomputed (tas-1 shows 50, not 51).
const DEMO_PODS: [DemoPod; 4] = [
    DemoPod {
        name: "tas-0",
        status: "Running",
        restarts: "0",
        ip: "10.244.1.23",
        node: "node-01",
        node_status: "Ready",
        cpu: "125m",
        cpu_percent: 12,
        memory: "256Mi",
        mem_percent: 25,
    },
    DemoPod {
        name: "tas-1",
        status: "Running",
        restarts: "2",
        ip: "10.244.1.24",
        node: "node-02",
        node_status: "Ready",
        cpu: "450m",
        cpu_percent: 45,
        memory: "512Mi",
        mem_percent: 50,
    },
    DemoPod {
        name: "tas-2",
        status: "Pending",
        restarts: "0",
        ip: "Pending",
        node: "-",
        node_status: "-",
        cpu: "0m",
        cpu_percent: 5,
        memory: "0Mi",
        mem_percent: 5,
    },
    DemoPod {
        name: "tas-3",
        status: "Running",
        restarts: "0",
        ip: "10.244.1.25",
        node: "node-01",
        node_status: "Ready",
        cpu: "85m",
        cpu_percent: 8,
        memory: "128Mi",
        mem_percent: 12,
    },
];

/// The four demonstration pods shown instead of an empty dashboard.
pub fn fallback_pods() -> Vec<PodRecord> {
    DEMO_PODS
        .iter()
        .map(|p| PodRecord {
            name: p.name.to_string(),
            status: p.status.to_string(),
            restarts: p.restarts.to_string(),
            ip: p.ip.to_string(),
            node: p.node.to_string(),
            node_status: p.node_status.to_string(),
            cpu: p.cpu.to_string(),
            cpu_percent: p.cpu_percent,
            memory: p.memory.to_string(),
            mem_percent: p.mem_percent,
            namespace: DEMO_NAMESPACE.to_string(),
        })
        .collect()
}

// ── snapshot ──────────────────────────────────────────────────────────────────

/// Counts running and failed pods. `running + failed <= total` since the
/// two status sets are disjoint.
pub fn summarize(pods: Vec<PodRecord>, source: SnapshotSource) -> Snapshot {
    let running_pods = pods.iter().filter(|p| p.status == "Running").count();
    let failed_pods = pods
        .iter()
        .filter(|p| FAILED_STATUSES.contains(&p.status.as_str()))
        .count();

    Snapshot {
        total_pods: pods.len(),
        running_pods,
        failed_pods,
        pods,
        source,
    }
}

/// Builds a snapshot from the three raw listings (`None` = query failed).
///
/// An empty join is replaced by [`fallback_pods`]. A cluster that is down and
/// one with zero matching pods both end up here; `source` is the only hint.
pub fn assemble(
    pods_raw: Option<&str>,
    metrics_raw: Option<&str>,
    nodes_raw: Option<&str>,
    namespace: &str,
) -> Snapshot {
    let rows = parse_pods(pods_raw);
    let metrics = parse_metrics(metrics_raw);
    let nodes = parse_node_statuses(nodes_raw);

    let pods = join(rows, &metrics, &nodes, namespace);

    if pods.is_empty() {
        log::warn!(
            "snapshot: no pods from the live cluster (pod query {}), showing demo data",
            if pods_raw.is_some() { "returned nothing" } else { "failed" }
        );
        return summarize(fallback_pods(), SnapshotSource::Fallback);
    }

    log::info!(
        "snapshot: {} pod(s), {} with metrics, {} node(s) known",
        pods.len(),
        pods.iter().filter(|p| metrics.contains_key(&p.name)).count(),
        nodes.len()
    );
    summarize(pods, SnapshotSource::Live)
}

/// Runs the pod, metrics and node queries concurrently and assembles the result.
/// Never fails: unavailable data degrades to defaults or the demo dataset.
pub async fn fetch_snapshot(kubectl: &Kubectl) -> Snapshot {
    let (pods_raw, metrics_raw, nodes_raw) =
        tokio::join!(kubectl.get_pods(), kubectl.top_pods(), kubectl.get_nodes());

    assemble(
        pods_raw.as_deref(),
        metrics_raw.as_deref(),
        nodes_raw.as_deref(),
        kubectl.namespace(),
    )
}
