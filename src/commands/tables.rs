// Parsers for the whitespace-delimited tables kubectl prints with --no-headers
use crate::models::k8s::{MetricsMap, NodeStatusMap, PodMetrics, PodRow};

/// `NAME READY STATUS RESTARTS AGE IP NODE ...`
const POD_FIELDS: usize = 7;
/// `NAME CPU MEMORY`
const METRICS_FIELDS: usize = 3;
/// `NAME STATUS ROLES AGE VERSION ...`
const NODE_FIELDS: usize = 2;

/// Splits every non-empty line of `raw` on whitespace and yields the rows that
/// have at least `min_fields` columns. Short rows are skipped, not fatal.
fn rows<'a>(raw: Option<&'a str>, min_fields: usize) -> impl Iterator<Item = Vec<&'a str>> + 'a {
    raw.unwrap_or_default()
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>())
        .filter(move |fields| {
            if fields.is_empty() {
                return false;
            }
            if fields.len() < min_fields {
                log::debug!(
                    "tables: skipping row with {} of {min_fields} fields: {}",
                    fields.len(),
                    fields.join(" ")
                );
                return false;
            }
            true
        })
}

/// Parses `kubectl get pods -o wide --no-headers` output, keeping row order.
pub fn parse_pods(raw: Option<&str>) -> Vec<PodRow> {
    rows(raw, POD_FIELDS)
        .map(|f| PodRow {
            name: f[0].to_string(),
            status: f[2].to_string(),
            restarts: f[3].to_string(),
            ip: f[5].to_string(),
            node: f[6].to_string(),
        })
        .collect()
}

/// Parses `kubectl top pods --no-headers` output into pod name → usage.
pub fn parse_metrics(raw: Option<&str>) -> MetricsMap {
    rows(raw, METRICS_FIELDS)
        .map(|f| {
            (
                f[0].to_string(),
                PodMetrics {
                    cpu: f[1].to_string(),
                    memory: f[2].to_string(),
                },
            )
        })
        .collect()
}

/// Parses `kubectl get nodes --no-headers` output into node name → status.
pub fn parse_node_statuses(raw: Option<&str>) -> NodeStatusMap {
    rows(raw, NODE_FIELDS)
        .map(|f| (f[0].to_string(), f[1].to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PODS: &str = "\
tas-0   1/1   Running   0   3d   10.244.1.10   worker-a   <none>   <none>
tas-1   0/1   Pending   0   1m
tas-2   1/1   Error     4   3d   10.244.2.11   worker-b   <none>   <none>

";

    #[test]
    fn pod_rows_pick_documented_columns() {
        let rows = parse_pods(Some(PODS));
        assert_eq!(
            rows,
            vec![
                PodRow {
                    name: "tas-0".to_string(),
                    status: "Running".to_string(),
                    restarts: "0".to_string(),
                    ip: "10.244.1.10".to_string(),
                    node: "worker-a".to_string(),
                },
                PodRow {
                    name: "tas-2".to_string(),
                    status: "Error".to_string(),
                    restarts: "4".to_string(),
                    ip: "10.244.2.11".to_string(),
                    node: "worker-b".to_string(),
                },
            ]
        );
    }

    #[test]
    fn exactly_seven_fields_is_enough() {
        let rows = parse_pods(Some("tas-5 1/1 Running 0 2d 10.1.1.1 node-9"));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].node, "node-9");

        assert!(parse_pods(Some("tas-5 1/1 Running 0 2d 10.1.1.1")).is_empty());
    }

    #[test]
    fn absent_output_parses_to_nothing() {
        assert!(parse_pods(None).is_empty());
        assert!(parse_metrics(None).is_empty());
        assert!(parse_node_statuses(None).is_empty());
        assert!(parse_pods(Some("")).is_empty());
    }

    #[test]
    fn metrics_map_by_pod_name() {
        let metrics = parse_metrics(Some("tas-0   125m   256Mi\ntas-1 450m\n  \ntas-2 3m 40Mi extra\n"));
        assert_eq!(metrics.len(), 2);
        assert_eq!(
            metrics["tas-0"],
            PodMetrics {
                cpu: "125m".to_string(),
                memory: "256Mi".to_string(),
            }
        );
        assert_eq!(metrics["tas-2"].memory, "40Mi");
        assert!(!metrics.contains_key("tas-1"));
    }

    #[test]
    fn node_statuses_by_node_name() {
        let nodes = parse_node_statuses(Some(
            "worker-a   Ready      control-plane   30d   v1.30.2\nworker-b   NotReady   <none>   30d   v1.30.2\nlonely\n",
        ));
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes["worker-a"], "Ready");
        assert_eq!(nodes["worker-b"], "NotReady");
    }

    #[test]
    fn repeated_key_keeps_last_row() {
        let nodes = parse_node_statuses(Some("worker-a NotReady\nworker-a Ready\n"));
        assert_eq!(nodes["worker-a"], "Ready");
    }
}
