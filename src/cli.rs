use std::path::PathBuf;

use chrono::{DateTime, Local};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;

use crate::commands::kubectl::Kubectl;
use crate::commands::nodes::node_detail;
use crate::commands::pods::fetch_snapshot;
use crate::config::DashboardConfig;
use crate::error::DashResult;
use crate::logger::init_logging;
use crate::models::k8s::Snapshot;

pub const APP_NAME: &str = "TAS (Telecom App Server)";

#[derive(Debug, Parser)]
#[command(name = "tas-dash", version, about = "Status of the TAS pods and their nodes", long_about = None)]
pub struct Cli {
    /// YAML config file; defaults to <config dir>/tas-dash/config.yaml when present
    #[arg(short, long, env = "TAS_DASH_CONFIG", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[arg(short('l'), long, value_name("LEVEL"), default_value("info"), global = true)]
    pub log_level: LevelFilter,

    /// Cluster CLI executable
    #[arg(long, global = true)]
    pub kubectl: Option<String>,

    #[arg(short, long, global = true)]
    pub namespace: Option<String>,

    /// Label selector for the pod queries
    #[arg(long, global = true)]
    pub selector: Option<String>,

    #[arg(long, value_name = "FILE", global = true)]
    pub kubeconfig: Option<PathBuf>,

    #[arg(long, global = true)]
    pub context: Option<String>,

    #[command(subcommand)]
    pub cmd: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    #[command(about = "Show the pod snapshot (default)")]
    Pods(PodsArgs),
    #[command(about = "Show the raw wide node listing")]
    Nodes,
}

#[derive(Debug, Args, Clone, Default)]
pub struct PodsArgs {
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Cli {
    /// Command-line flags win over the config file.
    pub fn apply_overrides(&self, cfg: &mut DashboardConfig) {
        if let Some(ref kubectl) = self.kubectl {
            cfg.kubectl = kubectl.clone();
        }
        if let Some(ref ns) = self.namespace {
            cfg.namespace = ns.clone();
        }
        if let Some(ref selector) = self.selector {
            cfg.label_selector = selector.clone();
        }
        if let Some(ref file) = self.kubeconfig {
            cfg.kubeconfig = Some(file.clone());
        }
        if let Some(ref ctx) = self.context {
            cfg.context = Some(ctx.clone());
        }
    }
}

const COLUMNS: [&str; 10] = [
    "NAME", "STATUS", "RESTARTS", "IP", "NODE", "NODE STATUS", "CPU", "CPU%", "MEMORY", "MEM%",
];

/// Plain-text rendering of a snapshot for the terminal.
pub fn render_table(snapshot: &Snapshot, namespace: &str, taken_at: DateTime<Local>) -> String {
    let rows: Vec<[String; 10]> = snapshot
        .pods
        .iter()
        .map(|p| {
            [
                p.name.clone(),
                p.status.clone(),
                p.restarts.clone(),
                p.ip.clone(),
                p.node.clone(),
                p.node_status.clone(),
                p.cpu.clone(),
                format!("{}%", p.cpu_percent),
                p.memory.clone(),
                format!("{}%", p.mem_percent),
            ]
        })
        .collect();

    let mut widths = COLUMNS.map(str::len);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }

    let line = |cells: &[&str]| -> String {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, w)| format!("{cell:<w$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = format!(
        "{APP_NAME}  namespace {namespace}  {}\n",
        taken_at.format("%Y-%m-%d %H:%M:%S")
    );
    out.push_str(&format!(
        "pods: {} total, {} running, {} failed\n",
        snapshot.total_pods, snapshot.running_pods, snapshot.failed_pods
    ));
    if snapshot.is_fallback() {
        out.push_str("note: no pods returned by the cluster, showing demo data\n");
    }
    out.push('\n');
    out.push_str(&line(&COLUMNS));
    out.push('\n');
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&line(&cells));
        out.push('\n');
    }
    out
}

pub async fn exec() -> DashResult {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let mut cfg = DashboardConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut cfg);
    cfg.validate()?;

    let kubectl = Kubectl::from_config(&cfg);

    match cli.cmd.unwrap_or_else(|| Command::Pods(PodsArgs::default())) {
        Command::Pods(args) => {
            let snapshot = fetch_snapshot(&kubectl).await;
            match args.output {
                OutputFormat::Table => {
                    print!("{}", render_table(&snapshot, kubectl.namespace(), Local::now()))
                }
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
            }
        }
        Command::Nodes => print!("{}", node_detail(&kubectl).await),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::pods::{assemble, fallback_pods, summarize};
    use crate::models::k8s::SnapshotSource;
    use chrono::TimeZone;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from([
            "tas-dash",
            "--namespace",
            "staging",
            "--context",
            "lab",
            "pods",
            "-o",
            "json",
        ]);
        let mut cfg = DashboardConfig::default();
        cli.apply_overrides(&mut cfg);

        assert_eq!(cfg.namespace, "staging");
        assert_eq!(cfg.context.as_deref(), Some("lab"));
        assert_eq!(cfg.label_selector, "statefulset.kubernetes.io/pod-name");
        match cli.cmd {
            Some(Command::Pods(args)) => assert_eq!(args.output, OutputFormat::Json),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn subcommand_is_optional() {
        let cli = Cli::parse_from(["tas-dash", "-l", "debug"]);
        assert!(cli.cmd.is_none());
        assert_eq!(cli.log_level, LevelFilter::Debug);
    }

    #[test]
    fn table_marks_demo_data() {
        let taken_at = Local.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap();
        let out = render_table(&summarize(fallback_pods(), SnapshotSource::Fallback), "tas", taken_at);

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "TAS (Telecom App Server)  namespace tas  2026-10-16 09:30:00");
        assert_eq!(lines[1], "pods: 4 total, 3 running, 0 failed");
        assert!(lines[2].contains("demo data"));
        assert!(lines[4].starts_with("NAME   STATUS"));
        assert!(lines[5].starts_with("tas-0  Running"));
        assert!(lines[6].contains("45%"));
        assert_eq!(lines.len(), 9);
    }

    #[test]
    fn live_table_has_no_demo_note() {
        let snapshot = assemble(Some("web-0 1/1 Running 0 1d 10.0.0.1 n1\n"), None, None, "tas");
        let out = render_table(&snapshot, "tas", Local::now());
        assert!(!out.contains("demo data"));
        assert!(out.contains("web-0"));
    }
}
