// Spawn kubectl subprocesses with a hard timeout and capture their output
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;

use crate::config::DashboardConfig;
use crate::error::RunError;

// ── runner ────────────────────────────────────────────────────────────────────

/// Spawns `program` and waits for it, killing the child once `timeout` elapses.
/// Any exit status is returned as `Ok`; only spawn failures and timeouts are errors.
pub async fn execute(program: &str, args: &[String], timeout: Duration) -> Result<Output, RunError> {
    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => RunError::NotFound(program.to_string()),
            _ => RunError::Spawn {
                program: program.to_string(),
                source,
            },
        })?;

    // Dropping the wait future on timeout drops the child, which kills it.
    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(output) => output.map_err(|source| RunError::Spawn {
            program: program.to_string(),
            source,
        }),
        Err(_) => Err(RunError::Timeout(timeout)),
    }
}

/// Like [`execute`], but a non-zero exit is also an error.
pub async fn run_captured(program: &str, args: &[String], timeout: Duration) -> Result<String, RunError> {
    let output = execute(program, args, timeout).await?;

    if !output.status.success() {
        return Err(RunError::Exit {
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Returns stdout of a successful run, or `None` when the data is unavailable
/// for any reason. Failures are logged, never propagated.
pub async fn run(program: &str, args: &[String], timeout: Duration) -> Option<String> {
    match run_captured(program, args, timeout).await {
        Ok(stdout) => Some(stdout),
        Err(e) => {
            log::warn!("kubectl: `{program} {}` gave no data: {e}", args.join(" "));
            None
        }
    }
}

// ── queries ───────────────────────────────────────────────────────────────────

/// The status queries the dashboard issues, with connection flags and timeouts applied.
#[derive(Debug, Clone)]
pub struct Kubectl {
    program: String,
    namespace: String,
    selector: String,
    global_args: Vec<String>,
    query_timeout: Duration,
    detail_timeout: Duration,
}

impl Kubectl {
    pub fn from_config(cfg: &DashboardConfig) -> Self {
        // Fall back to the bare name so a missing binary surfaces as NotFound at spawn time.
        let program = which::which(&cfg.kubectl)
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_else(|_| cfg.kubectl.clone());

        let mut global_args = Vec::new();
        if let Some(ref file) = cfg.kubeconfig {
            global_args.push(format!("--kubeconfig={}", file.display()));
        }
        if let Some(ref ctx) = cfg.context {
            global_args.push(format!("--context={ctx}"));
        }
        global_args.extend(cfg.extra_args.iter().cloned());

        log::debug!("kubectl: using {program} for namespace {}", cfg.namespace);

        Self {
            program,
            namespace: cfg.namespace.clone(),
            selector: cfg.label_selector.clone(),
            global_args,
            query_timeout: cfg.query_timeout(),
            detail_timeout: cfg.detail_timeout(),
        }
    }

    /// Overrides both timeouts; config only allows whole seconds.
    pub fn with_timeouts(mut self, query: Duration, detail: Duration) -> Self {
        self.query_timeout = query;
        self.detail_timeout = detail;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn with_globals(&self, args: &[&str]) -> Vec<String> {
        args.iter()
            .map(|s| s.to_string())
            .chain(self.global_args.iter().cloned())
            .collect()
    }

    pub fn pods_args(&self) -> Vec<String> {
        self.with_globals(&[
            "get",
            "pods",
            "-n",
            self.namespace.as_str(),
            "-l",
            self.selector.as_str(),
            "-o",
            "wide",
            "--no-headers",
        ])
    }

    pub fn top_pods_args(&self) -> Vec<String> {
        self.with_globals(&[
            "top",
            "pods",
            "-n",
            self.namespace.as_str(),
            "-l",
            self.selector.as_str(),
            "--no-headers",
        ])
    }

    pub fn nodes_args(&self) -> Vec<String> {
        self.with_globals(&["get", "nodes", "--no-headers"])
    }

    pub fn node_detail_args(&self) -> Vec<String> {
        self.with_globals(&["get", "nodes", "-A", "-o", "wide"])
    }

    /// `get pods -o wide` table, or `None` when unavailable.
    pub async fn get_pods(&self) -> Option<String> {
        run(&self.program, &self.pods_args(), self.query_timeout).await
    }

    /// `top pods` table, or `None` when unavailable (e.g. no metrics-server).
    pub async fn top_pods(&self) -> Option<String> {
        run(&self.program, &self.top_pods_args(), self.query_timeout).await
    }

    /// `get nodes` table, or `None` when unavailable.
    pub async fn get_nodes(&self) -> Option<String> {
        run(&self.program, &self.nodes_args(), self.query_timeout).await
    }

    /// Raw result of the wide node listing; the caller decides how to show failures.
    pub async fn node_detail(&self) -> Result<Output, RunError> {
        execute(&self.program, &self.node_detail_args(), self.detail_timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[tokio::test]
    async fn run_returns_stdout_on_success() {
        let out = run("sh", &sh("echo 'tas-0 1/1 Running'"), Duration::from_secs(5)).await;
        assert_eq!(out.as_deref(), Some("tas-0 1/1 Running\n"));
    }

    #[tokio::test]
    async fn non_zero_exit_is_no_data() {
        let err = run_captured("sh", &sh("echo boom >&2; exit 3"), Duration::from_secs(5))
            .await
            .unwrap_err();
        match err {
            RunError::Exit { code, stderr } => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(run("sh", &sh("exit 1"), Duration::from_secs(5)).await.is_none());
    }

    #[tokio::test]
    async fn missing_executable_is_no_data() {
        let err = run_captured("tas-dash-no-such-binary", &[], Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, RunError::NotFound(_)));

        assert!(run("tas-dash-no-such-binary", &[], Duration::from_secs(5)).await.is_none());
    }

    #[tokio::test]
    async fn slow_command_times_out() {
        let started = std::time::Instant::now();
        let err = run_captured("sh", &sh("sleep 5"), Duration::from_millis(200))
            .await
            .unwrap_err();
        assert!(matches!(err, RunError::Timeout(_)));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test]
    async fn execute_keeps_failed_output() {
        let output = execute("sh", &sh("echo denied >&2; exit 1"), Duration::from_secs(5))
            .await
            .unwrap();
        assert!(!output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stderr).trim(), "denied");
    }

    #[test]
    fn query_args_carry_selector_and_connection_flags() {
        let cfg = DashboardConfig {
            kubeconfig: Some("/etc/kube/lab.yaml".into()),
            context: Some("lab".to_string()),
            extra_args: vec!["--request-timeout=3s".to_string()],
            ..Default::default()
        };
        let kubectl = Kubectl::from_config(&cfg);

        assert_eq!(
            kubectl.pods_args(),
            vec![
                "get",
                "pods",
                "-n",
                "tas",
                "-l",
                "statefulset.kubernetes.io/pod-name",
                "-o",
                "wide",
                "--no-headers",
                "--kubeconfig=/etc/kube/lab.yaml",
                "--context=lab",
                "--request-timeout=3s",
            ]
        );
        assert_eq!(&kubectl.top_pods_args()[..2], ["top", "pods"]);
        assert_eq!(&kubectl.nodes_args()[..3], ["get", "nodes", "--no-headers"]);
        assert_eq!(
            &kubectl.node_detail_args()[..5],
            ["get", "nodes", "-A", "-o", "wide"]
        );
    }

    #[test]
    fn unresolvable_program_keeps_configured_name() {
        let cfg = DashboardConfig {
            kubectl: "tas-dash-no-such-binary".to_string(),
            ..Default::default()
        };
        assert_eq!(Kubectl::from_config(&cfg).program(), "tas-dash-no-such-binary");
    }
}
