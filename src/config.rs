use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DashError, DashResult};

/// Extra kubectl arguments, shell-quoted, appended to every query.
pub const EXTRA_ARGS_ENV: &str = "TAS_DASH_KUBECTL_ARGS";

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct DashboardConfig {
    /// Executable name or path of the cluster CLI.
    pub kubectl: String,
    pub namespace: String,
    pub label_selector: String,
    /// Passed as `--kubeconfig=<file>` when set.
    pub kubeconfig: Option<PathBuf>,
    /// Passed as `--context=<name>` when set.
    pub context: Option<String>,
    pub extra_args: Vec<String>,
    /// Timeout for the pod, metrics and node-status queries.
    pub query_timeout_secs: u64,
    /// Timeout for the node detail view.
    pub detail_timeout_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            kubectl: "kubectl".to_string(),
            namespace: "tas".to_string(),
            label_selector: "statefulset.kubernetes.io/pod-name".to_string(),
            kubeconfig: None,
            context: None,
            extra_args: Vec::new(),
            query_timeout_secs: 5,
            detail_timeout_secs: 10,
        }
    }
}

/// `<config dir>/tas-dash/config.yaml`, e.g. ~/.config/tas-dash/config.yaml on Linux.
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tas-dash").join("config.yaml"))
}

impl DashboardConfig {
    pub fn from_file(path: &Path) -> DashResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let cfg: Self = serde_yaml::from_str(&raw)?;
        log::info!("config: loaded {}", path.display());
        Ok(cfg)
    }

    /// Resolves the configuration:
    /// 1. `explicit` file if given (must exist),
    /// 2. the per-user config file if present,
    /// 3. built-in defaults.
    ///
    /// Extra args from [`EXTRA_ARGS_ENV`] are appended afterwards.
    pub fn load(explicit: Option<&Path>) -> DashResult<Self> {
        let mut cfg = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    log::debug!("config: no config file, using defaults");
                    Self::default()
                }
            },
        };

        if let Ok(raw) = std::env::var(EXTRA_ARGS_ENV) {
            cfg.append_extra_args(&raw)?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Splits `raw` with shell quoting rules and appends the words to `extra_args`.
    pub fn append_extra_args(&mut self, raw: &str) -> DashResult {
        let words = shell_words::split(raw)
            .map_err(|e| DashError::Config(format!("{EXTRA_ARGS_ENV}: {e}")))?;
        self.extra_args.extend(words);
        Ok(())
    }

    pub fn validate(&self) -> DashResult {
        if self.kubectl.trim().is_empty() {
            return Err(DashError::Config("kubectl must not be empty".to_string()));
        }
        if self.namespace.trim().is_empty() {
            return Err(DashError::Config("namespace must not be empty".to_string()));
        }
        if self.query_timeout_secs == 0 || self.detail_timeout_secs == 0 {
            return Err(DashError::Config("timeouts must be at least 1 second".to_string()));
        }
        Ok(())
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    pub fn detail_timeout(&self) -> Duration {
        Duration::from_secs(self.detail_timeout_secs)
    }
}
