use std::time::Duration;

pub type DashResult<T = (), E = DashError> = Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum DashError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Failed to serialize snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(String),
}

/// Why a single kubectl invocation produced no usable output.
///
/// Never leaves the runner as an error: `run` logs it and returns `None`.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("executable not found: {0}")]
    NotFound(String),
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("exited with {}: {stderr}", .code.map_or("signal".to_string(), |c| format!("status {c}")))]
    Exit { code: Option<i32>, stderr: String },
}
