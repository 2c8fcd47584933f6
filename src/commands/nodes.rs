// Raw node listing for the node monitor view
use crate::commands::kubectl::Kubectl;

pub const EMPTY_NODES_MESSAGE: &str = "No nodes found or command returned empty output.";

/// Returns the text of `kubectl get nodes -A -o wide` for display.
///
/// - exit 0: stdout, or [`EMPTY_NODES_MESSAGE`] when stdout is empty
/// - non-zero exit: whatever kubectl wrote to stderr
/// - spawn failure or timeout: `Error executing kubectl: <reason>`
pub async fn node_detail(kubectl: &Kubectl) -> String {
    match kubectl.node_detail().await {
        Ok(output) if output.status.success() => {
            let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
            if stdout.is_empty() {
                EMPTY_NODES_MESSAGE.to_string()
            } else {
                stdout
            }
        }
        Ok(output) => {
            log::warn!("nodes: kubectl exited with {}", output.status);
            String::from_utf8_lossy(&output.stderr).into_owned()
        }
        Err(e) => {
            log::warn!("nodes: {e}");
            format!("Error executing kubectl: {e}")
        }
    }
}
