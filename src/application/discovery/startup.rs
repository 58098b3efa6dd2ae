//! Startup Discovery Integration
//!
//! Runs discovery once at process start and logs the outcome.

use super::builder::{DiscoveryReport, ToolRegistryBuilder};
use super::types::LoadStatus;
use crate::types::ServerAddress;
use tracing::{error, info, warn};

/// Run server discovery at startup and log results.
///
/// The log covers the configured addresses, each server's load status with
/// its tools, and a final summary. An empty tool set is reported but is not
/// an error: the agent starts without tools.
pub async fn run_startup_discovery(
    builder: &ToolRegistryBuilder,
    addresses: &[ServerAddress],
) -> DiscoveryReport {
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("🔍 MCP Tool Discovery");
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    if addresses.is_empty() {
        warn!("No tool servers configured, the agent will run without tools");
    }
    for address in addresses {
        info!(address = %address, transport = ?address.transport(), "📦 Configured tool server");
    }

    let report = builder.discover(addresses).await;
    log_report(&report);
    report
}

fn log_report(report: &DiscoveryReport) {
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("📋 Discovery Results");
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    for server in &report.servers {
        match &server.load_status {
            LoadStatus::Success => {
                info!(
                    address = %server.address,
                    tools = server.tools.len(),
                    retries = server.failed_attempts(),
                    "✅ Server loaded successfully"
                );
                for tool in &server.tools {
                    let desc_preview: String = tool
                        .description
                        .as_deref()
                        .unwrap_or_default()
                        .chars()
                        .take(50)
                        .collect();
                    info!(
                        server = %server.address,
                        tool = %tool.name,
                        desc = %desc_preview,
                        "   🔧 Tool available"
                    );
                }
            }
            LoadStatus::NoTools => {
                warn!(address = %server.address, "⚠️  Server loaded but has no tools");
            }
            LoadStatus::Failed(err) => {
                error!(address = %server.address, error = %err, "❌ Failed to load server");
            }
        }
    }

    let summary = &report.summary;
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!(
        servers = summary.servers,
        loaded = summary.loaded,
        failed = summary.failed,
        no_tools = summary.no_tools,
        total_tools = summary.total_tools,
        registered = report.registry.len(),
        "📊 Discovery Summary"
    );
    if summary.is_degraded() {
        error!("No tools were obtained from any MCP server, check the servers");
    }
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}
