use clap::Parser;
use mcp_agent_bridge::agent::{AgentOptions, AgentSession};
use mcp_agent_bridge::cli::{Cli, RunMode};
use mcp_agent_bridge::config::AppConfig;
use mcp_agent_bridge::discovery::{RetryPolicy, ToolRegistryBuilder, run_startup_discovery};
use mcp_agent_bridge::handler::RequestHandler;
use mcp_agent_bridge::model::{ModelProvider, ProviderFactory};
use mcp_agent_bridge::tooling::McpConnector;
use mcp_agent_bridge::{server, stdio};
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.mode == RunMode::Stdio);
    info!("Starting mcp-agent-bridge");
    debug!(?cli.mode, config = ?cli.config, "CLI arguments parsed");

    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    info!(
        servers = config.servers.len(),
        provider = config.model.provider_type.as_str(),
        model = config.model.model.as_str(),
        "Configuration loaded"
    );

    let provider = ProviderFactory::create(&config.model);
    let handler = Arc::new(RequestHandler::new(config.agent.verbose));

    match cli.mode {
        RunMode::Rest => {
            let addr = config.rest_server.socket_addr()?;
            let listener = server::bind(addr).await?;
            let startup = tokio::spawn(start_session(config.clone(), provider, handler.clone()));
            let served = server::serve(listener, handler, &config.rest_server.cors_origins).await;
            startup.abort();
            served?;
        }
        RunMode::Stdio => {
            start_session(config, provider, handler.clone()).await;
            stdio::run(handler).await?;
        }
    }

    info!("mcp-agent-bridge finished");
    Ok(())
}

/// Discovers tools, builds the single agent session and hands it to the handler.
async fn start_session(
    config: AppConfig,
    provider: Arc<dyn ModelProvider>,
    handler: Arc<RequestHandler>,
) {
    let builder = ToolRegistryBuilder::new(
        Arc::new(McpConnector::default()),
        RetryPolicy::from_settings(&config.discovery),
    );
    let report = run_startup_discovery(&builder, &config.servers).await;

    let session = AgentSession::new(provider, config.model.model.clone(), Arc::new(report.registry))
        .with_name(config.agent.name.clone())
        .with_system_instruction(config.system_prompt.clone())
        .with_options(AgentOptions::from_settings(&config.agent, &config.model));
    info!(agent = session.name(), "Agent session constructed");
    handler.install(Arc::new(session));
}

/// Logs go to stderr at `warn` in stdio mode so they stay out of the prompt.
fn init_tracing(quiet: bool) {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let default_level = if quiet { "warn" } else { "info" };
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
        let builder = fmt().with_env_filter(filter).with_target(false).with_level(true);
        if quiet {
            builder.with_writer(std::io::stderr).init();
        } else {
            builder.init();
        }
    });
}
