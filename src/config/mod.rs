pub mod app;
pub mod error;
pub mod loader;
pub mod model;
pub mod server;

pub use crate::constants::CONFIG_PATH;
pub use app::{AgentSettings, AppConfig, DiscoverySettings, RestServerConfig};
pub use error::ConfigError;
pub use model::ModelConfig;
pub use server::parse_server_list;
