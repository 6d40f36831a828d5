use std::sync::Arc;

use crate::modules::chain::adapter::{ChainAdapter, HttpChainAdapter};
use crate::modules::chain::mock::MockChainAdapter;
use crate::shared::config::Config;

pub fn init_chain_adapter(config: &Config) -> Arc<dyn ChainAdapter> {
    if config.app_env == "dev" || config.app_env == "test" {
        tracing::warn!("Using mock chain adapter for {} env", config.app_env);
        return Arc::new(MockChainAdapter::new());
    }

    if config.chain_gateway_url.is_empty() {
        panic!("CHAIN_GATEWAY_URL must be set outside dev");
    }

    Arc::new(HttpChainAdapter::new(
        config.chain_gateway_url.clone(),
        config.chain_api_key.clone(),
        config.chain_network.clone(),
    ))
}
