// Application state module
// Immutable per-process state shared by every connection

use std::sync::Arc;

use super::types::Config;
use crate::handler::HelpPages;
use crate::routing::RouteTable;
use crate::upstream::{HttpFetcher, ScriptFetcher, ScriptSource};

/// Application state
pub struct AppState {
    pub config: Config,
    /// Built once from `config.routes`, never mutated
    pub routes: RouteTable,
    pub help: HelpPages,
    pub scripts: ScriptSource,
}

impl AppState {
    /// State backed by the real upstream HTTP client
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let fetcher = HttpFetcher::new(&config.upstream)?;
        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    pub fn with_fetcher(config: &Config, fetcher: Arc<dyn ScriptFetcher>) -> Self {
        let routes = RouteTable::new(&config.routes);
        Self {
            config: config.clone(),
            help: HelpPages::render(&config.site, &routes),
            routes,
            scripts: ScriptSource::new(fetcher, config.upstream.cache_ttl),
        }
    }
}
