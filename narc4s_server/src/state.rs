use std::sync::Arc;

use narc4s_core::twitter::fetcher::ParticipantFetcher;

#[derive(Clone)]
pub struct ServerState {
    fetcher: Arc<dyn ParticipantFetcher>,
    environment: String,
}

impl From<(Arc<dyn ParticipantFetcher>, String)> for ServerState {
    fn from(states: (Arc<dyn ParticipantFetcher>, String)) -> Self {
        let (fetcher, environment) = states;
        Self {
            fetcher,
            environment,
        }
    }
}

impl ServerState {
    pub fn fetcher(&self) -> &dyn ParticipantFetcher {
        self.fetcher.as_ref()
    }

    pub fn environment(&self) -> String {
        self.environment.clone()
    }
}
