use roster_chaincode::Chaincode;
use roster_store::InMemoryLedger;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::AppState;
use crate::router::build_router;

/// Roster HTTP host over an in-memory ledger.
pub struct RosterServer {
    config: ServerConfig,
    state: AppState,
}

impl RosterServer {
    pub fn new(config: ServerConfig) -> Self {
        Self::with_ledger(config, InMemoryLedger::new())
    }

    /// Serve an existing ledger, e.g. one pre-populated by a script.
    pub fn with_ledger(config: ServerConfig, ledger: InMemoryLedger) -> Self {
        let chaincode = Chaincode::with_config(ledger, config.chaincode.clone());
        Self {
            config,
            state: AppState::new(chaincode),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn ledger(&self) -> &InMemoryLedger {
        self.state.chaincode.ledger()
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone(), self.config.trace_requests)
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!("roster server listening on {}", self.config.bind_addr);
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_store::LedgerState;

    #[test]
    fn server_construction() {
        let server = RosterServer::new(ServerConfig::default());
        assert_eq!(server.config().bind_addr.port(), 8080);
        assert!(server.ledger().is_empty().unwrap());
    }

    #[test]
    fn serves_supplied_ledger() {
        let ledger = InMemoryLedger::new();
        ledger.put("k", b"v").unwrap();
        let server = RosterServer::with_ledger(ServerConfig::default(), ledger);
        assert_eq!(server.ledger().len().unwrap(), 1);
        let _router = server.router();
    }
}
