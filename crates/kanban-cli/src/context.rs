use crate::cli::Cli;
use kanban_core::AppConfig;
use kanban_gateway::{BoardGateway, HttpGateway, MemoryGateway};
use kanban_sync::{BoardPage, Sidebar, SyncContext, SyncFailure};
use std::sync::Arc;
use tokio::sync::broadcast;

pub struct CliContext {
    sync: SyncContext,
    failures: broadcast::Receiver<SyncFailure>,
}

impl CliContext {
    pub fn connect(cli: &Cli) -> anyhow::Result<Self> {
        let config = AppConfig::load().with_overrides(cli.api_url.clone(), cli.token.clone());

        let gateway: Arc<dyn BoardGateway> = if cli.offline {
            tracing::debug!("using in-process board service");
            Arc::new(MemoryGateway::new())
        } else {
            tracing::debug!(base_url = %config.api.base_url, "connecting to board service");
            Arc::new(HttpGateway::new(&config.api)?)
        };

        let sync = SyncContext::new(gateway, &config.sync);
        let failures = sync.failures.subscribe();
        Ok(Self { sync, failures })
    }

    pub fn sidebar(&self) -> Sidebar {
        Sidebar::new(self.sync.clone())
    }

    /// Sidebar with both board lists fetched.
    pub async fn loaded_sidebar(&self) -> anyhow::Result<Sidebar> {
        let sidebar = self.sidebar();
        sidebar.load().await?;
        Ok(sidebar)
    }

    pub async fn open_board(&self, board_id: &str) -> anyhow::Result<BoardPage> {
        Ok(BoardPage::open(self.sync.clone(), board_id).await?)
    }

    /// Wait for debounced writes to finish and fail if any of them did not
    /// reach the server.
    pub async fn settle(&mut self) -> anyhow::Result<()> {
        self.sync.scheduler.settle().await;

        let mut failed = Vec::new();
        loop {
            match self.failures.try_recv() {
                Ok(failure) => failed.push(failure),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }

        match failed.as_slice() {
            [] => Ok(()),
            [failure] => anyhow::bail!("{}: {}", failure.target, failure.message),
            [first, rest @ ..] => anyhow::bail!(
                "{}: {} ({} more writes failed)",
                first.target,
                first.message,
                rest.len()
            ),
        }
    }
}
