use std::sync::Arc;

use registration_schema::Registration;
use tokio_util::task::TaskTracker;
use tracing::{info, warn};

use super::{config::Config, sheets::SheetLogger, storage::MemStorage};

pub struct State {
    pub config: Config,
    pub storage: MemStorage,
    pub sheet_logger: Option<Arc<SheetLogger>>,
    pub sheet_tasks: TaskTracker,
}

impl State {
    pub fn new(config: Config) -> Arc<Self> {
        let sheet_logger = config.sheets_webhook_url.as_deref().and_then(|url| {
            SheetLogger::new(url, config.sheets_timeout)
                .map(Arc::new)
                .map_err(|e| warn!("Sheet logging disabled, failed to build client: {e}"))
                .ok()
        });

        match sheet_logger {
            Some(_) => info!("Sheet logging enabled"),
            None => info!("Sheet logging disabled"),
        }

        Arc::new(Self {
            config,
            storage: MemStorage::new(),
            sheet_logger,
            sheet_tasks: TaskTracker::new(),
        })
    }

    pub fn log_to_sheet(&self, registration: &Registration) {
        if let Some(sheet_logger) = &self.sheet_logger {
            sheet_logger
                .clone()
                .spawn_log(&self.sheet_tasks, registration.clone());
        }
    }

    /// Waits for in-flight sheet writes, up to twice the webhook timeout.
    /// Returns `false` if some were still running when the wait gave up.
    pub async fn finish_sheet_writes(&self) -> bool {
        self.sheet_tasks.close();

        let pending = self.sheet_tasks.len();
        if pending > 0 {
            info!("Waiting for {pending} sheet write(s)");
        }

        let limit = self.config.sheets_timeout * 2;
        match tokio::time::timeout(limit, self.sheet_tasks.wait()).await {
            Ok(()) => true,
            Err(_) => {
                warn!(
                    "Gave up on {} sheet write(s) after {limit:?}",
                    self.sheet_tasks.len()
                );
                false
            }
        }
    }
}
