use crate::config::AppConfig;
use ioc::{Bean, BoxError, Inject, PostConstruct};

/// Application log used by the catalog services
pub(crate) trait LogService: Send + Sync {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
    fn debug(&self, message: &str);
}

#[derive(Default, Bean)]
#[bean(provides(dyn LogService), post_construct)]
pub(crate) struct TracingLogService {
    #[inject("appConfig")]
    config: Inject<AppConfig>,
}

impl PostConstruct for TracingLogService {
    fn post_construct(&self) -> Result<(), BoxError> {
        tracing::info!(debug = self.config.debug, "log service ready");
        Ok(())
    }
}

impl LogService for TracingLogService {
    fn info(&self, message: &str) {
        tracing::info!(target: "catalog", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "catalog", "{message}");
    }

    fn debug(&self, message: &str) {
        if self.config.debug {
            tracing::debug!(target: "catalog", "{message}");
        }
    }
}
