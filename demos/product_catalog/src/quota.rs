use crate::config::AppConfig;
use ioc::{Bean, BoxError, Inject, PostConstruct};
use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
    time::Instant
};

/// Limits how many times an operation may run per reset window
pub(crate) trait QuotaService: Send + Sync {
    fn has_quota(&self, operation: &str) -> bool;

    /// Consumes one unit of the quota, returns `false` if none is left
    fn use_quota(&self, operation: &str) -> bool;

    fn reset_quotas(&self);
}

#[derive(Default)]
struct Usage {
    used: HashMap<String, usize>,
    last_reset: Option<Instant>,
}

#[derive(Default, Bean)]
#[bean(provides(dyn QuotaService), post_construct)]
pub(crate) struct InMemoryQuotaService {
    #[inject("appConfig")]
    config: Inject<AppConfig>,
    usage: Mutex<Usage>,
}

impl InMemoryQuotaService {
    fn with_usage<R>(&self, f: impl FnOnce(&mut Usage) -> R) -> R {
        let mut usage = self.usage
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let expired = usage.last_reset
            .is_none_or(|last| last.elapsed() > self.config.quota_reset);
        if expired {
            usage.used.clear();
            usage.last_reset = Some(Instant::now());
        }
        f(&mut usage)
    }
}

impl PostConstruct for InMemoryQuotaService {
    fn post_construct(&self) -> Result<(), BoxError> {
        if self.config.max_quota == 0 {
            return Err("max quota must be greater than zero".into());
        }
        self.reset_quotas();
        tracing::info!(max_quota = self.config.max_quota, "quota service ready");
        Ok(())
    }
}

impl QuotaService for InMemoryQuotaService {
    fn has_quota(&self, operation: &str) -> bool {
        let max = self.config.max_quota;
        self.with_usage(|usage| usage.used.get(operation).copied().unwrap_or(0) < max)
    }

    fn use_quota(&self, operation: &str) -> bool {
        let max = self.config.max_quota;
        self.with_usage(|usage| {
            let used = usage.used.entry(operation.into()).or_default();
            if *used >= max {
                return false;
            }
            *used += 1;
            true
        })
    }

    fn reset_quotas(&self) {
        let mut usage = self.usage
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        usage.used.clear();
        usage.last_reset = Some(Instant::now());
    }
}
