//! Service context - dependency container for services
//!
//! Holds the stores, the clock, the board policy and the listing cache.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use codeboard_core::rules::BoardPolicy;
use codeboard_core::traits::{ActionStamp, Clock, CodeRegistry, QuotaLedger, SystemClock};
use codeboard_core::value_objects::CalendarDay;

use super::cache::ListCache;
use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// Cheap to clone; every dependency is shared.
#[derive(Clone)]
pub struct ServiceContext {
    registry: Arc<dyn CodeRegistry>,
    ledger: Arc<dyn QuotaLedger>,
    clock: Arc<dyn Clock>,
    policy: BoardPolicy,
    list_cache: Arc<ListCache>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        registry: Arc<dyn CodeRegistry>,
        ledger: Arc<dyn QuotaLedger>,
        clock: Arc<dyn Clock>,
        policy: BoardPolicy,
        list_cache: Arc<ListCache>,
    ) -> Self {
        Self {
            registry,
            ledger,
            clock,
            policy,
            list_cache,
        }
    }

    // === Stores ===

    /// Get the code registry
    pub fn registry(&self) -> &dyn CodeRegistry {
        self.registry.as_ref()
    }

    /// Get the quota ledger
    pub fn ledger(&self) -> &dyn QuotaLedger {
        self.ledger.as_ref()
    }

    // === Policy & time ===

    pub fn policy(&self) -> &BoardPolicy {
        &self.policy
    }

    pub fn list_cache(&self) -> &ListCache {
        self.list_cache.as_ref()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// The quota day of the current instant
    pub fn today(&self) -> CalendarDay {
        self.policy.day_boundary.day_of(self.now())
    }

    /// Instant and quota day of an action happening now
    pub fn stamp(&self) -> ActionStamp {
        let at = self.now();
        ActionStamp::new(at, self.policy.day_boundary.day_of(at))
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("stores", &"...")
            .field("policy", &self.policy)
            .field("list_cache", &self.list_cache)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    registry: Option<Arc<dyn CodeRegistry>>,
    ledger: Option<Arc<dyn QuotaLedger>>,
    clock: Option<Arc<dyn Clock>>,
    policy: BoardPolicy,
    list_cache_ttl: Duration,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            registry: None,
            ledger: None,
            clock: None,
            policy: BoardPolicy::default(),
            list_cache_ttl: Duration::from_millis(3000),
        }
    }

    pub fn registry(mut self, registry: Arc<dyn CodeRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn ledger(mut self, ledger: Arc<dyn QuotaLedger>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    /// Use one store as both registry and ledger
    pub fn store<S>(self, store: Arc<S>) -> Self
    where
        S: CodeRegistry + QuotaLedger + 'static,
    {
        let registry: Arc<dyn CodeRegistry> = store.clone();
        let ledger: Arc<dyn QuotaLedger> = store;
        self.registry(registry).ledger(ledger)
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn policy(mut self, policy: BoardPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn list_cache_ttl(mut self, ttl: Duration) -> Self {
        self.list_cache_ttl = ttl;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if a store is missing or the policy
    /// cannot be satisfied
    pub fn build(self) -> ServiceResult<ServiceContext> {
        if self.policy.initial_uses == 0 {
            return Err(ServiceError::validation("initial_uses must be at least 1"));
        }
        if self.policy.max_list_limit == 0 {
            return Err(ServiceError::validation("max_list_limit must be at least 1"));
        }

        Ok(ServiceContext::new(
            self.registry
                .ok_or_else(|| ServiceError::validation("registry is required"))?,
            self.ledger
                .ok_or_else(|| ServiceError::validation("ledger is required"))?,
            self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            self.policy,
            Arc::new(ListCache::new(self.list_cache_ttl)),
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
