//! Service context - dependency container for services
//!
//! Holds the repositories, transition store, and notifier every service
//! needs. The event queue repository is deliberately absent: only the bridge
//! worker drives the queue, and it constructs its own repository.

use std::sync::Arc;

use hackster_common::Notifier;
use hackster_core::traits::{
    DeadLetterRepository, EventLogRepository, RecordRepository, ReportRepository, TransitionStore,
};
use hackster_db::PgPool;

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Database repositories
/// - The transactional transition store
/// - The operational webhook notifier
#[derive(Clone)]
pub struct ServiceContext {
    // Database pool (readiness pings)
    pool: PgPool,

    // Repositories
    record_repo: Arc<dyn RecordRepository>,
    event_log_repo: Arc<dyn EventLogRepository>,
    dead_letter_repo: Arc<dyn DeadLetterRepository>,
    report_repo: Arc<dyn ReportRepository>,

    // Transition store
    transition_store: Arc<dyn TransitionStore>,

    // Notifications
    notifier: Arc<Notifier>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        pool: PgPool,
        record_repo: Arc<dyn RecordRepository>,
        event_log_repo: Arc<dyn EventLogRepository>,
        dead_letter_repo: Arc<dyn DeadLetterRepository>,
        report_repo: Arc<dyn ReportRepository>,
        transition_store: Arc<dyn TransitionStore>,
        notifier: Arc<Notifier>,
    ) -> Self {
        Self {
            pool,
            record_repo,
            event_log_repo,
            dead_letter_repo,
            report_repo,
            transition_store,
            notifier,
        }
    }

    // === Database Pool ===

    /// Get the PostgreSQL connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === Repositories ===

    /// Get the member record repository
    pub fn record_repo(&self) -> &dyn RecordRepository {
        self.record_repo.as_ref()
    }

    /// Get the event log repository
    pub fn event_log_repo(&self) -> &dyn EventLogRepository {
        self.event_log_repo.as_ref()
    }

    /// Get the dead letter repository
    pub fn dead_letter_repo(&self) -> &dyn DeadLetterRepository {
        self.dead_letter_repo.as_ref()
    }

    /// Get the report repository
    pub fn report_repo(&self) -> &dyn ReportRepository {
        self.report_repo.as_ref()
    }

    // === Transition Store ===

    /// Get the transactional transition store
    pub fn transition_store(&self) -> &dyn TransitionStore {
        self.transition_store.as_ref()
    }

    // === Notifications ===

    /// Get the webhook notifier
    pub fn notifier(&self) -> &Notifier {
        self.notifier.as_ref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &"PgPool")
            .field("repositories", &"...")
            .field("notifier", &self.notifier)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    record_repo: Option<Arc<dyn RecordRepository>>,
    event_log_repo: Option<Arc<dyn EventLogRepository>>,
    dead_letter_repo: Option<Arc<dyn DeadLetterRepository>>,
    report_repo: Option<Arc<dyn ReportRepository>>,
    transition_store: Option<Arc<dyn TransitionStore>>,
    notifier: Option<Arc<Notifier>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            pool: None,
            record_repo: None,
            event_log_repo: None,
            dead_letter_repo: None,
            report_repo: None,
            transition_store: None,
            notifier: None,
        }
    }

    pub fn pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn record_repo(mut self, repo: Arc<dyn RecordRepository>) -> Self {
        self.record_repo = Some(repo);
        self
    }

    pub fn event_log_repo(mut self, repo: Arc<dyn EventLogRepository>) -> Self {
        self.event_log_repo = Some(repo);
        self
    }

    pub fn dead_letter_repo(mut self, repo: Arc<dyn DeadLetterRepository>) -> Self {
        self.dead_letter_repo = Some(repo);
        self
    }

    pub fn report_repo(mut self, repo: Arc<dyn ReportRepository>) -> Self {
        self.report_repo = Some(repo);
        self
    }

    pub fn transition_store(mut self, store: Arc<dyn TransitionStore>) -> Self {
        self.transition_store = Some(store);
        self
    }

    pub fn notifier(mut self, notifier: Arc<Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Internal` if any required dependency is missing;
    /// a hole here is a wiring bug, not bad input
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.pool
                .ok_or_else(|| ServiceError::internal("pool is required"))?,
            self.record_repo
                .ok_or_else(|| ServiceError::internal("record_repo is required"))?,
            self.event_log_repo
                .ok_or_else(|| ServiceError::internal("event_log_repo is required"))?,
            self.dead_letter_repo
                .ok_or_else(|| ServiceError::internal("dead_letter_repo is required"))?,
            self.report_repo
                .ok_or_else(|| ServiceError::internal("report_repo is required"))?,
            self.transition_store
                .ok_or_else(|| ServiceError::internal("transition_store is required"))?,
            self.notifier
                .ok_or_else(|| ServiceError::internal("notifier is required"))?,
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
