use std::sync::Arc;

use quiz_core::model::SessionPolicy;
use storage::Storage;

use crate::Clock;
use crate::catalog_service::QuizCatalogService;
use crate::error::AppServicesError;
use crate::results_service::ResultsService;
use crate::sessions::QuizSessionService;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    catalog: Arc<QuizCatalogService>,
    sessions: Arc<QuizSessionService>,
    results: Arc<ResultsService>,
}

impl AppServices {
    #[must_use]
    pub fn new(storage: &Storage, clock: Clock, policy: SessionPolicy) -> Self {
        let catalog = Arc::new(QuizCatalogService::new(Arc::clone(&storage.quizzes)));
        let sessions = Arc::new(
            QuizSessionService::new(
                clock,
                Arc::clone(&storage.quizzes),
                Arc::clone(&storage.results),
            )
            .with_policy(policy),
        );
        let results = Arc::new(ResultsService::new(Arc::clone(&storage.results)));

        Self {
            catalog,
            sessions,
            results,
        }
    }

    /// Services backed by the built-in in-memory catalog.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the catalog fixtures cannot be loaded.
    pub fn sample(clock: Clock, policy: SessionPolicy) -> Result<Self, AppServicesError> {
        let storage = Storage::sample()?;
        Ok(Self::new(&storage, clock, policy))
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<QuizCatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn sessions(&self) -> Arc<QuizSessionService> {
        Arc::clone(&self.sessions)
    }

    #[must_use]
    pub fn results(&self) -> Arc<ResultsService> {
        Arc::clone(&self.results)
    }
}
