//! Business logic services

pub mod authors;
pub mod catalog;
pub mod loans;
pub mod redis;
pub mod sessions;

use std::sync::Arc;
use std::time::Duration;

use crate::{config::SessionConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
    pub authors: authors::AuthorsService,
    pub sessions: sessions::SessionService,
}

impl Services {
    /// Create all services with the given repository and session store
    pub fn new(
        repository: Repository,
        session_store: Arc<dyn sessions::SessionStore>,
        session_config: &SessionConfig,
    ) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            loans: loans::LoansService::new(repository.clone()),
            authors: authors::AuthorsService::new(repository),
            sessions: sessions::SessionService::new(
                session_store,
                Duration::from_secs(session_config.ttl_seconds),
            ),
        }
    }
}
