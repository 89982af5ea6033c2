//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::{
    ApprenticeRepository, AssignmentRepository, CompanyRepository, PgApprenticeRepository,
    PgAssignmentRepository, PgCompanyRepository, PgPlacementRepository, PlacementRepository,
};

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub apprentices: Arc<dyn ApprenticeRepository>,
    pub companies: Arc<dyn CompanyRepository>,
    pub assignments: Arc<dyn AssignmentRepository>,
    pub placements: Arc<dyn PlacementRepository>,
}

impl AppState {
    /// Estado respaldado por PostgreSQL
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self::with_repositories(
            config,
            Arc::new(PgApprenticeRepository::new(pool.clone())),
            Arc::new(PgCompanyRepository::new(pool.clone())),
            Arc::new(PgAssignmentRepository::new(pool.clone())),
            Arc::new(PgPlacementRepository::new(pool)),
        )
    }

    pub fn with_repositories(
        config: EnvironmentConfig,
        apprentices: Arc<dyn ApprenticeRepository>,
        companies: Arc<dyn CompanyRepository>,
        assignments: Arc<dyn AssignmentRepository>,
        placements: Arc<dyn PlacementRepository>,
    ) -> Self {
        Self {
            config,
            apprentices,
            companies,
            assignments,
            placements,
        }
    }
}
