//! Business logic services

pub mod catalog;
pub mod loans;
pub mod uploads;
pub mod users;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub users: users::UsersService,
    pub loans: loans::LoansService,
    pub uploads: uploads::UploadsService,
    pub repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            users: users::UsersService::new(repository.clone(), config.loans.clone()),
            loans: loans::LoansService::new(repository.clone(), config.loans.clone()),
            uploads: uploads::UploadsService::new(&config.uploads),
            repository,
        }
    }
}
