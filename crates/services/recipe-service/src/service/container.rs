//! Service container - one place to reach every application service.

use std::sync::Arc;

use domain::HashCost;
use sea_orm::DatabaseConnection;

use super::{AccountManager, AccountService, RecipeManager, RecipeService};
use crate::infra::{Persistence, UnitOfWork};

/// Concrete service container
#[derive(Clone)]
pub struct Services {
    account_service: Arc<dyn AccountService>,
    recipe_service: Arc<dyn RecipeService>,
}

impl Services {
    /// Create a service container from already built services
    pub fn new(
        account_service: Arc<dyn AccountService>,
        recipe_service: Arc<dyn RecipeService>,
    ) -> Self {
        Self {
            account_service,
            recipe_service,
        }
    }

    /// Build every service over one Unit of Work
    pub fn from_unit_of_work<U: UnitOfWork + 'static>(uow: Arc<U>, hash_cost: HashCost) -> Self {
        Self::new(
            Arc::new(AccountManager::new(uow.clone(), hash_cost)),
            Arc::new(RecipeManager::new(uow)),
        )
    }

    /// Build every service over a database connection
    pub fn from_connection(db: DatabaseConnection, hash_cost: HashCost) -> Self {
        Self::from_unit_of_work(Arc::new(Persistence::new(db)), hash_cost)
    }

    /// Get account service
    pub fn accounts(&self) -> Arc<dyn AccountService> {
        self.account_service.clone()
    }

    /// Get recipe service
    pub fn recipes(&self) -> Arc<dyn RecipeService> {
        self.recipe_service.clone()
    }
}
