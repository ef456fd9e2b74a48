//! Recipe repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, SqlErr,
};
use uuid::Uuid;

use super::entities::recipe::{self, ActiveModel, Entity as RecipeEntity};
use common::{AppError, AppResult};
use domain::Recipe;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Recipe repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Find recipe by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Recipe>>;

    /// List recipes owned by a user, oldest first
    async fn list_by_owner(&self, user_id: Uuid) -> AppResult<Vec<Recipe>>;

    /// Count recipes owned by a user
    async fn count_by_owner(&self, user_id: Uuid) -> AppResult<u64>;

    /// Insert a new recipe; an unknown owner is reported as not found
    async fn create(&self, recipe: Recipe) -> AppResult<Recipe>;

    /// Persist all mutable fields of an existing recipe
    async fn update(&self, recipe: Recipe) -> AppResult<Recipe>;

    /// Delete recipe by ID
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Delete every recipe owned by a user, returning how many were removed
    async fn delete_by_owner(&self, user_id: Uuid) -> AppResult<u64>;
}

/// Concrete implementation of RecipeRepository
pub struct RecipeStore {
    db: DatabaseConnection,
}

impl RecipeStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecipeRepository for RecipeStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Recipe>> {
        let result = RecipeEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        result.map(hydrate).transpose()
    }

    async fn list_by_owner(&self, user_id: Uuid) -> AppResult<Vec<Recipe>> {
        list_by_owner(&self.db, user_id).await
    }

    async fn count_by_owner(&self, user_id: Uuid) -> AppResult<u64> {
        RecipeEntity::find()
            .filter(recipe::Column::UserId.eq(user_id))
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn create(&self, recipe: Recipe) -> AppResult<Recipe> {
        create(&self.db, &recipe).await
    }

    async fn update(&self, recipe: Recipe) -> AppResult<Recipe> {
        let model = ActiveModel::from(&recipe)
            .update(&self.db)
            .await
            .map_err(map_write_err)?;
        hydrate(model)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = RecipeEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn delete_by_owner(&self, user_id: Uuid) -> AppResult<u64> {
        delete_by_owner(&self.db, user_id).await
    }
}

// =============================================================================
// Connection-agnostic queries (shared with the transactional repository)
// =============================================================================

async fn list_by_owner<C: ConnectionTrait>(db: &C, user_id: Uuid) -> AppResult<Vec<Recipe>> {
    let models = RecipeEntity::find()
        .filter(recipe::Column::UserId.eq(user_id))
        .order_by_asc(recipe::Column::CreatedAt)
        .all(db)
        .await
        .map_err(AppError::from)?;

    models.into_iter().map(hydrate).collect()
}

async fn create<C: ConnectionTrait>(db: &C, recipe: &Recipe) -> AppResult<Recipe> {
    let model = ActiveModel::from(recipe)
        .insert(db)
        .await
        .map_err(map_write_err)?;
    hydrate(model)
}

pub(crate) async fn delete_by_owner<C: ConnectionTrait>(db: &C, user_id: Uuid) -> AppResult<u64> {
    let result = RecipeEntity::delete_many()
        .filter(recipe::Column::UserId.eq(user_id))
        .exec(db)
        .await
        .map_err(AppError::from)?;

    Ok(result.rows_affected)
}

/// Rows were validated on the way in; a row that fails now is corrupt data.
fn hydrate(model: recipe::Model) -> AppResult<Recipe> {
    let id = model.id;
    Recipe::try_from(model)
        .map_err(|e| AppError::internal(format!("Corrupt recipe row {}: {}", id, e)))
}

fn map_write_err(err: DbErr) -> AppError {
    if matches!(err, DbErr::RecordNotUpdated) {
        return AppError::NotFound;
    }
    match err.sql_err() {
        // Owner row is missing
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => AppError::NotFound,
        _ => AppError::from(err),
    }
}
