//! User repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, SqlErr,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use common::{AppError, AppResult};
use domain::User;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by username
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Insert a new user; a taken username is reported as a conflict
    async fn create(&self, user: User) -> AppResult<User>;

    /// Persist all mutable fields of an existing user
    async fn update(&self, user: User) -> AppResult<User>;

    /// Delete user row by ID (recipes are the caller's concern)
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// List all users ordered by username
    async fn list(&self) -> AppResult<Vec<User>>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        find_by_id(&self.db, id).await
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        result.map(hydrate).transpose()
    }

    async fn create(&self, user: User) -> AppResult<User> {
        create(&self.db, &user).await
    }

    async fn update(&self, user: User) -> AppResult<User> {
        let active = ActiveModel::from(&user);
        let model = active.update(&self.db).await.map_err(map_write_err)?;
        hydrate(model)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        delete(&self.db, id).await
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_asc(user::Column::Username)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        models.into_iter().map(hydrate).collect()
    }
}

// =============================================================================
// Connection-agnostic queries (shared with the transactional repository)
// =============================================================================

async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<Option<User>> {
    let result = UserEntity::find_by_id(id)
        .one(db)
        .await
        .map_err(AppError::from)?;

    result.map(hydrate).transpose()
}

pub(crate) async fn create<C: ConnectionTrait>(db: &C, user: &User) -> AppResult<User> {
    let model = ActiveModel::from(user)
        .insert(db)
        .await
        .map_err(map_write_err)?;
    hydrate(model)
}

pub(crate) async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<()> {
    let result = UserEntity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(AppError::from)?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    Ok(())
}

/// Rows were validated on the way in; a row that fails now is corrupt data.
fn hydrate(model: user::Model) -> AppResult<User> {
    let id = model.id;
    User::try_from(model).map_err(|e| AppError::internal(format!("Corrupt user row {}: {}", id, e)))
}

fn map_write_err(err: DbErr) -> AppError {
    if matches!(err, DbErr::RecordNotUpdated) {
        return AppError::NotFound;
    }
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::conflict("Username"),
        _ => AppError::from(err),
    }
}
