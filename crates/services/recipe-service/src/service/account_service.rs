//! Account service - registration, credentials and account lifecycle.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use common::{AppError, AppResult, OptionExt};
use domain::{CreateUser, HashCost, Password, UpdateUser, User, UserResponse};

use crate::infra::UnitOfWork;
use crate::with_transaction;

/// Well-formed default-cost hash that matches no password. Only used when
/// the configured cost cannot produce a dummy of its own.
const FALLBACK_DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

static FALLBACK_DUMMY: Lazy<Password> =
    Lazy::new(|| Password::from_hash(FALLBACK_DUMMY_HASH.to_string()));

/// Account service trait for dependency injection.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Register a new user
    async fn register(&self, input: CreateUser) -> AppResult<User>;

    /// Check a username/password pair and return the matching user
    async fn authenticate(&self, username: &str, password: &str) -> AppResult<User>;

    /// Replace a user's password
    async fn change_password(&self, id: Uuid, new_password: &str) -> AppResult<()>;

    /// Update username, image URL or bio
    async fn update_profile(&self, id: Uuid, input: UpdateUser) -> AppResult<User>;

    /// Get user by ID
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// Get user with their recipes, ready for serialization
    async fn get_profile(&self, id: Uuid) -> AppResult<UserResponse>;

    /// List all users
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Delete a user and every recipe they own, atomically.
    /// Returns the number of recipes removed.
    async fn delete_user(&self, id: Uuid) -> AppResult<u64>;
}

/// Concrete implementation of AccountService using Unit of Work.
pub struct AccountManager<U: UnitOfWork> {
    uow: Arc<U>,
    hash_cost: HashCost,
    /// Verified against for unknown usernames, at the same cost as real credentials
    dummy: Password,
}

impl<U: UnitOfWork> AccountManager<U> {
    /// Create new account service with the cost used for new credentials
    pub fn new(uow: Arc<U>, hash_cost: HashCost) -> Self {
        let dummy = Password::new(&Uuid::new_v4().to_string(), &hash_cost).unwrap_or_else(|e| {
            warn!(?hash_cost, "Cannot hash with configured cost ({}), using default dummy", e);
            FALLBACK_DUMMY.clone()
        });

        Self {
            uow,
            hash_cost,
            dummy,
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> AccountService for AccountManager<U> {
    async fn register(&self, input: CreateUser) -> AppResult<User> {
        input.validate()?;

        if self.uow.users().find_by_username(&input.username).await?.is_some() {
            return Err(AppError::conflict("Username"));
        }

        let mut user = User::register(input.username, &input.password, &self.hash_cost)?;
        user.image_url = input.image_url;
        user.bio = input.bio;

        let user = self.uow.users().create(user).await?;
        info!(user_id = %user.id, username = user.username(), "User registered");
        Ok(user)
    }

    async fn authenticate(&self, username: &str, password: &str) -> AppResult<User> {
        let user = self.uow.users().find_by_username(username).await?;

        match user {
            Some(user) if user.authenticate(password) => Ok(user),
            Some(_) => {
                warn!(username, "Authentication failed");
                Err(AppError::InvalidCredentials)
            }
            None => {
                // Same work as a real check so timing does not reveal unknown usernames
                self.dummy.verify(password);
                warn!(username, "Authentication failed");
                Err(AppError::InvalidCredentials)
            }
        }
    }

    async fn change_password(&self, id: Uuid, new_password: &str) -> AppResult<()> {
        let mut user = self.uow.users().find_by_id(id).await?.ok_or_not_found()?;
        user.set_password(new_password, &self.hash_cost)?;

        self.uow.users().update(user).await?;
        info!(user_id = %id, "Password changed");
        Ok(())
    }

    async fn update_profile(&self, id: Uuid, input: UpdateUser) -> AppResult<User> {
        input.validate()?;

        let mut user = self.uow.users().find_by_id(id).await?.ok_or_not_found()?;

        if let Some(username) = input.username {
            if username != user.username() {
                if let Some(existing) = self.uow.users().find_by_username(&username).await? {
                    if existing.id != id {
                        return Err(AppError::conflict("Username"));
                    }
                }
                user.set_username(username)?;
            }
        }
        user.update_profile(input.image_url, input.bio);

        self.uow.users().update(user).await
    }

    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow.users().find_by_id(id).await?.ok_or_not_found()
    }

    async fn get_profile(&self, id: Uuid) -> AppResult<UserResponse> {
        let user = self.get_user(id).await?;
        let recipes = self.uow.recipes().list_by_owner(id).await?;
        Ok(UserResponse::with_recipes(&user, &recipes))
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.uow.users().list().await
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<u64> {
        let removed = with_transaction!(self.uow, |ctx| {
            let removed = ctx.recipes().delete_by_owner(id).await?;
            ctx.users().delete(id).await?;
            Ok::<_, AppError>(removed)
        })?;

        info!(user_id = %id, recipes_removed = removed, "User deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{TransactionContext, TxFuture};
    use crate::repository::{
        MockRecipeRepository, MockUserRepository, RecipeRepository, UserRepository,
    };

    struct EmptyStore;

    #[async_trait]
    impl UnitOfWork for EmptyStore {
        fn users(&self) -> Arc<dyn UserRepository> {
            Arc::new(MockUserRepository::new())
        }

        fn recipes(&self) -> Arc<dyn RecipeRepository> {
            Arc::new(MockRecipeRepository::new())
        }

        async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
        where
            F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
            T: Send,
        {
            Err(AppError::internal("no transactions"))
        }
    }

    #[test]
    fn test_dummy_credential_uses_configured_cost() {
        let manager = AccountManager::new(Arc::new(EmptyStore), HashCost::new(2048, 3, 1));

        assert!(manager.dummy.as_hash().contains("m=2048,t=3,p=1"));
        assert!(!manager.dummy.verify(""));
    }

    #[test]
    fn test_dummy_credential_falls_back_for_unusable_cost() {
        let manager = AccountManager::new(Arc::new(EmptyStore), HashCost::new(1, 1, 1));

        assert_eq!(manager.dummy.as_hash(), FALLBACK_DUMMY_HASH);
    }
}
