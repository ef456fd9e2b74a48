//! Recipe service - Recipe use cases scoped to their owning user.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use common::{AppError, AppResult, OptionExt};
use domain::{CreateRecipe, Recipe, RecipeResponse, UpdateRecipe};

use crate::infra::UnitOfWork;

/// Recipe service trait for dependency injection.
#[async_trait]
pub trait RecipeService: Send + Sync {
    /// Create a recipe owned by `owner_id`
    async fn create_recipe(&self, owner_id: Uuid, input: CreateRecipe) -> AppResult<Recipe>;

    /// Get recipe with its owner summary
    async fn get_recipe(&self, id: Uuid) -> AppResult<RecipeResponse>;

    /// List the recipes of one user
    async fn list_recipes(&self, owner_id: Uuid) -> AppResult<Vec<Recipe>>;

    /// Reassign recipe fields; each provided field is validated again
    async fn update_recipe(&self, id: Uuid, input: UpdateRecipe) -> AppResult<Recipe>;

    /// Delete a single recipe
    async fn delete_recipe(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of RecipeService using Unit of Work.
pub struct RecipeManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> RecipeManager<U> {
    /// Create new recipe service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> RecipeService for RecipeManager<U> {
    async fn create_recipe(&self, owner_id: Uuid, input: CreateRecipe) -> AppResult<Recipe> {
        input.validate()?;

        let owner = self
            .uow
            .users()
            .find_by_id(owner_id)
            .await?
            .ok_or_not_found()?;

        let recipe = Recipe::for_owner(owner.id, input)?;
        let recipe = self.uow.recipes().create(recipe).await?;

        info!(recipe_id = %recipe.id, user_id = %owner.id, "Recipe created");
        Ok(recipe)
    }

    async fn get_recipe(&self, id: Uuid) -> AppResult<RecipeResponse> {
        let recipe = self.uow.recipes().find_by_id(id).await?.ok_or_not_found()?;

        // An owner always exists while the recipe does
        let owner = self
            .uow
            .users()
            .find_by_id(recipe.user_id())
            .await?
            .ok_or_else(|| AppError::internal(format!("Recipe {} has no owner", id)))?;

        Ok(RecipeResponse::new(&recipe, &owner))
    }

    async fn list_recipes(&self, owner_id: Uuid) -> AppResult<Vec<Recipe>> {
        self.uow
            .users()
            .find_by_id(owner_id)
            .await?
            .ok_or_not_found()?;

        self.uow.recipes().list_by_owner(owner_id).await
    }

    async fn update_recipe(&self, id: Uuid, input: UpdateRecipe) -> AppResult<Recipe> {
        input.validate()?;

        let mut recipe = self.uow.recipes().find_by_id(id).await?.ok_or_not_found()?;
        recipe.apply(input)?;

        self.uow.recipes().update(recipe).await
    }

    async fn delete_recipe(&self, id: Uuid) -> AppResult<()> {
        self.uow.recipes().delete(id).await?;
        info!(recipe_id = %id, "Recipe deleted");
        Ok(())
    }
}
