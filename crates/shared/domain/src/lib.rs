//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! the write-only password credential, the user account and the recipe
//! entity with its field validation.

pub mod constants;
pub mod error;
pub mod password;
pub mod recipe;
pub mod user;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use password::{HashCost, Password};
pub use recipe::{
    validate_instructions, validate_title, CreateRecipe, Recipe, RecipeResponse, RecipeSummary,
    UpdateRecipe,
};
pub use user::{CreateUser, UpdateUser, User, UserResponse, UserSummary};
