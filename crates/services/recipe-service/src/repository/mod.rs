//! Repository layer for data access.

pub mod entities;
pub(crate) mod recipe_repository;
pub(crate) mod user_repository;

pub use recipe_repository::{RecipeRepository, RecipeStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use recipe_repository::MockRecipeRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
