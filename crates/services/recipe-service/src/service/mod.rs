//! Application services layer - use cases over the repositories.
//!
//! Services depend on the `UnitOfWork` abstraction, so they run unchanged
//! against PostgreSQL, SQLite or mock repositories.

mod account_service;
pub mod container;
mod recipe_service;

pub use account_service::{AccountManager, AccountService};
pub use container::Services;
pub use recipe_service::{RecipeManager, RecipeService};
