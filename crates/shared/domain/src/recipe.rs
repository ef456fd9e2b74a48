//! Recipe domain entity.
//!
//! Title and instructions are checked on every assignment, so a `Recipe`
//! value never holds an empty title or instructions shorter than
//! [`MIN_INSTRUCTIONS_LENGTH`] characters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::constants::{MIN_INSTRUCTIONS_LENGTH, MIN_TITLE_LENGTH};
use crate::error::{DomainError, DomainResult};
use crate::user::{User, UserSummary};

/// Reject an empty title; otherwise return it unchanged.
pub fn validate_title(title: String) -> DomainResult<String> {
    if title.chars().count() < MIN_TITLE_LENGTH {
        return Err(DomainError::validation("title cannot be empty"));
    }
    Ok(title)
}

/// Reject instructions shorter than the minimum; otherwise return them unchanged.
pub fn validate_instructions(instructions: String) -> DomainResult<String> {
    if instructions.chars().count() < MIN_INSTRUCTIONS_LENGTH {
        return Err(DomainError::validation(format!(
            "instructions too short. They must be at least {} characters",
            MIN_INSTRUCTIONS_LENGTH
        )));
    }
    Ok(instructions)
}

/// Recipe domain entity, owned by exactly one user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recipe {
    pub id: Uuid,
    title: String,
    instructions: String,
    minutes_to_complete: i32,
    user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    /// Create a recipe, validating title and instructions.
    pub fn new(
        id: Uuid,
        user_id: Uuid,
        title: String,
        instructions: String,
        minutes_to_complete: i32,
    ) -> DomainResult<Self> {
        let now = Utc::now();
        Ok(Self {
            id,
            title: validate_title(title)?,
            instructions: validate_instructions(instructions)?,
            minutes_to_complete,
            user_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Create a new recipe with a fresh id for the given owner
    pub fn for_owner(owner_id: Uuid, draft: CreateRecipe) -> DomainResult<Self> {
        Self::new(
            Uuid::new_v4(),
            owner_id,
            draft.title,
            draft.instructions,
            draft.minutes_to_complete,
        )
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn minutes_to_complete(&self) -> i32 {
        self.minutes_to_complete
    }

    /// Id of the owning user
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn set_title(&mut self, title: String) -> DomainResult<()> {
        self.title = validate_title(title)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn set_instructions(&mut self, instructions: String) -> DomainResult<()> {
        self.instructions = validate_instructions(instructions)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn set_minutes_to_complete(&mut self, minutes: i32) {
        self.minutes_to_complete = minutes;
        self.updated_at = Utc::now();
    }

    /// Apply a partial update.
    ///
    /// Every provided field is validated before anything is assigned, so a
    /// rejected update leaves the recipe untouched.
    pub fn apply(&mut self, update: UpdateRecipe) -> DomainResult<()> {
        let title = update.title.map(validate_title).transpose()?;
        let instructions = update.instructions.map(validate_instructions).transpose()?;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(instructions) = instructions {
            self.instructions = instructions;
        }
        if let Some(minutes) = update.minutes_to_complete {
            self.minutes_to_complete = minutes;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

impl std::fmt::Display for Recipe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Recipe {}, {}, {}",
            self.title, self.instructions, self.minutes_to_complete
        )
    }
}

/// Recipe creation data transfer object
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRecipe {
    #[validate(length(min = 1, message = "title cannot be empty"))]
    pub title: String,
    #[validate(length(
        min = 50,
        message = "instructions too short. They must be at least 50 characters"
    ))]
    pub instructions: String,
    pub minutes_to_complete: i32,
}

/// Recipe update data transfer object; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRecipe {
    #[validate(length(min = 1, message = "title cannot be empty"))]
    pub title: Option<String>,
    #[validate(length(
        min = 50,
        message = "instructions too short. They must be at least 50 characters"
    ))]
    pub instructions: Option<String>,
    pub minutes_to_complete: Option<i32>,
}

/// Recipe as listed under its owner (no user object)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub id: Uuid,
    pub title: String,
    pub instructions: String,
    pub minutes_to_complete: i32,
    pub user_id: Uuid,
}

impl From<&Recipe> for RecipeSummary {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title.clone(),
            instructions: recipe.instructions.clone(),
            minutes_to_complete: recipe.minutes_to_complete,
            user_id: recipe.user_id,
        }
    }
}

/// Recipe response with its owner embedded as a summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeResponse {
    pub id: Uuid,
    pub title: String,
    pub instructions: String,
    pub minutes_to_complete: i32,
    pub user: UserSummary,
}

impl RecipeResponse {
    pub fn new(recipe: &Recipe, owner: &User) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title.clone(),
            instructions: recipe.instructions.clone(),
            minutes_to_complete: recipe.minutes_to_complete,
            user: UserSummary::from(owner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_instructions() -> String {
        "x".repeat(60)
    }

    #[test]
    fn test_new_recipe() {
        let owner = Uuid::new_v4();
        let recipe = Recipe::new(Uuid::new_v4(), owner, "Soup".to_string(), long_instructions(), 10)
            .unwrap();

        assert_eq!(recipe.title(), "Soup");
        assert_eq!(recipe.instructions(), long_instructions());
        assert_eq!(recipe.minutes_to_complete(), 10);
        assert_eq!(recipe.user_id(), owner);
    }

    #[test]
    fn test_empty_title_rejected() {
        let err = Recipe::new(Uuid::new_v4(), Uuid::new_v4(), String::new(), long_instructions(), 10)
            .unwrap_err();

        assert_eq!(err, DomainError::validation("title cannot be empty"));
    }

    #[test]
    fn test_short_instructions_rejected() {
        let err = Recipe::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Soup".to_string(),
            "short".to_string(),
            10,
        )
        .unwrap_err();

        assert!(err.is_validation());
    }

    #[test]
    fn test_instructions_boundary() {
        assert!(validate_instructions("a".repeat(49)).is_err());
        assert_eq!(validate_instructions("a".repeat(50)).unwrap(), "a".repeat(50));
    }

    #[test]
    fn test_instructions_counted_in_characters() {
        // 50 two-byte characters
        let text = "é".repeat(50);
        assert!(validate_instructions(text).is_ok());
    }

    #[test]
    fn test_title_returned_unchanged() {
        assert_eq!(validate_title("  Soup ".to_string()).unwrap(), "  Soup ");
        assert_eq!(validate_title("x".to_string()).unwrap(), "x");
    }

    #[test]
    fn test_setters_revalidate() {
        let mut recipe =
            Recipe::for_owner(Uuid::new_v4(), CreateRecipe {
                title: "Soup".to_string(),
                instructions: long_instructions(),
                minutes_to_complete: 10,
            })
            .unwrap();

        assert!(recipe.set_title(String::new()).is_err());
        assert!(recipe.set_instructions("too short".to_string()).is_err());
        assert_eq!(recipe.title(), "Soup");
        assert_eq!(recipe.instructions(), long_instructions());

        recipe.set_title("Stew".to_string()).unwrap();
        recipe.set_minutes_to_complete(45);
        assert_eq!(recipe.title(), "Stew");
        assert_eq!(recipe.minutes_to_complete(), 45);
    }

    #[test]
    fn test_apply_is_all_or_nothing() {
        let mut recipe = Recipe::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Soup".to_string(),
            long_instructions(),
            10,
        )
        .unwrap();

        let result = recipe.apply(UpdateRecipe {
            title: Some("Stew".to_string()),
            instructions: Some("short".to_string()),
            minutes_to_complete: Some(20),
        });

        assert!(result.is_err());
        assert_eq!(recipe.title(), "Soup");
        assert_eq!(recipe.minutes_to_complete(), 10);

        recipe
            .apply(UpdateRecipe {
                title: Some("Stew".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(recipe.title(), "Stew");
        assert_eq!(recipe.instructions(), long_instructions());
    }

    #[test]
    fn test_create_recipe_dto_validation() {
        let dto = CreateRecipe {
            title: String::new(),
            instructions: "short".to_string(),
            minutes_to_complete: 5,
        };
        let errors = dto.validate().unwrap_err();

        assert!(errors.field_errors().contains_key("title"));
        assert!(errors.field_errors().contains_key("instructions"));
    }

    #[test]
    fn test_summary_has_no_user_object() {
        let recipe = Recipe::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Soup".to_string(),
            long_instructions(),
            10,
        )
        .unwrap();
        let json = serde_json::to_value(RecipeSummary::from(&recipe)).unwrap();

        assert!(json.get("user").is_none());
        assert_eq!(json["user_id"], recipe.user_id().to_string());
    }
}
