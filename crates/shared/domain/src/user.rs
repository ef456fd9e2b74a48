//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::constants::{CREDENTIAL_NOT_READABLE, MIN_USERNAME_LENGTH, REDACTED};
use crate::error::{DomainError, DomainResult};
use crate::password::{HashCost, Password};
use crate::recipe::{Recipe, RecipeSummary};

/// User domain entity
///
/// The credential is not a public field: it can be replaced with
/// [`User::set_password`] and checked with [`User::authenticate`], and it is
/// never serialized. Reading it through [`User::password`] always fails.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    username: String,
    #[serde(skip_serializing)]
    password: Password,
    pub image_url: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a user from an already hashed credential.
    ///
    /// # Errors
    /// Returns a validation error if the username is empty.
    pub fn new(id: Uuid, username: String, password: Password) -> DomainResult<Self> {
        let now = Utc::now();
        Ok(Self {
            id,
            username: validate_username(username)?,
            password,
            image_url: None,
            bio: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Create a new account with a fresh id, hashing the plaintext password.
    pub fn register(username: String, plain_password: &str, cost: &HashCost) -> DomainResult<Self> {
        let username = validate_username(username)?;
        let password = Password::new(plain_password, cost)?;
        Self::new(Uuid::new_v4(), username, password)
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// The password is write-only; this always returns an access error.
    pub fn password(&self) -> DomainResult<String> {
        Err(DomainError::access(CREDENTIAL_NOT_READABLE))
    }

    /// PHC hash for the persistence layer only. Never put it in a response.
    pub fn stored_hash(&self) -> &str {
        self.password.as_hash()
    }

    /// Rename the user
    pub fn set_username(&mut self, username: String) -> DomainResult<()> {
        self.username = validate_username(username)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Replace the credential. The previous hash is discarded.
    pub fn set_password(&mut self, plain_password: &str, cost: &HashCost) -> DomainResult<()> {
        self.password.set(plain_password, cost)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Check a plaintext password against the stored credential
    pub fn authenticate(&self, plain_password: &str) -> bool {
        self.password.verify(plain_password)
    }

    /// Update optional profile fields.
    ///
    /// The outer `None` leaves a field unchanged; `Some(None)` clears it.
    pub fn update_profile(&mut self, image_url: Option<Option<String>>, bio: Option<Option<String>>) {
        if let Some(image_url) = image_url {
            self.image_url = image_url;
        }
        if let Some(bio) = bio {
            self.bio = bio;
        }
        self.updated_at = Utc::now();
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "User {}, ID: {}", self.username, self.id)
    }
}

fn validate_username(username: String) -> DomainResult<String> {
    if username.chars().count() < MIN_USERNAME_LENGTH {
        return Err(DomainError::validation("username cannot be empty"));
    }
    Ok(username)
}

/// User registration data transfer object
#[derive(Clone, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(length(min = 1, message = "username cannot be empty"))]
    pub username: String,
    #[validate(length(min = 1, message = "password cannot be empty"))]
    pub password: String,
    pub image_url: Option<String>,
    pub bio: Option<String>,
}

impl std::fmt::Debug for CreateUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUser")
            .field("username", &self.username)
            .field("password", &REDACTED)
            .field("image_url", &self.image_url)
            .field("bio", &self.bio)
            .finish()
    }
}

/// User profile update data transfer object
///
/// For `image_url` and `bio`, a missing key leaves the field alone and an
/// explicit `null` clears it.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(length(min = 1, message = "username cannot be empty"))]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub image_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub bio: Option<Option<String>>,
}

/// Distinguish `"key": null` from a missing key.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// User as embedded in a recipe response (no recipe list)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub image_url: Option<String>,
    pub bio: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            image_url: user.image_url.clone(),
            bio: user.bio.clone(),
        }
    }
}

/// User response (safe to return to client)
///
/// Recipes are listed without their owner to keep the output acyclic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub image_url: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub recipes: Vec<RecipeSummary>,
}

impl UserResponse {
    /// Build a response including the user's recipes
    pub fn with_recipes(user: &User, recipes: &[Recipe]) -> Self {
        let mut response = Self::from(user);
        response.recipes = recipes.iter().map(RecipeSummary::from).collect();
        response
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            image_url: user.image_url.clone(),
            bio: user.bio.clone(),
            created_at: user.created_at,
            recipes: Vec::new(),
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}
