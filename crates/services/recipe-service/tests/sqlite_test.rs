//! Integration tests against an in-memory SQLite database.

use std::sync::Arc;

use uuid::Uuid;

use common::{AppError, DatabaseConfig};
use domain::{CreateRecipe, CreateUser, HashCost, Recipe, UpdateRecipe, UpdateUser, User};
use recipe_service_lib::infra::{Database, Persistence, UnitOfWork};
use recipe_service_lib::repository::{RecipeRepository, RecipeStore, UserRepository, UserStore};
use recipe_service_lib::with_transaction;
use recipe_service_lib::Services;

const INSTRUCTIONS: &str = "Whisk the eggs, fold in the flour and bake for twenty minutes.";

fn cheap() -> HashCost {
    HashCost::new(1024, 1, 1)
}

async fn setup() -> Database {
    Database::connect(&DatabaseConfig::in_memory_sqlite())
        .await
        .expect("in-memory database")
}

fn new_user(username: &str) -> CreateUser {
    CreateUser {
        username: username.to_string(),
        password: "secret123".to_string(),
        image_url: None,
        bio: None,
    }
}

fn new_recipe(title: &str) -> CreateRecipe {
    CreateRecipe {
        title: title.to_string(),
        instructions: INSTRUCTIONS.to_string(),
        minutes_to_complete: 20,
    }
}

#[tokio::test]
async fn test_migrations_applied() {
    let db = setup().await;

    db.ping().await.unwrap();
    let status = db.migration_status().await.unwrap();
    assert_eq!(status.len(), 2);
    assert!(status.iter().all(|(_, applied)| *applied));
}

#[tokio::test]
async fn test_register_and_authenticate() {
    let db = setup().await;
    let services = Services::from_connection(db.get_connection(), cheap());

    let user = services.accounts().register(new_user("chef1")).await.unwrap();
    let found = services
        .accounts()
        .authenticate("chef1", "secret123")
        .await
        .unwrap();
    assert_eq!(found.id, user.id);

    let wrong = services.accounts().authenticate("chef1", "nope").await;
    assert!(matches!(wrong, Err(AppError::InvalidCredentials)));
}

#[tokio::test]
async fn test_duplicate_username_conflicts() {
    let db = setup().await;
    let services = Services::from_connection(db.get_connection(), cheap());

    services.accounts().register(new_user("chef1")).await.unwrap();
    let result = services.accounts().register(new_user("chef1")).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    // The unique index catches it even without the service pre-check
    let store = UserStore::new(db.get_connection());
    let duplicate = User::register("chef1".to_string(), "other", &cheap()).unwrap();
    let result = store.create(duplicate).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_password_change_persists() {
    let db = setup().await;
    let services = Services::from_connection(db.get_connection(), cheap());

    let user = services.accounts().register(new_user("chef1")).await.unwrap();
    services
        .accounts()
        .change_password(user.id, "new-secret")
        .await
        .unwrap();

    assert!(services
        .accounts()
        .authenticate("chef1", "new-secret")
        .await
        .is_ok());
    assert!(services
        .accounts()
        .authenticate("chef1", "secret123")
        .await
        .is_err());
}

#[tokio::test]
async fn test_delete_user_cascades_to_recipes() {
    let db = setup().await;
    let services = Services::from_connection(db.get_connection(), cheap());
    let recipes = RecipeStore::new(db.get_connection());

    let owner = services.accounts().register(new_user("chef1")).await.unwrap();
    let other = services.accounts().register(new_user("chef2")).await.unwrap();

    for title in ["Bread", "Cake", "Pie"] {
        services
            .recipes()
            .create_recipe(owner.id, new_recipe(title))
            .await
            .unwrap();
    }
    let kept = services
        .recipes()
        .create_recipe(other.id, new_recipe("Soup"))
        .await
        .unwrap();

    let removed = services.accounts().delete_user(owner.id).await.unwrap();

    assert_eq!(removed, 3);
    assert_eq!(recipes.count_by_owner(owner.id).await.unwrap(), 0);
    assert_eq!(recipes.count_by_owner(other.id).await.unwrap(), 1);
    assert!(recipes.find_by_id(kept.id).await.unwrap().is_some());
    assert!(matches!(
        services.accounts().get_user(owner.id).await,
        Err(AppError::NotFound)
    ));
}

#[tokio::test]
async fn test_delete_unknown_user() {
    let db = setup().await;
    let services = Services::from_connection(db.get_connection(), cheap());

    let result = services.accounts().delete_user(Uuid::new_v4()).await;
    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_failed_transaction_rolls_back() {
    let db = setup().await;
    let uow = Arc::new(Persistence::new(db.get_connection()));

    let user = User::register("chef1".to_string(), "secret123", &cheap()).unwrap();
    let result: Result<(), AppError> = with_transaction!(uow, |ctx| {
        ctx.users().create(&user).await?;
        Err::<(), AppError>(AppError::internal("abort"))
    });

    assert!(result.is_err());
    assert!(uow.users().find_by_username("chef1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_recipe_for_missing_owner_rejected() {
    let db = setup().await;
    let store = RecipeStore::new(db.get_connection());

    let orphan = Recipe::new(
        Uuid::new_v4(),
        Uuid::new_v4(),
        "Bread".to_string(),
        INSTRUCTIONS.to_string(),
        30,
    )
    .unwrap();

    let result = store.create(orphan).await;
    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_update_recipe_persists() {
    let db = setup().await;
    let services = Services::from_connection(db.get_connection(), cheap());

    let owner = services.accounts().register(new_user("chef1")).await.unwrap();
    let recipe = services
        .recipes()
        .create_recipe(owner.id, new_recipe("Bread"))
        .await
        .unwrap();

    services
        .recipes()
        .update_recipe(
            recipe.id,
            UpdateRecipe {
                title: Some("Sourdough".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let response = services.recipes().get_recipe(recipe.id).await.unwrap();
    assert_eq!(response.title, "Sourdough");
    assert_eq!(response.instructions, INSTRUCTIONS);
    assert_eq!(response.user.id, owner.id);

    let invalid = services
        .recipes()
        .update_recipe(
            recipe.id,
            UpdateRecipe {
                title: Some(String::new()),
                ..Default::default()
            },
        )
        .await;
    assert!(invalid.unwrap_err().is_validation());

    let profile = services.accounts().get_profile(owner.id).await.unwrap();
    assert_eq!(profile.recipes.len(), 1);
    assert_eq!(profile.recipes[0].title, "Sourdough");
}

#[tokio::test]
async fn test_delete_recipe() {
    let db = setup().await;
    let services = Services::from_connection(db.get_connection(), cheap());

    let owner = services.accounts().register(new_user("chef1")).await.unwrap();
    let bread = services
        .recipes()
        .create_recipe(owner.id, new_recipe("Bread"))
        .await
        .unwrap();
    let cake = services
        .recipes()
        .create_recipe(owner.id, new_recipe("Cake"))
        .await
        .unwrap();

    services.recipes().delete_recipe(bread.id).await.unwrap();

    let remaining = services.recipes().list_recipes(owner.id).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, cake.id);
    assert!(matches!(
        services.recipes().get_recipe(bread.id).await,
        Err(AppError::NotFound)
    ));

    // Deleting again, or deleting an id that never existed
    assert!(matches!(
        services.recipes().delete_recipe(bread.id).await,
        Err(AppError::NotFound)
    ));
    assert!(matches!(
        services.recipes().delete_recipe(Uuid::new_v4()).await,
        Err(AppError::NotFound)
    ));

    // The owner is untouched
    assert!(services.accounts().get_user(owner.id).await.is_ok());
}

#[tokio::test]
async fn test_list_users_ordered_by_username() {
    let db = setup().await;
    let services = Services::from_connection(db.get_connection(), cheap());

    assert!(services.accounts().list_users().await.unwrap().is_empty());

    for name in ["marta", "anton", "zoe"] {
        services.accounts().register(new_user(name)).await.unwrap();
    }

    let users = services.accounts().list_users().await.unwrap();
    let names: Vec<&str> = users.iter().map(|u| u.username()).collect();
    assert_eq!(names, ["anton", "marta", "zoe"]);
}

#[tokio::test]
async fn test_update_profile_persists() {
    let db = setup().await;
    let services = Services::from_connection(db.get_connection(), cheap());

    let user = services.accounts().register(new_user("chef1")).await.unwrap();

    services
        .accounts()
        .update_profile(
            user.id,
            UpdateUser {
                username: Some("chef-renamed".to_string()),
                image_url: Some(Some("https://img/chef.png".to_string())),
                bio: Some(Some("Mostly soups".to_string())),
            },
        )
        .await
        .unwrap();

    let stored = services.accounts().get_user(user.id).await.unwrap();
    assert_eq!(stored.username(), "chef-renamed");
    assert_eq!(stored.image_url.as_deref(), Some("https://img/chef.png"));
    assert_eq!(stored.bio.as_deref(), Some("Mostly soups"));

    // Login follows the new name, and the credential survived the update
    assert!(services
        .accounts()
        .authenticate("chef-renamed", "secret123")
        .await
        .is_ok());
    assert!(services
        .accounts()
        .authenticate("chef1", "secret123")
        .await
        .is_err());

    // An explicit clear removes the bio and leaves the image alone
    services
        .accounts()
        .update_profile(
            user.id,
            UpdateUser {
                bio: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let stored = services.accounts().get_user(user.id).await.unwrap();
    assert!(stored.bio.is_none());
    assert_eq!(stored.image_url.as_deref(), Some("https://img/chef.png"));
}

#[tokio::test]
async fn test_update_profile_unknown_user() {
    let db = setup().await;
    let services = Services::from_connection(db.get_connection(), cheap());

    let result = services
        .accounts()
        .update_profile(Uuid::new_v4(), UpdateUser::default())
        .await;
    assert!(matches!(result, Err(AppError::NotFound)));
}
