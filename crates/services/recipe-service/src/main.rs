//! Recipe Service - database maintenance and account administration CLI.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use domain::{CreateUser, UserResponse};
use recipe_service_lib::{infra::Database, MigrateAction, RecipeServiceConfig};

#[derive(Parser)]
#[command(name = "recipe-service")]
#[command(about = "Recipe sharing data layer")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateCommands,
    },
    /// Check database connectivity
    Ping,
    /// User account administration
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
}

#[derive(Subcommand)]
enum MigrateCommands {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

#[derive(Subcommand)]
enum UserCommands {
    /// Register a new user
    Add {
        #[arg(long)]
        username: String,
        #[arg(long, env = "RECIPE_USER_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        image_url: Option<String>,
        #[arg(long)]
        bio: Option<String>,
    },
    /// List all users
    List,
    /// Show a user with their recipes
    Show { id: Uuid },
    /// Delete a user and all of their recipes
    Delete { id: Uuid },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let config = RecipeServiceConfig::from_env();
    tracing::debug!(?config, "Configuration loaded");

    match cli.command {
        Commands::Migrate { action } => {
            let migrate_action = match action {
                MigrateCommands::Up => MigrateAction::Up,
                MigrateCommands::Down => MigrateAction::Down,
                MigrateCommands::Fresh => MigrateAction::Fresh,
                MigrateCommands::Status => {
                    let db = Database::connect_without_migrations(&config.database).await?;
                    for (name, applied) in db.migration_status().await? {
                        let marker = if applied { "[x]" } else { "[ ]" };
                        println!("{} {}", marker, name);
                    }
                    return Ok(());
                }
            };
            recipe_service_lib::run_migrations(&config, migrate_action).await?;
        }
        Commands::Ping => {
            let db = Database::connect_without_migrations(&config.database).await?;
            db.ping().await?;
            println!("ok");
        }
        Commands::User { action } => {
            let services = recipe_service_lib::connect(&config).await?;
            let accounts = services.accounts();

            match action {
                UserCommands::Add {
                    username,
                    password,
                    image_url,
                    bio,
                } => {
                    let user = accounts
                        .register(CreateUser {
                            username,
                            password,
                            image_url,
                            bio,
                        })
                        .await?;
                    println!("{}", serde_json::to_string_pretty(&UserResponse::from(user))?);
                }
                UserCommands::List => {
                    for user in accounts.list_users().await? {
                        println!("{}", user);
                    }
                }
                UserCommands::Show { id } => {
                    let profile = accounts.get_profile(id).await?;
                    println!("{}", serde_json::to_string_pretty(&profile)?);
                }
                UserCommands::Delete { id } => {
                    let removed = accounts.delete_user(id).await?;
                    println!("Deleted user {} and {} recipe(s)", id, removed);
                }
            }
        }
    }

    Ok(())
}

/// Initialize tracing subscriber (verbose mode sets debug level)
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "debug".to_string()
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();
}
