//! Recipe service configuration.

use std::env;

use common::DatabaseConfig;
use domain::HashCost;

/// Recipe service configuration.
#[derive(Debug, Clone, Default)]
pub struct RecipeServiceConfig {
    /// Database connection settings
    pub database: DatabaseConfig,
    /// Argon2 cost applied to newly set passwords
    pub hash_cost: HashCost,
}

impl RecipeServiceConfig {
    /// Load configuration from environment variables (and `.env`, if present).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key/value source.
    ///
    /// Unset keys keep their defaults. Unparsable values, and a hash cost
    /// argon2 would reject, are logged and replaced by defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_defaults = DatabaseConfig::default();
        let cost_defaults = HashCost::default();

        let database = DatabaseConfig {
            url: lookup("RECIPE_SERVICE_DATABASE_URL")
                .or_else(|| lookup("DATABASE_URL"))
                .unwrap_or(db_defaults.url),
            max_connections: parse_var(&lookup, "DATABASE_MAX_CONNECTIONS")
                .unwrap_or(db_defaults.max_connections),
            min_connections: parse_var(&lookup, "DATABASE_MIN_CONNECTIONS")
                .unwrap_or(db_defaults.min_connections),
        };

        let hash_cost = HashCost {
            memory_kib: parse_var(&lookup, "PASSWORD_HASH_MEMORY_KIB")
                .unwrap_or(cost_defaults.memory_kib),
            iterations: parse_var(&lookup, "PASSWORD_HASH_ITERATIONS")
                .unwrap_or(cost_defaults.iterations),
            parallelism: parse_var(&lookup, "PASSWORD_HASH_PARALLELISM")
                .unwrap_or(cost_defaults.parallelism),
        };

        Self {
            database,
            hash_cost: checked_cost(hash_cost),
        }
    }
}

/// Reject a cost argon2 cannot run with now, not at the first registration.
fn checked_cost(cost: HashCost) -> HashCost {
    match cost.build() {
        Ok(_) => cost,
        Err(e) => {
            tracing::warn!(?cost, "Ignoring unusable password hash cost ({}), using default", e);
            HashCost::default()
        }
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let raw = lookup(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring unparsable {}={:?}, using default", key, raw);
            None
        }
    }
}
