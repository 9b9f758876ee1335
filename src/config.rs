use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
}

impl AppConfig {
    /// Loads configuration from the environment. The secret and token TTL
    /// have no defaults; a missing value fails startup instead of running
    /// with a guessed one.
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "mealplanner".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "mealplanner-users".into()),
            ttl_minutes: parse_ttl_minutes(
                &std::env::var("JWT_TTL_MINUTES").context("JWT_TTL_MINUTES is not set")?,
            )?,
        };
        Ok(Self { database_url, jwt })
    }
}

/// The TTL later feeds an unsigned duration, so zero and negative values are
/// rejected here instead of wrapping into a huge lifetime.
fn parse_ttl_minutes(raw: &str) -> anyhow::Result<i64> {
    let minutes = raw
        .parse::<i64>()
        .context("JWT_TTL_MINUTES must be an integer")?;
    anyhow::ensure!(minutes > 0, "JWT_TTL_MINUTES must be positive");
    Ok(minutes)
}
