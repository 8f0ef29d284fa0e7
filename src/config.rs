use anyhow::Context;
use serde::Deserialize;

use crate::pantry::freshness::DEFAULT_SOON_THRESHOLD_DAYS;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FreshnessConfig {
    pub soon_threshold_days: u32,
    /// Offset from UTC used to decide which calendar day "today" is.
    pub utc_offset_hours: i8,
}

impl Default for FreshnessConfig {
    fn default() -> Self {
        Self {
            soon_threshold_days: DEFAULT_SOON_THRESHOLD_DAYS,
            utc_offset_hours: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub freshness: FreshnessConfig,
    /// `None` when no API key is set; substitutes are then never suggested.
    pub ai: Option<AiConfig>,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "fridgekeeper".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "fridgekeeper-users".into()),
            ttl_minutes: env_or("JWT_TTL_MINUTES", 60),
            refresh_ttl_minutes: env_or("JWT_REFRESH_TTL_MINUTES", 60 * 24 * 14),
        };
        let freshness = FreshnessConfig {
            soon_threshold_days: env_or("EXPIRY_SOON_DAYS", DEFAULT_SOON_THRESHOLD_DAYS),
            utc_offset_hours: env_or("APP_UTC_OFFSET_HOURS", 0),
        };
        let ai = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .map(|api_key| AiConfig {
                api_key,
                model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".into()),
                base_url: std::env::var("OPENAI_BASE_URL")
                    .unwrap_or_else(|_| "https://api.openai.com/v1".into()),
                timeout_secs: env_or("OPENAI_TIMEOUT_SECS", 15),
            });
        Ok(Self {
            database_url,
            jwt,
            freshness,
            ai,
        })
    }
}
