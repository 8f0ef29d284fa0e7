//! Ingredient substitution suggestions from an external AI service.
//!
//! The advisor is strictly optional: every failure is absorbed at this
//! boundary and surfaces as `None`, so callers never wait on or fail
//! because of it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod openai;
mod parse;

pub use openai::OpenAiAdvisor;

/// One suggested replacement for a missing ingredient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Substitute {
    pub original: String,
    pub substitute: String,
    #[serde(default, alias = "reason")]
    pub note: String,
}

/// What the advisor is told about a gap.
#[derive(Debug, Clone, Copy)]
pub struct SubstituteRequest<'a> {
    pub recipe_title: &'a str,
    pub missing: &'a [String],
    pub held: &'a [String],
}

#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error("advisor request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("advisor returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("advisor returned no content")]
    EmptyResponse,
    #[error("advisor response was not usable JSON")]
    Unparsable,
}

#[async_trait]
pub trait SubstituteAdvisor: Send + Sync {
    /// `None` when the service is unavailable or its answer cannot be used.
    async fn suggest(&self, request: SubstituteRequest<'_>) -> Option<Vec<Substitute>>;
}

/// Advisor used when no AI service is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAdvisor;

#[async_trait]
impl SubstituteAdvisor for NoAdvisor {
    async fn suggest(&self, _request: SubstituteRequest<'_>) -> Option<Vec<Substitute>> {
        None
    }
}
